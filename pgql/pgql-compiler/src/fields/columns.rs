use tracing::trace;

use crate::{
    error::CompileResult,
    naming::to_camel,
    schema::{FieldDefinition, FieldSource, Optionality, TypeRef, UnitType},
    symbol::TypeSymbol,
    types::{LogicalType, logical_type},
};

/// One field per column, in column order.
///
/// Array columns become lists of non-null items. The outer nullability always
/// follows the column.
pub fn compile_column_fields<'a>(
    symbol: &TypeSymbol<'a>,
) -> CompileResult<Vec<FieldDefinition<'a>>> {
    symbol
        .columns
        .iter()
        .map(|column| {
            let optionality = Optionality::from_optional(column.is_nullable);
            let graphql_type = match logical_type(column)? {
                LogicalType::Scalar(kind) => TypeRef::unit(UnitType::Scalar(kind), optionality),
                LogicalType::Array(kind) => TypeRef::array(
                    UnitType::Scalar(kind),
                    optionality,
                    Optionality::Mandatory,
                ),
            };

            let field = FieldDefinition {
                field_name: to_camel(&column.column_name),
                graphql_type,
                source: FieldSource::Column(&column.column_name),
            };
            trace!(
                "{}.{}: {}",
                symbol.names.type_name, field.field_name, field.graphql_type
            );

            Ok(field)
        })
        .collect()
}
