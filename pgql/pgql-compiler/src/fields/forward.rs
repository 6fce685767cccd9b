use tracing::trace;

use crate::{
    error::CompileResult,
    metadata::ForeignKeyRelation,
    schema::{FieldDefinition, FieldSource, JoinDirective, Optionality, TypeRef, UnitType},
    symbol::SymbolTable,
};

/// One singular field per foreign key owned by the type's table.
///
/// The field is named after the referenced table and is nullable exactly when
/// the owning column is. Both ends of the key must resolve.
pub fn compile_forward_fields<'a>(
    symbols: &SymbolTable<'a>,
    owned_foreign_keys: &'a [ForeignKeyRelation],
) -> CompileResult<Vec<FieldDefinition<'a>>> {
    owned_foreign_keys
        .iter()
        .map(|foreign_key| {
            let referenced_table = foreign_key.referenced_table.as_str();
            let referenced_column = foreign_key.referenced_column.as_str();

            let referenced = symbols.resolve_table(referenced_table, referenced_column)?;
            symbols.resolve_column(referenced_table, referenced_column)?;
            let owning_column =
                symbols.resolve_column(&foreign_key.owning_table, &foreign_key.owning_column)?;

            trace!(
                "forward reference {}.{} -> {}",
                foreign_key.owning_table,
                foreign_key.owning_column,
                referenced.names.type_name
            );

            Ok(FieldDefinition {
                field_name: referenced.names.singular.clone(),
                graphql_type: TypeRef::unit(
                    UnitType::Object(referenced.names.type_name.clone()),
                    Optionality::from_optional(owning_column.is_nullable),
                ),
                source: FieldSource::Join(JoinDirective::new(
                    &foreign_key.owning_column,
                    &foreign_key.referenced_column,
                )),
            })
        })
        .collect()
}
