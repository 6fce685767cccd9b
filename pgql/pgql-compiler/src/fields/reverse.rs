use tracing::trace;

use crate::{
    error::CompileResult,
    metadata::ForeignKeyRelation,
    schema::{FieldDefinition, FieldSource, JoinDirective, Optionality, TypeRef, UnitType},
    symbol::SymbolTable,
};

/// One list field per foreign key pointing at the type's table, named after the
/// owning table and typed `[Owning!]!`.
pub fn compile_reverse_fields<'a>(
    symbols: &SymbolTable<'a>,
    referencing_foreign_keys: &'a [ForeignKeyRelation],
) -> CompileResult<Vec<FieldDefinition<'a>>> {
    referencing_foreign_keys
        .iter()
        .map(|foreign_key| {
            let owning =
                symbols.resolve_table(&foreign_key.owning_table, &foreign_key.owning_column)?;

            trace!(
                "reverse reference {}.{} <- {}",
                foreign_key.referenced_table,
                foreign_key.referenced_column,
                owning.names.type_name
            );

            Ok(FieldDefinition {
                field_name: owning.names.plural.clone(),
                graphql_type: TypeRef::array(
                    UnitType::Object(owning.names.type_name.clone()),
                    Optionality::Mandatory,
                    Optionality::Mandatory,
                ),
                source: FieldSource::Join(JoinDirective::new(
                    &foreign_key.referenced_column,
                    &foreign_key.owning_column,
                )),
            })
        })
        .collect()
}
