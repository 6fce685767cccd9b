//! Field compilers, one per field group.

use crate::{
    error::CompileResult,
    metadata::Catalog,
    schema::FieldGroups,
    symbol::{SymbolTable, TypeSymbol},
};

pub mod columns;
pub mod forward;
pub mod reverse;

/// Compile every field group of one type.
pub fn compile_fields<'a>(
    catalog: &'a Catalog,
    symbols: &SymbolTable<'a>,
    symbol: &TypeSymbol<'a>,
) -> CompileResult<FieldGroups<'a>> {
    Ok(FieldGroups {
        columns: columns::compile_column_fields(symbol)?,
        forward: forward::compile_forward_fields(
            symbols,
            catalog.owned_foreign_keys(symbol.table_name),
        )?,
        reverse: reverse::compile_reverse_fields(
            symbols,
            catalog.referencing_foreign_keys(symbol.table_name),
        )?,
    })
}
