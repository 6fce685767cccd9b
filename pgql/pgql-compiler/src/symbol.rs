//! Table symbols, resolved before any field is compiled.

use compact_str::CompactString;
use fnv::FnvHashMap;
use indexmap::IndexMap;

use crate::{
    error::{CompileError, CompileResult},
    metadata::{Catalog, ColumnMetadata},
    naming::EntityNames,
    query_root::QUERY_TYPE_NAME,
    types::ScalarKind,
};

pub struct TypeSymbol<'a> {
    pub table_name: &'a str,
    pub names: EntityNames,
    pub columns: &'a [ColumnMetadata],
}

impl<'a> TypeSymbol<'a> {
    pub fn column(&self, column_name: &str) -> Option<&'a ColumnMetadata> {
        self.columns
            .iter()
            .find(|column| column.column_name == column_name)
    }
}

/// Every table of a catalog, keyed by table name, in catalog order.
pub struct SymbolTable<'a> {
    symbols: IndexMap<&'a str, TypeSymbol<'a>>,
}

impl<'a> SymbolTable<'a> {
    pub fn build(catalog: &'a Catalog) -> CompileResult<Self> {
        let mut symbols = IndexMap::with_capacity(catalog.len());
        let mut type_names: FnvHashMap<CompactString, &'a str> = FnvHashMap::default();

        for (table_name, columns) in catalog.tables() {
            let names = EntityNames::from_table(table_name)?;

            if is_reserved(&names.type_name) {
                return Err(CompileError::ReservedTypeName {
                    type_name: names.type_name,
                    table: table_name.to_string(),
                });
            }

            if let Some(other_table) = type_names.insert(names.type_name.clone(), table_name) {
                return Err(CompileError::DuplicateTypeName {
                    type_name: names.type_name,
                    tables: vec![other_table.to_string(), table_name.to_string()],
                });
            }

            symbols.insert(
                table_name,
                TypeSymbol {
                    table_name,
                    names,
                    columns,
                },
            );
        }

        Ok(Self { symbols })
    }

    pub fn get(&self, table_name: &str) -> Option<&TypeSymbol<'a>> {
        self.symbols.get(table_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeSymbol<'a>> {
        self.symbols.values()
    }

    /// Look up a table that a foreign key points at
    pub fn resolve_table(
        &self,
        table_name: &str,
        column_name: &str,
    ) -> CompileResult<&TypeSymbol<'a>> {
        self.get(table_name)
            .ok_or_else(|| dangling(table_name, column_name))
    }

    /// Look up a column that a foreign key names
    pub fn resolve_column(
        &self,
        table_name: &str,
        column_name: &str,
    ) -> CompileResult<&'a ColumnMetadata> {
        self.resolve_table(table_name, column_name)?
            .column(column_name)
            .ok_or_else(|| dangling(table_name, column_name))
    }
}

/// Names the artifact declares on its own: the root query and every scalar.
fn is_reserved(type_name: &str) -> bool {
    type_name == QUERY_TYPE_NAME
        || ScalarKind::ALL
            .iter()
            .any(|scalar| scalar.graphql_name() == type_name)
}

fn dangling(table_name: &str, column_name: &str) -> CompileError {
    CompileError::DanglingReference {
        table: table_name.to_string(),
        column: column_name.to_string(),
    }
}
