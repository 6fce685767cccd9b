//! Assembly of the complete schema from a catalog.

use fnv::FnvHashSet;
use tracing::{debug, info, trace};

use crate::{
    config::CompileConfig,
    error::{CompileError, CompileResult},
    fields::compile_fields,
    metadata::Catalog,
    predicate::compile_predicate,
    query_root::{LIMIT_ARGUMENT, OFFSET_ARGUMENT, compile_query_root},
    schema::{CompiledSchema, FieldGroups, TableSchema},
    sql::{Alias, Expr, Limit, OrderBy, Probe, Select, SqlType, TableName},
    symbol::{SymbolTable, TypeSymbol},
};

/// Compile every table of the catalog plus the root query.
///
/// Fails on the first error, nothing partial is returned.
pub fn compile<'a>(
    catalog: &'a Catalog,
    config: &'a CompileConfig,
) -> CompileResult<CompiledSchema<'a>> {
    let symbols = SymbolTable::build(catalog)?;

    let types = symbols
        .iter()
        .map(|symbol| compile_table(catalog, &symbols, symbol, &config.schema_name))
        .collect::<CompileResult<Vec<_>>>()?;

    let query = compile_query_root(&symbols)?;

    info!(
        "compiled {} types from schema {}",
        types.len(),
        config.schema_name
    );

    Ok(CompiledSchema { types, query })
}

fn compile_table<'a>(
    catalog: &'a Catalog,
    symbols: &SymbolTable<'a>,
    symbol: &TypeSymbol<'a>,
    schema_name: &'a str,
) -> CompileResult<TableSchema<'a>> {
    let unique_key: Vec<&'a str> = symbol
        .columns
        .iter()
        .filter(|column| column.is_primary)
        .map(|column| column.column_name.as_str())
        .collect();

    if unique_key.is_empty() {
        return Err(CompileError::NoPrimaryKey {
            table: symbol.table_name.to_string(),
        });
    }

    let fields = compile_fields(catalog, symbols, symbol)?;
    check_unique_fields(symbol, &fields)?;

    let sql_table = table_select(schema_name, symbol, &unique_key)?;
    trace!("fragment of {}:\n{sql_table}", symbol.names.type_name);

    debug!(
        "table {} -> type {} ({} fields)",
        symbol.table_name,
        symbol.names.type_name,
        fields.len()
    );

    Ok(TableSchema {
        type_name: symbol.names.type_name.clone(),
        table_name: symbol.table_name,
        unique_key,
        sql_table,
        fields,
    })
}

fn check_unique_fields(symbol: &TypeSymbol, fields: &FieldGroups) -> CompileResult<()> {
    let mut field_names = FnvHashSet::default();

    for field in fields.iter() {
        if !field_names.insert(&field.field_name) {
            return Err(CompileError::DuplicateField {
                type_name: symbol.names.type_name.clone(),
                field_name: field.field_name.clone(),
            });
        }
    }

    Ok(())
}

/// The backing query: every row matching the argument filter, in unique key
/// order, optionally paged.
fn table_select<'a>(
    schema_name: &'a str,
    symbol: &TypeSymbol<'a>,
    unique_key: &[&'a str],
) -> CompileResult<Select<'a>> {
    let alias = Alias::Table(symbol.table_name);

    Ok(Select {
        expressions: vec![Expr::Asterisk],
        from: TableName(schema_name, symbol.table_name).as_(alias),
        where_: Some(compile_predicate(alias, symbol.columns)?),
        order_by: OrderBy {
            expressions: unique_key
                .iter()
                .map(|column| Expr::path(alias, *column))
                .collect(),
        },
        limit: Limit {
            limit: Some(paging_clause(LIMIT_ARGUMENT)),
            offset: Some(paging_clause(OFFSET_ARGUMENT)),
        },
    })
}

/// `CASE WHEN ${number(args.x)} THEN ${args.x}::INT END`, NULL unless a number was given
fn paging_clause(arg: &str) -> Expr<'static> {
    Expr::case(
        Expr::arg_test(Probe::Number, arg),
        Expr::cast(Expr::arg(arg), SqlType::INT),
        None,
    )
}
