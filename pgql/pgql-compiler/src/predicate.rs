//! The filter condition of a type's backing query.
//!
//! Every column gets one clause, driven by the query argument of the same name.
//! A clause is `TRUE` whenever its argument is absent, so a caller only
//! constrains the columns it names.

use tracing::trace;

use crate::{
    error::CompileResult,
    metadata::ColumnMetadata,
    naming::to_camel,
    sql::{Alias, Expr, Probe, SqlType},
    types::{LogicalType, element_sql_type, logical_type},
};

/// Conjunction of all column clauses: non-array columns first, then array columns.
pub fn compile_predicate<'a>(
    alias: Alias<'a>,
    columns: &'a [ColumnMetadata],
) -> CompileResult<Expr<'a>> {
    let mut scalar_clauses = vec![];
    let mut array_clauses = vec![];

    for column in columns {
        match logical_type(column)? {
            LogicalType::Scalar(_) => scalar_clauses.push(scalar_clause(alias, column)),
            LogicalType::Array(_) => array_clauses.push(array_clause(alias, column)),
        }
    }

    scalar_clauses.extend(array_clauses);
    let predicate = Expr::and(scalar_clauses);

    trace!("predicate for {alias}: {predicate}");

    Ok(predicate)
}

/// ```sql
/// CASE WHEN ${absent(args.x)} THEN TRUE
/// ELSE CASE WHEN ${null(args.x)} THEN t."x" IS NULL
/// ELSE CASE WHEN ${non_empty(args.x)} THEN t."x" = ANY(${args.x}::type[])
/// ELSE TRUE END END END
/// ```
fn scalar_clause<'a>(alias: Alias<'a>, column: &'a ColumnMetadata) -> Expr<'a> {
    let arg = to_camel(&column.column_name);
    let path = Expr::path(alias, &column.column_name);

    let any_of = Expr::case(
        Expr::arg_test(Probe::NonEmptyList, arg.clone()),
        Expr::eq(
            path.clone(),
            Expr::any(Expr::cast(
                Expr::arg(arg.clone()),
                SqlType::array_of(element_sql_type(column)),
            )),
        ),
        Some(Expr::TRUE),
    );

    let null_or_any_of = Expr::case(
        Expr::arg_test(Probe::Null, arg.clone()),
        Expr::is_null(path),
        Some(any_of),
    );

    Expr::case(
        Expr::arg_test(Probe::Absent, arg),
        Expr::TRUE,
        Some(null_or_any_of),
    )
}

/// ```sql
/// CASE WHEN ${non_empty(args.x)} THEN t."x" && ${args.x}::type[] ELSE TRUE END
/// ```
///
/// An empty list constrains nothing, same as for scalar columns.
fn array_clause<'a>(alias: Alias<'a>, column: &'a ColumnMetadata) -> Expr<'a> {
    let arg = to_camel(&column.column_name);

    Expr::case(
        Expr::arg_test(Probe::NonEmptyList, arg.clone()),
        Expr::overlaps(
            Expr::path(alias, &column.column_name),
            Expr::cast(Expr::arg(arg), SqlType::array_of(element_sql_type(column))),
        ),
        Some(Expr::TRUE),
    )
}
