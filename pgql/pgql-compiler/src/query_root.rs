//! The root `Query` type: one collection field per table.

use compact_str::CompactString;
use fnv::FnvHashSet;
use tracing::trace;

use crate::{
    error::{CompileError, CompileResult},
    naming::to_camel,
    schema::{Argument, Optionality, QueryField, QueryRoot, TypeRef, UnitType},
    symbol::{SymbolTable, TypeSymbol},
    types::{LogicalType, ScalarKind, logical_type},
};

pub const QUERY_TYPE_NAME: &str = "Query";
pub const LIMIT_ARGUMENT: &str = "limit";
pub const OFFSET_ARGUMENT: &str = "offset";

pub fn compile_query_root<'a>(symbols: &SymbolTable<'a>) -> CompileResult<QueryRoot<'a>> {
    let mut field_names = FnvHashSet::default();
    let mut fields = vec![];

    for symbol in symbols.iter() {
        let field = compile_query_field(symbol)?;

        if !field_names.insert(field.field_name.clone()) {
            return Err(CompileError::DuplicateField {
                type_name: QUERY_TYPE_NAME.into(),
                field_name: field.field_name,
            });
        }

        fields.push(field);
    }

    Ok(QueryRoot { fields })
}

/// `posts(id: [Int], tags: [String!], limit: Int, offset: Int): [Post!]!`
///
/// Filter arguments of non-array columns come first, then those of array columns.
fn compile_query_field<'a>(symbol: &TypeSymbol<'a>) -> CompileResult<QueryField<'a>> {
    let field_name = symbol.names.plural.clone();
    let mut argument_names = FnvHashSet::default();
    let mut arguments = Vec::with_capacity(symbol.columns.len() + 2);

    let mut array_arguments = vec![];

    for column in symbol.columns {
        let name = to_camel(&column.column_name);

        match logical_type(column)? {
            // a list of candidate values, null matches NULL
            LogicalType::Scalar(kind) => arguments.push(Argument {
                name,
                graphql_type: TypeRef::array(
                    UnitType::Scalar(kind),
                    Optionality::Optional,
                    Optionality::Optional,
                ),
            }),
            LogicalType::Array(kind) => array_arguments.push(Argument {
                name,
                graphql_type: TypeRef::array(
                    UnitType::Scalar(kind),
                    Optionality::Optional,
                    Optionality::Mandatory,
                ),
            }),
        }
    }

    // same order as the clauses of the backing predicate
    arguments.extend(array_arguments);

    for name in [LIMIT_ARGUMENT, OFFSET_ARGUMENT] {
        arguments.push(Argument {
            name: name.into(),
            graphql_type: TypeRef::unit(UnitType::Scalar(ScalarKind::Int), Optionality::Optional),
        });
    }

    for argument in &arguments {
        if !argument_names.insert(&argument.name) {
            return Err(duplicate_argument(&field_name, &argument.name));
        }
    }

    trace!("query field {field_name} with {} arguments", arguments.len());

    Ok(QueryField {
        graphql_type: TypeRef::array(
            UnitType::Object(symbol.names.type_name.clone()),
            Optionality::Mandatory,
            Optionality::Mandatory,
        ),
        field_name,
        arguments,
        table_name: symbol.table_name,
    })
}

fn duplicate_argument(field_name: &CompactString, argument: &CompactString) -> CompileError {
    CompileError::DuplicateArgument {
        field_name: field_name.clone(),
        argument: argument.clone(),
    }
}
