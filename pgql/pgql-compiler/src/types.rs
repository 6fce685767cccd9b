//! Mapping of native column types to GraphQL scalars.

use std::fmt::Display;

use crate::{
    error::{CompileError, CompileResult},
    metadata::ColumnMetadata,
};

/// The closed set of scalars a column can be exposed as.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    ID,
    /// Custom scalar, declared in the artifact header
    Date,
}

impl ScalarKind {
    pub const ALL: &'static [ScalarKind] = &[
        ScalarKind::Int,
        ScalarKind::Float,
        ScalarKind::String,
        ScalarKind::Boolean,
        ScalarKind::ID,
        ScalarKind::Date,
    ];
    pub const CUSTOM: &'static [ScalarKind] = &[ScalarKind::Date];

    pub fn graphql_name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::ID => "ID",
            Self::Date => "Date",
        }
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.graphql_name())
    }
}

/// The type category of a column.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogicalType {
    Scalar(ScalarKind),
    /// One-dimensional array of non-null scalars
    Array(ScalarKind),
}

/// Keyed by `udt_name`. Array ids are the same names prefixed with `_`.
const NATIVE_SCALARS: &[(&str, ScalarKind)] = &[
    ("int2", ScalarKind::Int),
    ("int4", ScalarKind::Int),
    // beyond the range of a GraphQL Int
    ("int8", ScalarKind::String),
    ("numeric", ScalarKind::String),
    ("money", ScalarKind::String),
    ("float4", ScalarKind::Float),
    ("float8", ScalarKind::Float),
    ("text", ScalarKind::String),
    ("varchar", ScalarKind::String),
    ("bpchar", ScalarKind::String),
    ("char", ScalarKind::String),
    ("name", ScalarKind::String),
    ("citext", ScalarKind::String),
    ("bool", ScalarKind::Boolean),
    ("uuid", ScalarKind::ID),
    ("date", ScalarKind::Date),
    ("timestamp", ScalarKind::Date),
    ("timestamptz", ScalarKind::Date),
];

fn lookup(udt_name: &str) -> Option<ScalarKind> {
    NATIVE_SCALARS
        .iter()
        .find(|(native, _)| *native == udt_name)
        .map(|(_, kind)| *kind)
}

fn unknown_type(native_type: &str, column: &ColumnMetadata) -> CompileError {
    CompileError::UnknownType {
        native_type: native_type.to_string(),
        column: Box::new(column.clone()),
    }
}

/// Map the scalar type of a non-array column.
pub fn map_scalar(column: &ColumnMetadata) -> CompileResult<ScalarKind> {
    lookup(&column.udt_name).ok_or_else(|| unknown_type(&column.udt_name, column))
}

/// Map the element type of an array column (`_text` -> `String`).
pub fn map_array_element(column: &ColumnMetadata) -> CompileResult<ScalarKind> {
    column
        .udt_name
        .strip_prefix('_')
        .and_then(lookup)
        .ok_or_else(|| unknown_type(&column.udt_name, column))
}

pub fn logical_type(column: &ColumnMetadata) -> CompileResult<LogicalType> {
    if column.is_array() {
        map_array_element(column).map(LogicalType::Array)
    } else {
        map_scalar(column).map(LogicalType::Scalar)
    }
}

/// The SQL spelling of the element type, used in array casts.
pub fn element_sql_type(column: &ColumnMetadata) -> &str {
    if column.is_array() {
        column
            .udt_name
            .strip_prefix('_')
            .unwrap_or(&column.udt_name)
    } else {
        &column.udt_name
    }
}
