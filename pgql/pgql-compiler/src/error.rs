use compact_str::CompactString;
use thiserror::Error;

use crate::metadata::ColumnMetadata;

pub type CompileResult<T> = Result<T, CompileError>;

/// Every error aborts the whole compile; no partial artifact is produced.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("No primary column for table {table}")]
    NoPrimaryKey { table: String },
    #[error("Unhandled postgres column type: {native_type}: {column:?}")]
    UnknownType {
        native_type: String,
        column: Box<ColumnMetadata>,
    },
    #[error("Reference to unknown column {table}.{column}")]
    DanglingReference { table: String, column: String },
    #[error("Type name {type_name} is derived from more than one table: {tables:?}")]
    DuplicateTypeName {
        type_name: CompactString,
        tables: Vec<String>,
    },
    #[error("Type name {type_name} of table {table} is reserved")]
    ReservedTypeName {
        type_name: CompactString,
        table: String,
    },
    #[error("Field {field_name} is defined more than once in type {type_name}")]
    DuplicateField {
        type_name: CompactString,
        field_name: CompactString,
    },
    #[error("Argument {argument} is defined more than once on query field {field_name}")]
    DuplicateArgument {
        field_name: CompactString,
        argument: CompactString,
    },
    #[error("Cannot derive a type name from an empty identifier")]
    EmptyName,
}

/// Who is expected to act on an error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorCategory {
    /// Fixable by the operator, by excluding a table or changing the database schema.
    Operator,
    /// The metadata snapshot is not internally consistent.
    Consistency,
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoPrimaryKey { .. }
            | Self::UnknownType { .. }
            | Self::DuplicateTypeName { .. }
            | Self::ReservedTypeName { .. }
            | Self::DuplicateField { .. }
            | Self::DuplicateArgument { .. } => ErrorCategory::Operator,
            Self::DanglingReference { .. } | Self::EmptyName => ErrorCategory::Consistency,
        }
    }
}
