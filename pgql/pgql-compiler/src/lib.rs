//! Compiles relational database metadata into a GraphQL schema.
//!
//! Every table becomes an object type backed by a SQL fragment template. The
//! fragment filters by the caller's query arguments, and foreign keys become
//! join-backed fields in both directions.

#![forbid(unsafe_code)]

use tracing::error;

pub mod assemble;
pub mod config;
pub mod error;
pub mod fields;
pub mod metadata;
pub mod naming;
pub mod predicate;
pub mod query_root;
pub mod render;
pub mod schema;
pub mod sql;
pub mod sql_bind;
pub mod sql_eval;
pub mod symbol;
pub mod types;

pub use assemble::compile;
pub use config::CompileConfig;
pub use error::{CompileError, CompileResult, ErrorCategory};
pub use metadata::{Catalog, ColumnMetadata, ForeignKeyRelation, MetadataSnapshot};

/// Compile the catalog and render the schema text.
pub fn generate(catalog: &Catalog, config: &CompileConfig) -> CompileResult<String> {
    compile(catalog, config)
        .map(|schema| schema.render())
        .inspect_err(|err| error!("schema compile failed: {err}"))
}
