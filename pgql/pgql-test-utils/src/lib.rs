#![forbid(unsafe_code)]

use pgql_compiler::{
    Catalog, ColumnMetadata, CompileConfig, CompileError, ForeignKeyRelation, MetadataSnapshot,
};
use tracing::info;

mod init_tracing;

pub use init_tracing::init_test_tracing;

/// Workaround for `pretty_assertions::assert_eq` arguments appearing
/// in a (slightly?) unnatural order. The _expected_ expression ideally comes first,
/// in order to show the most sensible colored diff.
/// This macro makes expected and actual explicit, and supports any order by using keyword arguments.
#[macro_export]
macro_rules! expect_eq {
    (expected = $expected:expr, actual = $actual:expr $(,)?) => {
        pretty_assertions::assert_eq!($expected, $actual);
    };
    (actual = $actual:expr, expected = $expected:expr $(,)?) => {
        pretty_assertions::assert_eq!($expected, $actual);
    };
}

#[macro_export]
macro_rules! assert_error_msg {
    ($e:expr, $msg:expr) => {
        match $e {
            Ok(v) => panic!("Expected error, was Ok({v:?})"),
            Err(e) => pretty_assertions::assert_eq!($msg, format!("{e}").trim()),
        }
    };
}

/// Builder for metadata snapshots, shaped like the rows the introspection queries return.
#[derive(Default, Clone)]
pub struct TestCatalog {
    columns: Vec<ColumnMetadata>,
    foreign_keys: Vec<ForeignKeyRelation>,
    config: CompileConfig,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: MetadataSnapshot) -> Self {
        Self {
            columns: snapshot.columns,
            foreign_keys: snapshot.foreign_keys,
            config: CompileConfig::default(),
        }
    }

    /// Read a snapshot file in the `{"columns": [...], "foreign_keys": [...]}` format.
    pub fn from_json(json: &str) -> Self {
        Self::from_snapshot(serde_json::from_str(json).expect("invalid metadata snapshot"))
    }

    pub fn table(mut self, table_name: &str, build: impl FnOnce(TestTable) -> TestTable) -> Self {
        let table = build(TestTable {
            table_name: table_name.to_string(),
            columns: vec![],
        });
        self.columns.extend(table.columns);
        self
    }

    /// `owning_table.owning_column -> referenced_table.referenced_column`
    pub fn foreign_key(mut self, owning: (&str, &str), referenced: (&str, &str)) -> Self {
        self.foreign_keys.push(ForeignKeyRelation {
            table_schema: None,
            owning_table: owning.0.to_string(),
            owning_column: owning.1.to_string(),
            referenced_table: referenced.0.to_string(),
            referenced_column: referenced.1.to_string(),
        });
        self
    }

    pub fn exclude(mut self, table_name: &str) -> Self {
        self.config.exclude_tables.push(table_name.to_string());
        self
    }

    pub fn schema_name(mut self, schema_name: &str) -> Self {
        self.config.schema_name = schema_name.to_string();
        self
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    pub fn snapshot(&self) -> MetadataSnapshot {
        MetadataSnapshot {
            columns: self.columns.clone(),
            foreign_keys: self.foreign_keys.clone(),
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.snapshot().into_catalog(&self.config)
    }

    /// Compile and render, panicking on compile errors.
    pub fn generate(&self) -> String {
        match pgql_compiler::generate(&self.catalog(), &self.config) {
            Ok(artifact) => {
                info!("generated schema:\n{artifact}");
                artifact
            }
            Err(error) => panic!("compile failed: {error}"),
        }
    }

    /// Compile, expecting an error.
    pub fn compile_fail(&self) -> CompileError {
        match pgql_compiler::generate(&self.catalog(), &self.config) {
            Ok(artifact) => panic!("expected a compile error, got:\n{artifact}"),
            Err(error) => error,
        }
    }
}

/// The columns of one table, in declaration order.
pub struct TestTable {
    table_name: String,
    columns: Vec<ColumnMetadata>,
}

impl TestTable {
    /// A non-null column. A `udt_name` starting with `_` is an array type.
    ///
    /// `data_type` is filled in the way `information_schema.columns` reports it.
    pub fn column(mut self, column_name: &str, udt_name: &str) -> Self {
        self.columns.push(ColumnMetadata {
            table_schema: None,
            table_name: self.table_name.clone(),
            column_name: column_name.to_string(),
            is_nullable: false,
            is_primary: false,
            udt_name: udt_name.to_string(),
            data_type: data_type(udt_name).to_string(),
        });
        self
    }

    /// A non-null `int4` primary key column.
    pub fn pk(self, column_name: &str) -> Self {
        self.column(column_name, "int4").primary()
    }

    /// Make the last column part of the primary key.
    pub fn primary(mut self) -> Self {
        self.last_column().is_primary = true;
        self
    }

    /// Make the last column nullable.
    pub fn nullable(mut self) -> Self {
        self.last_column().is_nullable = true;
        self
    }

    fn last_column(&mut self) -> &mut ColumnMetadata {
        self.columns
            .last_mut()
            .expect("declare a column before modifying it")
    }
}

/// The `information_schema` type category of a native type.
fn data_type(udt_name: &str) -> &'static str {
    if udt_name.starts_with('_') {
        return "ARRAY";
    }

    match udt_name {
        "int2" => "smallint",
        "int4" => "integer",
        "int8" => "bigint",
        "float4" => "real",
        "float8" => "double precision",
        "numeric" => "numeric",
        "money" => "money",
        "text" => "text",
        "varchar" => "character varying",
        "bpchar" => "character",
        "char" => "\"char\"",
        "name" => "name",
        "bool" => "boolean",
        "uuid" => "uuid",
        "date" => "date",
        "timestamp" => "timestamp without time zone",
        "timestamptz" => "timestamp with time zone",
        "json" => "json",
        "jsonb" => "jsonb",
        _ => "USER-DEFINED",
    }
}
