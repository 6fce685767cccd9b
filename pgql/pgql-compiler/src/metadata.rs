//! Structural metadata of the database, as delivered by the metadata loader.
//!
//! The loader runs [COLUMNS_QUERY] and [FOREIGN_KEYS_QUERY] and hands the rows over
//! unchanged. [Catalog::normalize] turns those rows into the per-table maps the
//! compiler works on.

use fnv::FnvHashMap;
use indexmap::IndexMap;
use indoc::indoc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompileConfig;

/// Lists every column of the schema `$1`, skipping the tables in `$2`.
pub const COLUMNS_QUERY: &str = indoc! {r#"
    SELECT
        c.table_schema::TEXT,
        c.table_name::TEXT,
        c.column_name::TEXT,
        c.is_nullable <> 'NO' AS is_nullable,
        EXISTS (
            SELECT 1
            FROM information_schema.table_constraints AS tc
            JOIN information_schema.key_column_usage AS kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
            WHERE tc.constraint_type = 'PRIMARY KEY'
                AND tc.table_schema = c.table_schema
                AND tc.table_name = c.table_name
                AND kcu.column_name = c.column_name
        ) AS is_primary,
        c.udt_name::TEXT,
        c.data_type::TEXT
    FROM information_schema.columns AS c
    WHERE c.table_schema = $1
        AND NOT (c.table_name = ANY($2::TEXT[]))
        AND c.ordinal_position > 0
    ORDER BY c.table_name, c.ordinal_position
"#};

/// Lists every foreign key edge of the schema `$1`, skipping edges touching the tables in `$2`.
pub const FOREIGN_KEYS_QUERY: &str = indoc! {r#"
    SELECT
        tc.table_schema::TEXT,
        tc.table_name::TEXT,
        kcu.column_name::TEXT,
        ccu.table_name::TEXT AS foreign_table_name,
        ccu.column_name::TEXT AS foreign_column_name
    FROM information_schema.table_constraints AS tc
    JOIN information_schema.key_column_usage AS kcu
        ON tc.constraint_name = kcu.constraint_name
        AND tc.table_schema = kcu.table_schema
    JOIN information_schema.constraint_column_usage AS ccu
        ON ccu.constraint_name = tc.constraint_name
        AND ccu.table_schema = tc.table_schema
    WHERE tc.constraint_type = 'FOREIGN KEY'
        AND tc.table_schema = $1
        AND NOT (tc.table_name = ANY($2::TEXT[]))
        AND NOT (ccu.table_name = ANY($2::TEXT[]))
"#};

/// One physical column. Identity is `(table_name, column_name)`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ColumnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_schema: Option<String>,
    pub table_name: String,
    pub column_name: String,
    pub is_nullable: bool,
    pub is_primary: bool,
    /// Native type identifier, e.g. `int4` or `_text`
    #[serde(alias = "native_type_id")]
    pub udt_name: String,
    /// Type category as reported by information_schema, e.g. `integer` or `ARRAY`
    #[serde(alias = "logical_type")]
    pub data_type: String,
}

impl ColumnMetadata {
    pub fn is_array(&self) -> bool {
        self.data_type == "ARRAY"
    }
}

/// One directed foreign key edge: `owning_table.owning_column -> referenced_table.referenced_column`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ForeignKeyRelation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_schema: Option<String>,
    #[serde(alias = "table_name")]
    pub owning_table: String,
    #[serde(alias = "column_name")]
    pub owning_column: String,
    #[serde(alias = "foreign_table_name")]
    pub referenced_table: String,
    #[serde(alias = "foreign_column_name")]
    pub referenced_column: String,
}

/// The raw rows of one introspection run.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    pub columns: Vec<ColumnMetadata>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRelation>,
}

impl MetadataSnapshot {
    pub fn into_catalog(self, config: &CompileConfig) -> Catalog {
        Catalog::normalize(self.columns, self.foreign_keys, config)
    }
}

/// Normalized, read-only view of one metadata snapshot.
#[derive(Default, Debug)]
pub struct Catalog {
    tables: IndexMap<String, Vec<ColumnMetadata>>,
    owned: FnvHashMap<String, Vec<ForeignKeyRelation>>,
    referencing: FnvHashMap<String, Vec<ForeignKeyRelation>>,
}

impl Catalog {
    /// Group rows per table, dropping everything outside the configured schema
    /// or belonging to an excluded table.
    ///
    /// Table order is the order of first appearance, column order is row order.
    pub fn normalize(
        columns: impl IntoIterator<Item = ColumnMetadata>,
        foreign_keys: impl IntoIterator<Item = ForeignKeyRelation>,
        config: &CompileConfig,
    ) -> Self {
        let in_schema = |schema: &Option<String>| match schema {
            Some(schema) => schema == &config.schema_name,
            None => true,
        };

        let mut catalog = Self::default();

        for column in columns {
            if !in_schema(&column.table_schema) || config.is_excluded(&column.table_name) {
                continue;
            }

            catalog
                .tables
                .entry(column.table_name.clone())
                .or_default()
                .push(column);
        }

        for foreign_key in foreign_keys {
            if !in_schema(&foreign_key.table_schema)
                || config.is_excluded(&foreign_key.owning_table)
                || config.is_excluded(&foreign_key.referenced_table)
            {
                debug!(
                    "dropping foreign key {}.{} -> {}.{}",
                    foreign_key.owning_table,
                    foreign_key.owning_column,
                    foreign_key.referenced_table,
                    foreign_key.referenced_column
                );
                continue;
            }

            catalog
                .referencing
                .entry(foreign_key.referenced_table.clone())
                .or_default()
                .push(foreign_key.clone());
            catalog
                .owned
                .entry(foreign_key.owning_table.clone())
                .or_default()
                .push(foreign_key);
        }

        catalog
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &[ColumnMetadata])> {
        self.tables
            .iter()
            .map(|(table_name, columns)| (table_name.as_str(), columns.as_slice()))
    }

    pub fn columns(&self, table_name: &str) -> Option<&[ColumnMetadata]> {
        self.tables.get(table_name).map(Vec::as_slice)
    }

    /// Foreign keys whose owning column lives in `table_name`
    pub fn owned_foreign_keys(&self, table_name: &str) -> &[ForeignKeyRelation] {
        self.owned.get(table_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Foreign keys that point at `table_name`
    pub fn referencing_foreign_keys(&self, table_name: &str) -> &[ForeignKeyRelation] {
        self.referencing
            .get(table_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
