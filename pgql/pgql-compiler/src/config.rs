use serde::{Deserialize, Serialize};

pub const DEFAULT_SCHEMA_NAME: &str = "public";

/// Settings consumed by the compiler core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// The database schema the tables live in
    #[serde(alias = "schemaName")]
    pub schema_name: String,
    /// Tables that never appear in the generated schema
    #[serde(alias = "excludeTables")]
    pub exclude_tables: Vec<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
            exclude_tables: vec![],
        }
    }
}

impl CompileConfig {
    pub fn is_excluded(&self, table_name: &str) -> bool {
        self.exclude_tables.iter().any(|excluded| excluded == table_name)
    }
}
