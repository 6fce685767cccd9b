//! Serialization of a [CompiledSchema] to GraphQL SDL.

use std::fmt::{Display, Formatter, Result};

use itertools::Itertools;

use crate::{
    query_root::QUERY_TYPE_NAME,
    schema::{Argument, CompiledSchema, FieldDefinition, FieldSource, QueryField, TableSchema},
    types::ScalarKind,
};

const INDENT: &str = "  ";

const DIRECTIVES: &[&str] = &[
    "directive @sqlTable(uniqueKey: [String!]!, fragment: String!) on OBJECT",
    "directive @sqlColumn(name: String!) on FIELD_DEFINITION",
    "directive @sqlJoin(on: String!) on FIELD_DEFINITION",
    "directive @delegate on FIELD_DEFINITION",
];

impl CompiledSchema<'_> {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for CompiledSchema<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for scalar in ScalarKind::CUSTOM {
            writeln!(f, "scalar {scalar}")?;
        }
        writeln!(f)?;

        for directive in DIRECTIVES {
            writeln!(f, "{directive}")?;
        }

        for table in &self.types {
            write!(f, "\n{table}")?;
        }

        write!(f, "\ntype {QUERY_TYPE_NAME}")?;
        if !self.query.fields.is_empty() {
            writeln!(f, " {{")?;
            for field in &self.query.fields {
                writeln!(f, "{INDENT}{field}")?;
            }
            write!(f, "}}")?;
        }

        writeln!(f)
    }
}

impl Display for TableSchema<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(
            f,
            "type {} @sqlTable(uniqueKey: [{}], fragment: {}) {{",
            self.type_name,
            self.unique_key.iter().map(|key| Quoted(key)).format(", "),
            BlockString(&self.sql_table.to_string()),
        )?;

        for (index, group) in self.fields.groups().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for field in group {
                writeln!(f, "{INDENT}{field}")?;
            }
        }

        writeln!(f, "}}")
    }
}

impl Display for FieldDefinition<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {} ", self.field_name, self.graphql_type)?;

        match &self.source {
            FieldSource::Column(column_name) => {
                write!(f, "@sqlColumn(name: {})", Quoted(column_name))
            }
            FieldSource::Join(join) => {
                write!(f, "@sqlJoin(on: {})", Quoted(&join.on.to_string()))
            }
        }
    }
}

impl Display for QueryField<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{}({}): {} @delegate",
            self.field_name,
            self.arguments.iter().format(", "),
            self.graphql_type
        )
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}: {}", self.name, self.graphql_type)
    }
}

/// A GraphQL string value: `"..."`
struct Quoted<'s>(&'s str);

impl Display for Quoted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "\"")?;
        for ch in self.0.chars() {
            match ch {
                '"' => write!(f, "\\\"")?,
                '\\' => write!(f, "\\\\")?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                '\t' => write!(f, "\\t")?,
                ch if ch.is_control() => write!(f, "\\u{:04X}", ch as u32)?,
                ch => write!(f, "{ch}")?,
            }
        }
        write!(f, "\"")
    }
}

/// A GraphQL block string with every line indented, so the value keeps the
/// original text after common indentation is removed.
struct BlockString<'s>(&'s str);

impl Display for BlockString<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "\"\"\"")?;
        for line in self.0.lines() {
            writeln!(f, "{INDENT}{}", line.replace("\"\"\"", "\\\"\"\""))?;
        }
        write!(f, "\"\"\"")
    }
}
