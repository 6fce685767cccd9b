//! The compiled schema object model.
//!
//! Everything here is produced by [crate::assemble] and consumed by
//! [crate::render]. Names and SQL borrow from the [crate::metadata::Catalog]
//! they were compiled from.

use std::fmt::Display;

use compact_str::CompactString;

use crate::{
    sql::{Alias, Expr, Select},
    types::ScalarKind,
};

pub struct CompiledSchema<'a> {
    /// One entry per table, in catalog order
    pub types: Vec<TableSchema<'a>>,
    pub query: QueryRoot<'a>,
}

impl<'a> CompiledSchema<'a> {
    pub fn find_type(&self, type_name: &str) -> Option<&TableSchema<'a>> {
        self.types.iter().find(|ty| ty.type_name == type_name)
    }
}

/// The object type derived from one table.
pub struct TableSchema<'a> {
    pub type_name: CompactString,
    pub table_name: &'a str,
    /// The primary key columns, never empty
    pub unique_key: Vec<&'a str>,
    /// The backing query template
    pub sql_table: Select<'a>,
    pub fields: FieldGroups<'a>,
}

impl<'a> TableSchema<'a> {
    pub fn find_field(&self, field_name: &str) -> Option<&FieldDefinition<'a>> {
        self.fields
            .iter()
            .find(|field| field.field_name == field_name)
    }
}

/// The fields of a type, grouped by how they are backed.
#[derive(Default)]
pub struct FieldGroups<'a> {
    pub columns: Vec<FieldDefinition<'a>>,
    pub forward: Vec<FieldDefinition<'a>>,
    pub reverse: Vec<FieldDefinition<'a>>,
}

impl<'a> FieldGroups<'a> {
    /// Non-empty groups in output order
    pub fn groups(&self) -> impl Iterator<Item = &[FieldDefinition<'a>]> {
        [
            self.columns.as_slice(),
            self.forward.as_slice(),
            self.reverse.as_slice(),
        ]
        .into_iter()
        .filter(|group| !group.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition<'a>> {
        self.columns
            .iter()
            .chain(&self.forward)
            .chain(&self.reverse)
    }

    pub fn len(&self) -> usize {
        self.columns.len() + self.forward.len() + self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct FieldDefinition<'a> {
    pub field_name: CompactString,
    pub graphql_type: TypeRef,
    pub source: FieldSource<'a>,
}

impl<'a> FieldDefinition<'a> {
    pub fn nullable(&self) -> bool {
        matches!(self.graphql_type.modifier.outer(), Optionality::Optional)
    }

    pub fn join_directive(&self) -> Option<&JoinDirective<'a>> {
        match &self.source {
            FieldSource::Column(_) => None,
            FieldSource::Join(join) => Some(join),
        }
    }
}

pub enum FieldSource<'a> {
    /// Read straight from a column of the backing query
    Column(&'a str),
    /// Resolved by joining another type's backing query
    Join(JoinDirective<'a>),
}

/// The condition equating a column of the parent with a column of the child.
pub struct JoinDirective<'a> {
    pub on: Expr<'a>,
}

impl<'a> JoinDirective<'a> {
    pub fn new(parent_column: &'a str, child_column: &'a str) -> Self {
        Self {
            on: Expr::eq(
                Expr::path(Alias::Parent, parent_column),
                Expr::path(Alias::Child, child_column),
            ),
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum Optionality {
    #[default]
    Mandatory,
    Optional,
}

impl Optionality {
    pub fn from_optional(optional: bool) -> Self {
        if optional {
            Self::Optional
        } else {
            Self::Mandatory
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TypeModifier {
    Unit(Optionality),
    Array {
        array: Optionality,
        element: Optionality,
    },
}

impl TypeModifier {
    pub fn new_unit(optionality: Optionality) -> Self {
        Self::Unit(optionality)
    }

    /// Optionality of the value itself, whether list or not
    pub fn outer(&self) -> Optionality {
        match self {
            Self::Unit(unit) => *unit,
            Self::Array { array, .. } => *array,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum UnitType {
    Scalar(ScalarKind),
    Object(CompactString),
}

impl Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Object(type_name) => write!(f, "{type_name}"),
        }
    }
}

/// A GraphQL type reference such as `Int`, `User!` or `[Post!]!`
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeRef {
    pub unit: UnitType,
    pub modifier: TypeModifier,
}

impl TypeRef {
    pub fn unit(unit: UnitType, optionality: Optionality) -> Self {
        Self {
            unit,
            modifier: TypeModifier::new_unit(optionality),
        }
    }

    pub fn array(unit: UnitType, array: Optionality, element: Optionality) -> Self {
        Self {
            unit,
            modifier: TypeModifier::Array { array, element },
        }
    }
}

struct Bang(Optionality);

impl Display for Bang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Optionality::Mandatory => write!(f, "!"),
            Optionality::Optional => Ok(()),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.modifier {
            TypeModifier::Unit(unit) => write!(f, "{}{}", self.unit, Bang(unit)),
            TypeModifier::Array { array, element } => {
                write!(f, "[{}{}]{}", self.unit, Bang(element), Bang(array))
            }
        }
    }
}

/// The root `Query` type.
#[derive(Default)]
pub struct QueryRoot<'a> {
    pub fields: Vec<QueryField<'a>>,
}

impl<'a> QueryRoot<'a> {
    pub fn find_field(&self, field_name: &str) -> Option<&QueryField<'a>> {
        self.fields
            .iter()
            .find(|field| field.field_name == field_name)
    }
}

/// A collection field of the root query, always delegated to the query planner.
pub struct QueryField<'a> {
    pub field_name: CompactString,
    pub graphql_type: TypeRef,
    pub arguments: Vec<Argument>,
    pub table_name: &'a str,
}

impl QueryField<'_> {
    pub fn find_argument(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.name == name)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Argument {
    pub name: CompactString,
    pub graphql_type: TypeRef,
}
