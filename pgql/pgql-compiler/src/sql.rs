//! SQL fragment templates.
//!
//! A template is plain SQL with holes (`${...}`) that are filled in by the query
//! planner when the caller's arguments are known, see [crate::sql_bind].

use std::fmt::Display;

use compact_str::CompactString;
use itertools::Itertools;

pub struct Ident<T>(pub T);

impl<T: AsRef<str>> Display for Ident<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"")?;

        let str = self.0.as_ref();
        let mut prev = 0;

        for (index, ch) in str.char_indices() {
            if ch == '"' {
                write!(f, "{}", &str[prev..index])?;
                prev = index;

                // a standalone '"' is escaped by inserting another '"':
                write!(f, "\"")?;
            }
        }

        write!(f, "{}\"", &str[prev..str.len()])
    }
}

/// Name of a row source inside a fragment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Alias<'a> {
    /// The table's own name used as alias
    Table(&'a str),
    /// The parent side of a join, assigned by the planner
    Parent,
    /// The child side of a join, assigned by the planner
    Child,
}

impl Display for Alias<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table(table_name) => write!(f, "{}", Ident(table_name)),
            Self::Parent => write!(f, "${{parent}}"),
            Self::Child => write!(f, "${{child}}"),
        }
    }
}

/// schema.table
#[derive(Clone, Copy, Debug)]
pub struct TableName<'a>(pub &'a str, pub &'a str);

impl<'a> TableName<'a> {
    pub fn as_(self, alias: Alias<'a>) -> FromItem<'a> {
        FromItem::TableNameAs(self, alias)
    }
}

impl Display for TableName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", Ident(self.0), Ident(self.1))
    }
}

#[derive(Clone, Debug)]
pub enum FromItem<'a> {
    TableName(TableName<'a>),
    TableNameAs(TableName<'a>, Alias<'a>),
}

impl Display for FromItem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TableName(table_name) => write!(f, "{table_name}"),
            Self::TableNameAs(table_name, alias) => write!(f, "{table_name} AS {alias}"),
        }
    }
}

/// The backing query of a type.
#[derive(Clone, Debug)]
pub struct Select<'a> {
    pub expressions: Vec<Expr<'a>>,
    pub from: FromItem<'a>,
    pub where_: Option<Expr<'a>>,
    pub order_by: OrderBy<'a>,
    pub limit: Limit<'a>,
}

#[derive(Clone, Default, Debug)]
pub struct OrderBy<'a> {
    pub expressions: Vec<Expr<'a>>,
}

/// LIMIT and OFFSET, each rendered only when present
#[derive(Clone, Default, Debug)]
pub struct Limit<'a> {
    pub limit: Option<Expr<'a>>,
    pub offset: Option<Expr<'a>>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Expr<'a> {
    /// *
    Asterisk,
    /// alias."column"
    Path(Path<'a>),
    Literal(Literal),
    /// positional parameter of a bound query
    Param(Param),
    /// boolean hole, tests an argument: ${absent(args.name)}
    ArgTest(Probe, CompactString),
    /// value hole, substitutes an argument: ${args.name}
    Arg(CompactString),
    /// a::type
    Cast(Box<Expr<'a>>, SqlType<'a>),
    /// a AND b
    And(Vec<Expr<'a>>),
    /// a = b
    Eq(Box<Expr<'a>>, Box<Expr<'a>>),
    /// a IS NULL
    IsNull(Box<Expr<'a>>),
    /// ANY(a)
    Any(Box<Expr<'a>>),
    /// a && b
    Overlaps(Box<Expr<'a>>, Box<Expr<'a>>),
    Case(Box<Case<'a>>),
}

impl<'a> Expr<'a> {
    pub const TRUE: Self = Self::Literal(Literal::Bool(true));
    pub const FALSE: Self = Self::Literal(Literal::Bool(false));
    pub const NULL: Self = Self::Literal(Literal::Null);

    pub fn path(alias: Alias<'a>, column: &'a str) -> Self {
        Self::Path(Path { alias, column })
    }

    pub fn arg_test(probe: Probe, arg: impl Into<CompactString>) -> Self {
        Self::ArgTest(probe, arg.into())
    }

    pub fn arg(arg: impl Into<CompactString>) -> Self {
        Self::Arg(arg.into())
    }

    pub fn cast(expr: impl Into<Self>, sql_type: SqlType<'a>) -> Self {
        Self::Cast(Box::new(expr.into()), sql_type)
    }

    pub fn eq(a: impl Into<Self>, b: impl Into<Self>) -> Self {
        Self::Eq(Box::new(a.into()), Box::new(b.into()))
    }

    pub fn is_null(expr: impl Into<Self>) -> Self {
        Self::IsNull(Box::new(expr.into()))
    }

    pub fn any(expr: impl Into<Self>) -> Self {
        Self::Any(Box::new(expr.into()))
    }

    pub fn overlaps(a: impl Into<Self>, b: impl Into<Self>) -> Self {
        Self::Overlaps(Box::new(a.into()), Box::new(b.into()))
    }

    pub fn case(when: Self, then: Self, else_: Option<Self>) -> Self {
        Self::Case(Box::new(Case { when, then, else_ }))
    }

    /// Conjunction that does not nest a single clause
    pub fn and(mut clauses: Vec<Self>) -> Self {
        match clauses.len() {
            0 => Self::TRUE,
            1 => clauses.pop().unwrap_or(Self::TRUE),
            _ => Self::And(clauses),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Path<'a> {
    pub alias: Alias<'a>,
    pub column: &'a str,
}

impl<'a> From<Path<'a>> for Expr<'a> {
    fn from(value: Path<'a>) -> Self {
        Self::Path(value)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Literal {
    Bool(bool),
    Null,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Param(pub usize);

/// What a boolean hole asks about its argument.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Probe {
    /// The caller did not provide the argument
    Absent,
    /// The argument is an explicit null
    Null,
    /// The argument is a list with at least one element
    NonEmptyList,
    /// The argument is a number
    Number,
}

impl Probe {
    fn name(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::NonEmptyList => "non_empty",
            Self::Number => "number",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SqlType<'a> {
    pub name: &'a str,
    pub array: bool,
}

impl<'a> SqlType<'a> {
    pub const INT: SqlType<'static> = SqlType {
        name: "INT",
        array: false,
    };

    pub fn array_of(name: &'a str) -> Self {
        Self { name, array: true }
    }
}

/// CASE WHEN a THEN b [ELSE c] END
#[derive(Clone, PartialEq, Debug)]
pub struct Case<'a> {
    pub when: Expr<'a>,
    pub then: Expr<'a>,
    pub else_: Option<Expr<'a>>,
}

impl Display for Select<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SELECT {e} FROM {from}",
            e = self.expressions.iter().format(","),
            from = self.from
        )?;

        match &self.where_ {
            Some(Expr::And(clauses)) => {
                write!(f, "\nWHERE {}", clauses.iter().format("\n  AND "))?;
            }
            Some(condition) => {
                write!(f, "\nWHERE {condition}")?;
            }
            None => {}
        }

        write!(f, "{}", self.order_by)?;
        write!(f, "{}", self.limit)
    }
}

impl Display for OrderBy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.expressions.is_empty() {
            return Ok(());
        }

        write!(f, "\nORDER BY {}", self.expressions.iter().format(", "))
    }
}

impl Display for Limit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(limit) = &self.limit {
            write!(f, "\nLIMIT {limit}")?;
        }

        if let Some(offset) = &self.offset {
            write!(f, "\nOFFSET {offset}")?;
        }

        Ok(())
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asterisk => write!(f, "*"),
            Self::Path(path) => write!(f, "{path}"),
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Param(param) => write!(f, "{param}"),
            Self::ArgTest(probe, arg) => write!(f, "${{{}(args.{arg})}}", probe.name()),
            Self::Arg(arg) => write!(f, "${{args.{arg}}}"),
            Self::Cast(expr, sql_type) => write!(f, "{expr}::{sql_type}"),
            Self::And(clauses) if clauses.is_empty() => write!(f, "TRUE"),
            Self::And(clauses) => write!(f, "{}", clauses.iter().format(" AND ")),
            Self::Eq(a, b) => write!(f, "{a} = {b}"),
            Self::IsNull(expr) => write!(f, "{expr} IS NULL"),
            Self::Any(expr) => write!(f, "ANY({expr})"),
            Self::Overlaps(a, b) => write!(f, "{a} && {b}"),
            Self::Case(case) => write!(f, "{case}"),
        }
    }
}

impl Display for Path<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.alias, Ident(self.column))
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(true) => write!(f, "TRUE"),
            Self::Bool(false) => write!(f, "FALSE"),
            Self::Null => write!(f, "NULL"),
        }
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0 + 1)
    }
}

impl Display for SqlType<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.array {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

impl Display for Case<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CASE WHEN {} THEN {}", self.when, self.then)?;

        if let Some(else_) = &self.else_ {
            write!(f, " ELSE {else_}")?;
        }

        write!(f, " END")
    }
}
