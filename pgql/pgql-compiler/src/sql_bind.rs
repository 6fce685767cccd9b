//! Binding of fragment templates to the arguments of one concrete query.
//!
//! Boolean holes are decided up front, which lets every `CASE` collapse to the
//! branch it would take. Value holes turn into positional parameters.

use serde_json::Value;

use crate::sql::{Case, Expr, Limit, Literal, OrderBy, Param, Probe, Select};

/// Caller supplied arguments. A missing key is an absent argument.
pub type Args = serde_json::Map<String, Value>;

/// SQL text plus the parameters it refers to, in `$1..$n` order.
#[derive(Clone, PartialEq, Debug)]
pub struct BoundQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// A bound expression plus the parameters it refers to.
#[derive(Clone, PartialEq, Debug)]
pub struct BoundExpr<'a> {
    pub expr: Expr<'a>,
    pub params: Vec<Value>,
}

impl Probe {
    pub fn test(self, arg: Option<&Value>) -> bool {
        match self {
            Self::Absent => arg.is_none(),
            Self::Null => matches!(arg, Some(Value::Null)),
            Self::NonEmptyList => matches!(arg, Some(Value::Array(items)) if !items.is_empty()),
            Self::Number => matches!(arg, Some(Value::Number(_))),
        }
    }
}

impl<'a> Select<'a> {
    pub fn bind(&self, args: &Args) -> BoundQuery {
        let mut binder = Binder::new(args);

        let select = Select {
            expressions: self.expressions.clone(),
            from: self.from.clone(),
            where_: self.where_.as_ref().map(|expr| binder.bind(expr)),
            order_by: OrderBy {
                expressions: self
                    .order_by
                    .expressions
                    .iter()
                    .map(|expr| binder.bind(expr))
                    .collect(),
            },
            limit: Limit {
                limit: binder.bind_optional(self.limit.limit.as_ref()),
                offset: binder.bind_optional(self.limit.offset.as_ref()),
            },
        };

        BoundQuery {
            sql: select.to_string(),
            params: binder.params,
        }
    }
}

pub fn bind_expr<'a>(expr: &Expr<'a>, args: &Args) -> BoundExpr<'a> {
    let mut binder = Binder::new(args);
    let expr = binder.bind(expr);

    BoundExpr {
        expr,
        params: binder.params,
    }
}

struct Binder<'b> {
    args: &'b Args,
    params: Vec<Value>,
}

impl<'b> Binder<'b> {
    fn new(args: &'b Args) -> Self {
        Self {
            args,
            params: vec![],
        }
    }

    /// A clause that binds to NULL is dropped
    fn bind_optional<'a>(&mut self, expr: Option<&Expr<'a>>) -> Option<Expr<'a>> {
        match self.bind(expr?) {
            Expr::Literal(Literal::Null) => None,
            bound => Some(bound),
        }
    }

    fn bind<'a>(&mut self, expr: &Expr<'a>) -> Expr<'a> {
        match expr {
            Expr::ArgTest(probe, arg) => {
                Expr::Literal(Literal::Bool(probe.test(self.args.get(arg.as_str()))))
            }
            Expr::Arg(arg) => {
                let value = self.args.get(arg.as_str()).cloned().unwrap_or(Value::Null);
                self.params.push(value);
                Expr::Param(Param(self.params.len() - 1))
            }
            Expr::Case(case) => self.bind_case(case),
            Expr::And(clauses) => {
                let checkpoint = self.params.len();
                let mut bound_clauses = Vec::with_capacity(clauses.len());

                for clause in clauses {
                    match self.bind(clause) {
                        Expr::Literal(Literal::Bool(true)) => {}
                        Expr::Literal(Literal::Bool(false)) => {
                            self.params.truncate(checkpoint);
                            return Expr::FALSE;
                        }
                        bound => bound_clauses.push(bound),
                    }
                }

                Expr::and(bound_clauses)
            }
            Expr::Cast(expr, sql_type) => Expr::cast(self.bind(expr), *sql_type),
            Expr::Eq(a, b) => Expr::eq(self.bind(a), self.bind(b)),
            Expr::IsNull(expr) => Expr::is_null(self.bind(expr)),
            Expr::Any(expr) => Expr::any(self.bind(expr)),
            Expr::Overlaps(a, b) => Expr::overlaps(self.bind(a), self.bind(b)),
            Expr::Asterisk | Expr::Path(_) | Expr::Literal(_) | Expr::Param(_) => expr.clone(),
        }
    }

    fn bind_case<'a>(&mut self, case: &Case<'a>) -> Expr<'a> {
        match self.bind(&case.when) {
            Expr::Literal(Literal::Bool(true)) => self.bind(&case.then),
            Expr::Literal(Literal::Bool(false) | Literal::Null) => match &case.else_ {
                Some(else_) => self.bind(else_),
                None => Expr::NULL,
            },
            when => {
                let then = self.bind(&case.then);
                let else_ = case.else_.as_ref().map(|else_| self.bind(else_));
                Expr::case(when, then, else_)
            }
        }
    }
}
