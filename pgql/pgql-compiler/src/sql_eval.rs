//! In-memory evaluation of bound predicates against JSON rows.
//!
//! Follows SQL three-valued logic: NULL is represented by [Value::Null] and a
//! row only matches when the predicate evaluates to `TRUE`.

use serde_json::Value;

use crate::sql::{Expr, Literal};

pub type Row = serde_json::Map<String, Value>;

#[derive(displaydoc::Display, Debug)]
pub enum EvalError {
    /// unbound argument `{0}`
    UnboundArgument(String),
    /// parameter index {0} out of range
    ParamOutOfRange(usize),
    /// {0} expects array operands
    ExpectedArray(&'static str),
    /// {0} cannot be evaluated on a row
    Unsupported(&'static str),
}

impl std::error::Error for EvalError {}

pub fn matches(expr: &Expr, row: &Row, params: &[Value]) -> Result<bool, EvalError> {
    Ok(eval(expr, row, params)? == Value::Bool(true))
}

pub fn eval(expr: &Expr, row: &Row, params: &[Value]) -> Result<Value, EvalError> {
    match expr {
        Expr::Path(path) => Ok(row.get(path.column).cloned().unwrap_or(Value::Null)),
        Expr::Literal(Literal::Bool(bool)) => Ok(Value::Bool(*bool)),
        Expr::Literal(Literal::Null) => Ok(Value::Null),
        Expr::Param(param) => params
            .get(param.0)
            .cloned()
            .ok_or(EvalError::ParamOutOfRange(param.0)),
        Expr::ArgTest(_, arg) | Expr::Arg(arg) => Err(EvalError::UnboundArgument(arg.to_string())),
        Expr::Cast(expr, _) => eval(expr, row, params),
        Expr::And(clauses) => {
            let mut result = Value::Bool(true);
            for clause in clauses {
                match eval(clause, row, params)? {
                    Value::Bool(false) => return Ok(Value::Bool(false)),
                    Value::Bool(true) => {}
                    _ => result = Value::Null,
                }
            }
            Ok(result)
        }
        Expr::Eq(a, b) => {
            let a = eval(a, row, params)?;
            match &**b {
                Expr::Any(array) => {
                    let array = eval(array, row, params)?;
                    eq_any(&a, &array)
                }
                b => {
                    let b = eval(b, row, params)?;
                    if a.is_null() || b.is_null() {
                        Ok(Value::Null)
                    } else {
                        Ok(Value::Bool(a == b))
                    }
                }
            }
        }
        Expr::IsNull(expr) => Ok(Value::Bool(eval(expr, row, params)?.is_null())),
        Expr::Overlaps(a, b) => {
            let a = eval(a, row, params)?;
            let b = eval(b, row, params)?;
            overlaps(&a, &b)
        }
        Expr::Case(case) => match eval(&case.when, row, params)? {
            Value::Bool(true) => eval(&case.then, row, params),
            _ => match &case.else_ {
                Some(else_) => eval(else_, row, params),
                None => Ok(Value::Null),
            },
        },
        Expr::Any(_) => Err(EvalError::Unsupported("ANY outside of =")),
        Expr::Asterisk => Err(EvalError::Unsupported("*")),
    }
}

/// a = ANY(array)
fn eq_any(a: &Value, array: &Value) -> Result<Value, EvalError> {
    let items = match array {
        Value::Null => return Ok(Value::Null),
        Value::Array(items) => items,
        _ => return Err(EvalError::ExpectedArray("ANY")),
    };

    if a.is_null() {
        return Ok(Value::Null);
    }

    if items.iter().any(|item| item == a) {
        Ok(Value::Bool(true))
    } else if items.iter().any(Value::is_null) {
        Ok(Value::Null)
    } else {
        Ok(Value::Bool(false))
    }
}

/// a && b
fn overlaps(a: &Value, b: &Value) -> Result<Value, EvalError> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => Ok(Value::Null),
        (Value::Array(a), Value::Array(b)) => Ok(Value::Bool(
            a.iter()
                .filter(|item| !item.is_null())
                .any(|item| b.contains(item)),
        )),
        _ => Err(EvalError::ExpectedArray("&&")),
    }
}
