//! The two renderings of an expression.
//!
//! Booleans live in Java `int`s, so every expression has a *value* form
//! that is an int expression, and a *predicate* form that is a boolean
//! expression for use in control-flow conditions. The two coincide for
//! neither side: a comparison's value needs a ternary wrapper, an int's
//! predicate needs a zero test.

use crate::ast::{BinaryOp, Expr, UnaryOp};

/// The expression as a Java value (an `int` expression).
pub fn value_form(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => n.to_string(),
        Expr::Bool(true) => "1".to_string(),
        Expr::Bool(false) => "0".to_string(),
        Expr::Variable { name } => name.source.to_string(),
        Expr::Unary {
            operator: UnaryOp::Negate,
            operand,
        } => format!("(-{})", value_form(&operand.0)),
        // boolean-shaped nodes materialize their truth value as 0/1
        Expr::Unary {
            operator: UnaryOp::Not,
            ..
        }
        | Expr::Binary {
            operator: BinaryOp::Relational(_) | BinaryOp::Logic(_),
            ..
        } => format!("({} ? 1 : 0)", predicate_form(expr)),
        Expr::Binary {
            operator: BinaryOp::Arithmetic(op),
            lhs,
            rhs,
        } => format!(
            "({} {} {})",
            value_form(&lhs.0),
            op.java_symbol(),
            value_form(&rhs.0)
        ),
    }
}

/// The expression as a Java control predicate (a `boolean` expression).
pub fn predicate_form(expr: &Expr) -> String {
    match expr {
        Expr::Bool(b) => b.to_string(),
        Expr::Unary {
            operator: UnaryOp::Not,
            operand,
        } => format!("(!{})", predicate_form(&operand.0)),
        Expr::Binary {
            operator: BinaryOp::Relational(rel),
            lhs,
            rhs,
        } => format!(
            "({} {} {})",
            value_form(&lhs.0),
            rel.java_symbol(),
            value_form(&rhs.0)
        ),
        Expr::Binary {
            operator: BinaryOp::Logic(op),
            lhs,
            rhs,
        } => format!(
            "({} {} {})",
            predicate_form(&lhs.0),
            op.java_symbol(),
            predicate_form(&rhs.0)
        ),
        // everything int-valued tests against zero in condition position
        _ => format!("({} != 0)", value_form(expr)),
    }
}
