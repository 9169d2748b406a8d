//! The single static pass over the tree: declarations are registered in a
//! [`SymbolTable`], every name use is resolved against it, and every
//! expression gets a type checked at its use site. Fail-fast: the first
//! violation aborts the run.

pub mod symbols;

use crate::ast::{BinaryOp, Block, Expr, Program, Statement, UnaryOp};
use crate::error::{self, SourceMetadata, Span};
use crate::types::DataType;
use symbols::SymbolTable;

pub type SemanticError = error::Error<SemanticErrorKind>;

#[derive(Debug, thiserror::Error)]
pub enum SemanticErrorKind {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("unknown variable `{0}`")]
    UndeclaredVariable(String),
    #[error("variable `{0}` was already declared in this scope")]
    DuplicateDeclaration(String),
    #[error("expected a value of type `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: DataType,
        found: DataType,
    },
}

/// Checks the whole tree against a table built fresh for this run.
pub fn analyze_program(program: &Program, meta: &SourceMetadata) -> Result<(), SemanticError> {
    let mut table = SymbolTable::new();
    for (statement, _) in &program.0 {
        analyze_statement(statement, &mut table, meta)?;
    }
    tracing::debug!(target: "semantic", "analysis finished with {} declared variables", table.len());
    Ok(())
}

fn analyze_statement<'source>(
    statement: &Statement<'source>,
    table: &mut SymbolTable<'source>,
    meta: &SourceMetadata,
) -> Result<(), SemanticError> {
    match statement {
        Statement::Declare {
            type_name,
            name,
            init,
        } => {
            let ty = DataType::from_keyword(type_name.source).ok_or_else(|| {
                error_at(
                    SemanticErrorKind::UnknownType(type_name.source.to_string()),
                    type_name.span,
                    meta,
                )
            })?;
            if !table.declare(name.source, ty) {
                return Err(error_at(
                    SemanticErrorKind::DuplicateDeclaration(name.source.to_string()),
                    name.span,
                    meta,
                ));
            }
            // registered before the initializer is checked, so a declaration
            // may read its own (default) value
            if let Some((init, init_span)) = init {
                let found = analyze_expr(init, table, meta)?;
                expect_type(ty, found, *init_span, meta)?;
            }
            Ok(())
        }
        Statement::Assign { target, value } => {
            let declared = table.lookup(target.source).ok_or_else(|| {
                error_at(
                    SemanticErrorKind::UndeclaredVariable(target.source.to_string()),
                    target.span,
                    meta,
                )
            })?;
            let found = analyze_expr(&value.0, table, meta)?;
            expect_type(declared, found, value.1, meta)
        }
        Statement::Block(block) => analyze_block(block, table, meta),
        Statement::DoWhile { condition, body } => {
            // checked condition-first although execution is body-first; this
            // is a static ordering with no runtime meaning
            analyze_expr(&condition.0, table, meta)?;
            analyze_block(body, table, meta)
        }
    }
}

fn analyze_block<'source>(
    block: &Block<'source>,
    table: &mut SymbolTable<'source>,
    meta: &SourceMetadata,
) -> Result<(), SemanticError> {
    for (statement, _) in &block.statements {
        analyze_statement(statement, table, meta)?;
    }
    Ok(())
}

/// The one type-compatibility rule. Declaration initializers, assignments
/// and operator operands all funnel through here, so a declaration with an
/// initializer is checked by exactly the same rule as a later reassignment.
fn expect_type(
    expected: DataType,
    found: DataType,
    span: Span,
    meta: &SourceMetadata,
) -> Result<(), SemanticError> {
    if expected == found {
        Ok(())
    } else {
        Err(error_at(
            SemanticErrorKind::TypeMismatch { expected, found },
            span,
            meta,
        ))
    }
}

fn analyze_expr<'source>(
    expr: &Expr<'source>,
    table: &SymbolTable<'source>,
    meta: &SourceMetadata,
) -> Result<DataType, SemanticError> {
    match expr {
        Expr::Number(_) => Ok(DataType::Int),
        Expr::Bool(_) => Ok(DataType::Boolean),
        Expr::Variable { name } => table.lookup(name.source).ok_or_else(|| {
            error_at(
                SemanticErrorKind::UndeclaredVariable(name.source.to_string()),
                name.span,
                meta,
            )
        }),
        Expr::Unary { operator, operand } => {
            let found = analyze_expr(&operand.0, table, meta)?;
            let wanted = match operator {
                UnaryOp::Negate => DataType::Int,
                UnaryOp::Not => DataType::Boolean,
            };
            expect_type(wanted, found, operand.1, meta)?;
            Ok(wanted)
        }
        Expr::Binary { operator, lhs, rhs } => {
            let lhs_ty = analyze_expr(&lhs.0, table, meta)?;
            let rhs_ty = analyze_expr(&rhs.0, table, meta)?;
            match operator {
                BinaryOp::Arithmetic(_) => {
                    expect_type(DataType::Int, lhs_ty, lhs.1, meta)?;
                    expect_type(DataType::Int, rhs_ty, rhs.1, meta)?;
                    Ok(DataType::Int)
                }
                BinaryOp::Relational(rel) if rel.is_equality() => {
                    expect_type(lhs_ty, rhs_ty, rhs.1, meta)?;
                    Ok(DataType::Boolean)
                }
                BinaryOp::Relational(_) => {
                    expect_type(DataType::Int, lhs_ty, lhs.1, meta)?;
                    expect_type(DataType::Int, rhs_ty, rhs.1, meta)?;
                    Ok(DataType::Boolean)
                }
                BinaryOp::Logic(_) => {
                    expect_type(DataType::Boolean, lhs_ty, lhs.1, meta)?;
                    expect_type(DataType::Boolean, rhs_ty, rhs.1, meta)?;
                    Ok(DataType::Boolean)
                }
            }
        }
    }
}

fn error_at(kind: SemanticErrorKind, span: Span, meta: &SourceMetadata) -> SemanticError {
    SemanticError::new(kind).with_source(span, meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::error::SourceMetadata;
    use crate::grammar::Parser;

    fn analyze(source: &str) -> Result<(), SemanticError> {
        let meta = SourceMetadata::new(source);
        let program: Program = Parser::new(&meta)
            .parse()
            .expect("test source should parse");
        analyze_program(&program, &meta)
    }

    #[test]
    fn counting_loop_analyzes() {
        analyze("int x = 5; do { x = x - 1; } while (x > 0);").unwrap();
    }

    #[test]
    fn use_of_an_undeclared_name_is_reported() {
        let err = analyze("int x; x = y + 1;").unwrap_err();
        assert!(
            matches!(&err.kind, SemanticErrorKind::UndeclaredVariable(name) if name == "y"),
            "got {:?}",
            err.kind
        );
    }

    #[test]
    fn assignment_to_an_undeclared_target_is_reported() {
        let err = analyze("x = 1;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::UndeclaredVariable(_)
        ));
    }

    #[test]
    fn declaring_a_name_twice_is_reported() {
        let err = analyze("int x = 5; int x = 6;").unwrap_err();
        assert!(
            matches!(&err.kind, SemanticErrorKind::DuplicateDeclaration(name) if name == "x"),
            "got {:?}",
            err.kind
        );
    }

    #[test]
    fn initializer_of_the_wrong_type_is_reported() {
        let err = analyze("boolean b = 1;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::TypeMismatch {
                expected: DataType::Boolean,
                found: DataType::Int,
            }
        ));
    }

    #[test]
    fn initializers_and_assignments_share_the_type_rule() {
        // same violation, reported the same way through either path
        let from_init = analyze("boolean b = 1;").unwrap_err();
        let from_assign = analyze("boolean b; b = 1;").unwrap_err();
        assert!(matches!(from_init.kind, SemanticErrorKind::TypeMismatch { .. }));
        assert!(matches!(
            from_assign.kind,
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn unrecognized_type_keyword_is_reported() {
        let err = analyze("float f;").unwrap_err();
        assert!(
            matches!(&err.kind, SemanticErrorKind::UnknownType(kw) if kw == "float"),
            "got {:?}",
            err.kind
        );
    }

    #[test]
    fn a_declaration_may_read_its_own_default() {
        analyze("int a = a;").unwrap();
    }

    #[test]
    fn condition_is_analyzed_before_body() {
        // `y` is declared inside the body; the condition is checked first,
        // so the reference must not resolve
        let err = analyze("do { int y; y = 0; } while (y == 0);").unwrap_err();
        assert!(
            matches!(&err.kind, SemanticErrorKind::UndeclaredVariable(name) if name == "y"),
            "got {:?}",
            err.kind
        );
    }

    #[test]
    fn loop_bodies_share_the_global_scope() {
        let err = analyze("do { int x; } while (true); int x;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::DuplicateDeclaration(_)
        ));
    }

    #[test]
    fn arithmetic_needs_numbers() {
        let err = analyze("boolean b; int x = b + 1;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::TypeMismatch {
                expected: DataType::Int,
                found: DataType::Boolean,
            }
        ));
    }

    #[test]
    fn logic_connectives_need_booleans() {
        let err = analyze("int x; boolean b = x && true;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::TypeMismatch {
                expected: DataType::Boolean,
                found: DataType::Int,
            }
        ));
    }

    #[test]
    fn equality_compares_within_one_type() {
        analyze("int x; boolean same = x == 3;").unwrap();
        analyze("boolean b; boolean same = b == true;").unwrap();
        let err = analyze("int x; boolean same = x == true;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn ordering_comparisons_need_numbers() {
        let err = analyze("boolean b; boolean c = b < true;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::TypeMismatch {
                expected: DataType::Int,
                found: DataType::Boolean,
            }
        ));
    }

    #[test]
    fn negation_operators_check_their_operand() {
        analyze("int x = -5; boolean b = !true;").unwrap();
        let err = analyze("boolean b = !3;").unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::TypeMismatch {
                expected: DataType::Boolean,
                found: DataType::Int,
            }
        ));
    }
}
