use super::lexer::{Source, TokenKind};
use super::{Parse, ParseErrorKind, ParseRes, Parser, WantedSpec};
use crate::ast::{Associativity, BinaryOp, Expr, UnaryOp};
use crate::error::Span;

impl<'source> Parse<'source> for (Expr<'source>, Span) {
    fn parse(parser: &mut Parser<'source>) -> ParseRes<Self> {
        parse_primary(parser)
            .and_then(|lhs| {
                parse_binary_expression(parser, lhs, 0)
                    .map_err(|e| e.add_context("parsing binary expression"))
            })
            .map_err(|x| x.add_context("parsing expression"))
    }
}

// parse prefix, literal, variable or parenthesis
fn parse_primary<'source>(parser: &mut Parser<'source>) -> ParseRes<(Expr<'source>, Span)> {
    parser.with_context("parsing primary expression", |parser| {
        // collect all unary operators up front
        let mut ops = Vec::new();
        while let Some(op) = parser
            .peek_token()?
            .and_then(TokenKind::as_operator)
            .and_then(UnaryOp::from_operator)
        {
            ops.push((op, parser.current_token_span()));
            parser.accept_current();
        }
        let mut expr = match parser.expect_a_token(WantedSpec::Description("expression"))? {
            TokenKind::OpenParen => {
                let start = parser.current_position();
                parser.accept_current();
                let (e, _) = parser.parse()?;
                parser
                    .expect_token(TokenKind::CloseParen)
                    .map_err(|x| x.add_context("as the end of the expression"))?;
                let end = parser.current_position() + 1;
                parser.accept_current();
                (e, Span::with_len(start, end - start))
            }
            TokenKind::Number => {
                let source = parser.current_token_source();
                let span = parser.current_token_span();
                let num = match source.parse() {
                    Ok(num) => num,
                    Err(_) => {
                        return parser.reject_current_token(ParseErrorKind::NumberOutOfRange(
                            source.to_string(),
                        ))
                    }
                };
                parser.accept_current();
                (Expr::Number(num), span)
            }
            TokenKind::Identifier => {
                let source = parser.current_token_source();
                let span = parser.current_token_span();
                parser.accept_current();
                let expr = match source {
                    "true" => Expr::Bool(true),
                    "false" => Expr::Bool(false),
                    _ => Expr::Variable {
                        name: Source { span, source },
                    },
                };
                (expr, span)
            }
            tok => {
                return parser.reject_current_token(ParseErrorKind::Expected {
                    found: tok,
                    wanted: WantedSpec::Description("open paren, identifier or number"),
                })
            }
        };
        for (operator, op_span) in ops.into_iter().rev() {
            let span = op_span.until(expr.1);
            expr = (
                Expr::Unary {
                    operator,
                    operand: (Box::new(expr.0), expr.1),
                },
                span,
            );
        }
        Ok(expr)
    })
}

fn peek_binary_op(parser: &mut Parser) -> ParseRes<Option<BinaryOp>> {
    Ok(parser
        .peek_token()?
        .and_then(TokenKind::as_operator)
        .and_then(BinaryOp::from_operator))
}

fn parse_binary_expression<'source>(
    parser: &mut Parser<'source>,
    mut lhs: (Expr<'source>, Span),
    min_precedence: u8,
) -> ParseRes<(Expr<'source>, Span)> {
    while let Some(op) = peek_binary_op(parser)?.filter(|x| x.precedence() >= min_precedence) {
        parser.accept_current();
        let mut rhs = parse_primary(parser)?;
        let this_precedence = op.precedence();
        while peek_binary_op(parser)?
            .filter(|op2| {
                let other_precedence = op2.precedence();
                if let Associativity::Left = op2.associativity() {
                    other_precedence > this_precedence
                } else {
                    other_precedence == this_precedence
                }
            })
            .is_some()
        {
            rhs = parse_binary_expression(parser, rhs, this_precedence + 1)?;
        }
        let span = lhs.1.until(rhs.1);
        lhs = (
            Expr::Binary {
                operator: op,
                lhs: (Box::new(lhs.0), lhs.1),
                rhs: (Box::new(rhs.0), rhs.1),
            },
            span,
        );
    }
    Ok(lhs)
}
