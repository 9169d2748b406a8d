use super::lexer::{Operator, Source, TokenKind};
use super::{Parse, ParseErrorKind, ParseRes, Parser, WantedSpec};
use crate::{
    ast::{Block, Expr, Statement},
    error::Span,
};

impl<'source> Parse<'source> for (Statement<'source>, Span) {
    fn parse(parser: &mut Parser<'source>) -> ParseRes<Self> {
        parser.with_context("parsing statement", |parser| {
            match parser.expect_a_token(WantedSpec::Description("statement"))? {
                TokenKind::Identifier if parser.current_token_source() == "do" => do_while(parser),
                TokenKind::Identifier => declaration_or_assignment(parser),
                TokenKind::OpenBrace => parser
                    .parse()
                    .map(|(block, block_span): (Block, Span)| (Statement::Block(block), block_span)),
                found => parser.reject_current_token(ParseErrorKind::Expected {
                    wanted: WantedSpec::Description("statement"),
                    found,
                }),
            }
        })
    }
}

/// Both productions open with an identifier: a second identifier means the
/// first one was a type keyword, an `=` means it was an assignment target.
fn declaration_or_assignment<'source>(
    parser: &mut Parser<'source>,
) -> ParseRes<(Statement<'source>, Span)> {
    let first: Source = parser.parse()?;
    match parser.expect_a_token(WantedSpec::Description("rest of declaration or assignment"))? {
        TokenKind::Identifier => declaration(parser, first),
        TokenKind::Operator {
            kind: Operator::Equals,
            has_equal: false,
        } => assignment(parser, first),
        found => parser.reject_current_token(ParseErrorKind::Expected {
            wanted: WantedSpec::Description("variable name or `=`"),
            found,
        }),
    }
}

fn declaration<'source>(
    parser: &mut Parser<'source>,
    type_name: Source<'source>,
) -> ParseRes<(Statement<'source>, Span)> {
    parser.with_context("parsing variable declaration", |parser| {
        let name: Source = parser.parse()?;
        let init = if let Some(TokenKind::Operator {
            kind: Operator::Equals,
            has_equal: false,
        }) = parser.peek_token()?
        {
            parser.accept_current();
            parser.parse().map(Some)?
        } else {
            None
        };
        let end = end_of_statement(parser)?;
        Ok((
            Statement::Declare {
                type_name,
                name,
                init,
            },
            type_name.span.until(end),
        ))
    })
}

fn assignment<'source>(
    parser: &mut Parser<'source>,
    target: Source<'source>,
) -> ParseRes<(Statement<'source>, Span)> {
    parser.with_context("parsing assignment", |parser| {
        parser.accept_current(); // the `=`
        let value = parser.parse()?;
        let end = end_of_statement(parser)?;
        Ok((Statement::Assign { target, value }, target.span.until(end)))
    })
}

fn do_while<'source>(parser: &mut Parser<'source>) -> ParseRes<(Statement<'source>, Span)> {
    parser.with_context("parsing do-while statement", |parser| {
        let start = parser.current_position();
        parser.accept_current(); // the `do`
        let body: Block = parser.parse()?;
        parser.keyword("while")?;
        let condition = parser.with_context("parsing do-while condition", |parser| {
            parser.expect_token(TokenKind::OpenParen)?;
            parser.accept_current();
            let condition: (Expr, Span) = parser.parse()?;
            parser.expect_token(TokenKind::CloseParen)?;
            parser.accept_current();
            Ok(condition)
        })?;
        let end = end_of_statement(parser)?;
        Ok((
            Statement::DoWhile { condition, body },
            Span::new(start).until(end),
        ))
    })
}

/// Expect and consume the terminating semicolon, returning its span.
fn end_of_statement(parser: &mut Parser) -> ParseRes<Span> {
    parser.expect_token(TokenKind::Semicolon)?;
    let span = parser.current_token_span();
    parser.accept_current();
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::error::SourceMetadata;

    fn parse_ok(source: &str) -> bool {
        let meta = SourceMetadata::new(source);
        super::super::Parser::new(&meta).parse::<Program>().is_ok()
    }

    #[test]
    fn parses_a_counting_loop() {
        let source = "int x = 5; do { x = x - 1; } while (x > 0);";
        let meta = SourceMetadata::new(source);
        let Program(statements) = super::super::Parser::new(&meta).parse().unwrap();
        assert_eq!(statements.len(), 2);
        assert!(matches!(
            &statements[0].0,
            Statement::Declare {
                type_name,
                name,
                init: Some(_),
            } if type_name.source == "int" && name.source == "x"
        ));
        match &statements[1].0 {
            Statement::DoWhile { condition, body } => {
                assert!(matches!(condition.0, Expr::Binary { .. }));
                assert_eq!(body.statements.len(), 1);
                assert!(matches!(
                    &body.statements[0].0,
                    Statement::Assign { target, .. } if target.source == "x"
                ));
            }
            other => panic!("expected a do-while, got {:?}", other),
        }
    }

    #[test]
    fn declaration_without_initializer() {
        let source = "boolean flag;";
        let meta = SourceMetadata::new(source);
        let Program(statements) = super::super::Parser::new(&meta).parse().unwrap();
        assert!(matches!(
            &statements[0].0,
            Statement::Declare {
                type_name,
                init: None,
                ..
            } if type_name.source == "boolean"
        ));
    }

    #[test]
    fn missing_closing_brace_is_a_syntax_error() {
        let source = "do { x = 1; while (x > 0);";
        let meta = SourceMetadata::new(source);
        let err = super::super::Parser::new(&meta)
            .parse::<Program>()
            .unwrap_err();
        // `while` gets read as a statement, leaving nothing to close the block
        let rendered = err.to_string();
        assert!(rendered.contains("expected"), "got: {}", rendered);
    }

    #[test]
    fn statement_spans_cover_the_whole_statement() {
        let source = "int x = 5;";
        let meta = SourceMetadata::new(source);
        let Program(statements) = super::super::Parser::new(&meta).parse().unwrap();
        assert_eq!(statements[0].1, Span::with_len(0, source.len()));
    }

    #[test]
    fn rejects_stray_tokens_in_statement_position() {
        assert!(!parse_ok("= 5;"));
        assert!(!parse_ok("int x = ;"));
        assert!(!parse_ok("x + 1;"));
    }
}
