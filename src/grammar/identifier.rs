use super::lexer::{Source, TokenKind};
use super::{Parse, ParseRes, Parser};

impl<'source> Parse<'source> for Source<'source> {
    fn parse(parser: &mut Parser<'source>) -> ParseRes<Self> {
        parser.with_context("parsing identifier", |parser| {
            parser.expect_token(TokenKind::Identifier)?;
            let source = parser.current_token_source();
            let span = parser.current_token_span();
            parser.accept_current();
            Ok(Source { span, source })
        })
    }
}
