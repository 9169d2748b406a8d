use super::{Parse, ParseRes, Parser};
use crate::ast::Program;

impl<'source> Parse<'source> for Program<'source> {
    fn parse(parser: &mut Parser<'source>) -> ParseRes<Self> {
        let mut statements = Vec::new();
        while parser.peek_token()?.is_some() {
            statements.push(parser.parse()?);
        }
        tracing::debug!(target: "grammar", "parsed {} top-level statements", statements.len());
        Ok(Program(statements))
    }
}
