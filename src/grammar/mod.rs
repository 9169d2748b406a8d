//! Recursive-descent front end: one [`Parse`] implementation per grammar
//! production, all sharing the single-token lookahead machinery in
//! [`Parser`].

use crate::error::*;

pub mod lexer;

mod block;
mod expr;
mod identifier;
mod program;
mod statement;

use lexer::{Lexer, LexErrorKind, Token, TokenKind};

pub type ParseRes<T> = Result<T, ParseError>;
pub type ParseError = Error<ParseErrorKind>;

#[derive(Debug, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("error while lexing source: {0}")]
    LexError(#[source] LexErrorKind),
    #[error("expected {wanted}, but found instead {found}")]
    Expected {
        wanted: WantedSpec<TokenKind>,
        found: TokenKind,
    },
    #[error("unexpected end of input, expected {wanted}")]
    UnexpectedEOF { wanted: WantedSpec<TokenKind> },
    #[error("number `{0}` does not fit in an int")]
    NumberOutOfRange(String),
}

pub trait Parse<'source>: Sized {
    fn parse(parser: &mut Parser<'source>) -> ParseRes<Self>;
}

pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current_tok: Option<Token<'source>>,
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source SourceMetadata<'source>) -> Self {
        Self {
            lexer: Lexer::new(source),
            current_tok: None,
        }
    }

    pub fn current_position(&self) -> usize {
        self.current_token_span().offset
    }

    pub fn peek_token(&mut self) -> ParseRes<Option<TokenKind>> {
        if self.current_tok.is_none() {
            self.current_tok = self
                .lexer
                .next_token()
                .map_err(|e| e.map_kind(ParseErrorKind::LexError))?;
        }
        Ok(self.current_tok.as_ref().map(|x| x.kind))
    }

    pub fn current_token_span(&self) -> Span {
        self.current_tok
            .as_ref()
            .map(|x| x.source.span)
            .expect("called current_token_span with no token")
    }

    pub fn current_token_source(&self) -> &'source str {
        self.current_tok
            .as_ref()
            .map(|x| x.source.source)
            .expect("called current_token_source with no token")
    }

    pub fn accept_current(&mut self) {
        self.current_tok = None;
    }

    pub fn emit_error_at<T>(&self, span: Span, kind: ParseErrorKind) -> ParseRes<T> {
        Err(ParseError::new(kind).with_source(span, self.lexer.get_metadata()))
    }

    pub fn reject_current_token<T>(&self, reason: ParseErrorKind) -> ParseRes<T> {
        let span = self.current_token_span();
        self.emit_error_at(span, reason)
    }

    /// Peek a token, treating end of input as an error.
    pub fn expect_a_token(&mut self, wanted: WantedSpec<TokenKind>) -> ParseRes<TokenKind> {
        let span = self.lexer.current_span();
        match self.peek_token()? {
            Some(tok) => Ok(tok),
            None => self.emit_error_at(span, ParseErrorKind::UnexpectedEOF { wanted }),
        }
    }

    pub fn expect_token(&mut self, kind: TokenKind) -> ParseRes<()> {
        self.expect_a_token(WantedSpec::Specific(kind))
            .and_then(|tok| {
                if tok != kind {
                    self.reject_current_token(ParseErrorKind::Expected {
                        wanted: WantedSpec::Specific(kind),
                        found: tok,
                    })
                } else {
                    Ok(())
                }
            })
    }

    /// Accept the current token iff it is the given keyword-like identifier.
    pub fn keyword(&mut self, kw: &'static str) -> ParseRes<()> {
        self.expect_token(TokenKind::Identifier)
            .map_err(|e| e.add_context("parsing keyword"))?;
        if self.current_token_source() != kw {
            self.reject_current_token(ParseErrorKind::Expected {
                wanted: WantedSpec::Description(kw),
                found: TokenKind::Identifier,
            })
        } else {
            self.accept_current();
            Ok(())
        }
    }

    pub fn parse<T>(&mut self) -> ParseRes<T>
    where
        T: Parse<'source>,
    {
        T::parse(self)
    }

    pub fn with_context<F, T>(&mut self, context: &'static str, mut cont: F) -> ParseRes<T>
    where
        F: FnMut(&mut Self) -> ParseRes<T>,
    {
        cont(self).map_err(|x| x.add_context(context))
    }
}
