use crate::error::{self, SourceMetadata, Span, WantedSpec};
use std::fmt;

pub type LexError = error::Error<LexErrorKind>;

#[derive(Debug, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected {found:?}, expected {wanted}")]
    Expected {
        wanted: WantedSpec<char>,
        found: char,
    },
    #[error("unexpected {0:?}")]
    UnexpectedChar(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    Semicolon,
    Number,
    Identifier,
    Operator { kind: Operator, has_equal: bool },
}

impl TokenKind {
    pub const fn as_operator(self) -> Option<(Operator, bool)> {
        if let TokenKind::Operator { kind, has_equal } = self {
            Some((kind, has_equal))
        } else {
            None
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OpenBrace => write!(f, "opening brace '{{'"),
            Self::CloseBrace => write!(f, "closing brace '}}'"),
            Self::OpenParen => write!(f, "opening parentheses '('"),
            Self::CloseParen => write!(f, "closing parentheses ')'"),
            Self::Semicolon => write!(f, "semicolon ';'"),
            Self::Number => write!(f, "number"),
            Self::Identifier => write!(f, "identifier"),
            Self::Operator { kind, has_equal } => write!(
                f,
                "operator `{}{}`",
                kind,
                if *has_equal { "=" } else { "" }
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    ExclamationMark,
    AngleLeft,
    AngleRight,
    Equals,
    DoubleAnd,
    DoublePipe,
}

impl Operator {
    /// Operators that may fold a trailing `=` into the same token
    /// (`<=`, `>=`, `==`, `!=`).
    const fn accepts_equal(self) -> bool {
        matches!(
            self,
            Self::AngleLeft | Self::AngleRight | Self::Equals | Self::ExclamationMark
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::ExclamationMark => "!",
            Self::AngleLeft => "<",
            Self::AngleRight => ">",
            Self::Equals => "=",
            Self::DoubleAnd => "&&",
            Self::DoublePipe => "||",
        })
    }
}

/// A token plus the source slice it was read from.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub source: Source<'a>,
}

/// A slice of the input together with its span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source<'a> {
    pub span: Span,
    pub source: &'a str,
}

pub struct Lexer<'a> {
    input: std::iter::Peekable<std::str::CharIndices<'a>>,
    metadata: &'a SourceMetadata<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a SourceMetadata<'a>) -> Self {
        Self {
            input: input.input().char_indices().peekable(),
            metadata: input,
        }
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, LexError> {
        self.skip_whitespace();
        for (ch, kind) in [
            ('{', TokenKind::OpenBrace),
            ('}', TokenKind::CloseBrace),
            ('(', TokenKind::OpenParen),
            (')', TokenKind::CloseParen),
            (';', TokenKind::Semicolon),
        ] {
            if let Some(pos) = self.peek_char(ch) {
                self.advance();
                return Ok(Some(Token {
                    kind,
                    source: self.source_from_len(pos, 1),
                }));
            }
        }
        if let Some(src) = self.identifier() {
            return Ok(Some(Token {
                kind: TokenKind::Identifier,
                source: src,
            }));
        }
        if let Some(src) = self.number().map_err(|e| e.add_context("reading a number"))? {
            return Ok(Some(Token {
                kind: TokenKind::Number,
                source: src,
            }));
        }
        if let Some((start, kind, has_equal)) = self.operator() {
            return Ok(Some(Token {
                kind: TokenKind::Operator { kind, has_equal },
                source: self.source_until_current(start),
            }));
        }
        match self.input.peek().copied() {
            None => Ok(None),
            Some((pos, ch)) => Err(self.error(pos, LexErrorKind::UnexpectedChar(ch))),
        }
    }

    fn operator(&mut self) -> Option<(usize, Operator, bool)> {
        let start = self.current_offset();
        let op = if self.eat_str("&&").is_some() {
            Operator::DoubleAnd
        } else if self.eat_str("||").is_some() {
            Operator::DoublePipe
        } else {
            let (_, ch) = self.skip_if(|c| "+-*/!<>=".contains(c))?;
            match ch {
                '+' => Operator::Plus,
                '-' => Operator::Minus,
                '*' => Operator::Star,
                '/' => Operator::Slash,
                '!' => Operator::ExclamationMark,
                '<' => Operator::AngleLeft,
                '>' => Operator::AngleRight,
                _ => Operator::Equals,
            }
        };
        let has_equal = op.accepts_equal() && self.skip_if(|c| c == '=').is_some();
        Some((start, op, has_equal))
    }

    fn identifier(&mut self) -> Option<Source<'a>> {
        let (start, _) = self.skip_if(|c| c.is_ascii_alphabetic() || c == '_')?;
        self.skip_while(|c| c.is_ascii_alphanumeric() || c == '_');
        Some(self.source_until_current(start))
    }

    fn number(&mut self) -> Result<Option<Source<'a>>, LexError> {
        let start = match self.skip_if(|c| c.is_ascii_digit()) {
            Some((pos, _)) => pos,
            None => return Ok(None),
        };
        self.skip_while(|c| c.is_ascii_digit());
        if let Some((pos, ch)) = self
            .input
            .peek()
            .filter(|(_, ch)| !is_delimiter(*ch))
            .copied()
        {
            return Err(self.error(
                pos,
                LexErrorKind::Expected {
                    wanted: WantedSpec::Description("delimiter or space after number"),
                    found: ch,
                },
            ));
        }
        Ok(Some(self.source_until_current(start)))
    }

    fn eat_str(&mut self, str: &str) -> Option<usize> {
        let current_offset = self.current_offset();
        if self.metadata.input()[current_offset..].starts_with(str) {
            for _ in str.chars() {
                self.advance();
            }
            Some(current_offset)
        } else {
            None
        }
    }

    fn skip_while<F>(&mut self, filter: F)
    where
        F: Fn(char) -> bool,
    {
        while self.input.peek().filter(|(_, ch)| filter(*ch)).is_some() {
            self.input.next();
        }
    }

    fn skip_if<F>(&mut self, filter: F) -> Option<(usize, char)>
    where
        F: Fn(char) -> bool,
    {
        let (pos, ch) = *self.input.peek()?;
        if filter(ch) {
            self.advance();
            Some((pos, ch))
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        self.skip_while(char::is_whitespace);
    }

    fn advance(&mut self) {
        self.input.next();
    }

    fn peek_char(&mut self, ch: char) -> Option<usize> {
        self.input
            .peek()
            .filter(|(_, x)| *x == ch)
            .map(|(pos, _)| *pos)
    }

    fn source_until_current(&mut self, start: usize) -> Source<'a> {
        let current = self.current_offset();
        self.source_from(start, current)
    }

    fn source_from(&self, start: usize, end: usize) -> Source<'a> {
        Source {
            span: Span::with_len(start, end - start),
            source: &self.metadata.input()[start..end],
        }
    }

    fn source_from_len(&self, start: usize, len: usize) -> Source<'a> {
        self.source_from(start, start + len)
    }

    fn error(&self, position: usize, kind: LexErrorKind) -> LexError {
        LexError::new(kind).with_source(Span::new(position), self.metadata)
    }

    pub fn current_span(&mut self) -> Span {
        Span::new(self.current_offset())
    }

    pub const fn get_metadata(&self) -> &SourceMetadata {
        self.metadata
    }

    fn current_offset(&mut self) -> usize {
        self.input
            .peek()
            .map(|(x, _)| *x)
            .unwrap_or_else(|| self.metadata.input().len())
    }
}

#[inline]
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || ch.is_ascii_punctuation()
}
