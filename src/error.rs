//! Span-carrying error wrapper shared by every pipeline stage.
//!
//! The stages each define their own error *kind* (lexing, parsing, semantic
//! analysis); [`Error`] wraps a kind together with the place in the source
//! it points at and renders both in a rustc-like frame.

use std::error;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Error<K> {
    pub kind: K,
    file: Option<std::path::PathBuf>,
    snippet: Option<Snippet>,
    contexts: Vec<&'static str>,
}

/// A byte range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub const fn new(offset: usize) -> Self {
        Self { offset, len: 1 }
    }
    pub const fn with_len(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }
    /// Span covering everything from the start of `self` to the end of `other`.
    pub const fn until(self, other: Span) -> Self {
        Self {
            offset: self.offset,
            len: other.offset + other.len - self.offset,
        }
    }
}

/// The source text plus the (optional) file it was read from. Borrowed by
/// the lexer, the parser and the analyzer; errors pick their snippet out of
/// it.
#[derive(Debug)]
pub struct SourceMetadata<'a> {
    file: Option<std::path::PathBuf>,
    source: &'a str,
}

impl<'a> SourceMetadata<'a> {
    pub const fn new(source: &'a str) -> Self {
        Self { file: None, source }
    }
    pub const fn input(&self) -> &'a str {
        self.source
    }
    #[must_use]
    pub fn with_file(mut self, file: std::path::PathBuf) -> Self {
        self.file = Some(file);
        self
    }

    fn snippet_at(&self, span: Span) -> Option<Snippet> {
        let mut offset = 0;
        for (i, line) in self.source.split_terminator('\n').enumerate() {
            let next_offset = offset + line.len() + 1;
            if next_offset > span.offset {
                return Some(Snippet {
                    position: Position {
                        line: i,
                        col: span.offset - offset,
                    },
                    line: line.to_string(),
                });
            }
            offset = next_offset;
        }
        None
    }
}

impl<K> Error<K> {
    pub const fn new(kind: K) -> Self {
        Self {
            kind,
            file: None,
            snippet: None,
            contexts: Vec::new(),
        }
    }
    pub fn map_kind<F, U>(self, mapper: F) -> Error<U>
    where
        F: FnOnce(K) -> U,
    {
        Error {
            kind: mapper(self.kind),
            file: self.file,
            snippet: self.snippet,
            contexts: self.contexts,
        }
    }
    #[must_use]
    pub fn with_source(mut self, span: Span, source: &SourceMetadata) -> Self {
        self.file = source.file.clone();
        self.snippet = source.snippet_at(span);
        self
    }
    #[must_use]
    pub fn add_context(mut self, ctx: &'static str) -> Self {
        self.contexts.push(ctx);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Snippet {
    position: Position,
    line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

/// Either a concrete item or a prose description of what was wanted.
#[derive(Debug)]
pub enum WantedSpec<T> {
    Specific(T),
    Description(&'static str),
}

impl<T: fmt::Display> fmt::Display for WantedSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Specific(t) => write!(f, "{}", t),
            Self::Description(desc) => f.write_str(desc),
        }
    }
}

impl<K: error::Error + 'static> error::Error for Error<K> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<K: fmt::Display> fmt::Display for Error<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let whiles = self
            .contexts
            .iter()
            .copied()
            .fold(String::new(), |acc, next| acc + "\nwhile " + next);
        let snippet = match &self.snippet {
            Some(snip) => snip,
            None => return write!(f, "{}(no location info){}", self.kind, whiles),
        };
        let file = self
            .file
            .as_ref()
            .and_then(|x| x.to_str())
            .unwrap_or("<unknown source>");

        write!(
            f,
            "\
{kind}
   --> {file}:{line}:{col}
    |
{line:3} | {snippet}
    | {marker:>0$}{whiles}",
            snippet.position.col + 1,
            marker = '^',
            line = snippet.position.line + 1,
            col = snippet.position.col + 1,
            file = file,
            kind = self.kind,
            snippet = snippet.line,
            whiles = whiles,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_points_at_the_right_line() {
        let meta = SourceMetadata::new("int x;\nx = y;\n");
        let snip = meta.snippet_at(Span::new(11)).unwrap();
        assert_eq!(snip.position, Position { line: 1, col: 4 });
        assert_eq!(snip.line, "x = y;");
    }

    #[test]
    fn span_until_covers_both_ends() {
        let a = Span::with_len(2, 3);
        let b = Span::with_len(8, 4);
        assert_eq!(a.until(b), Span::with_len(2, 10));
    }
}
