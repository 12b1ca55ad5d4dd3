//! Token wrapper carried by every syntactic element the tree keeps.
//!
//! A [`Token`] records the raw text of a lexical unit, the line it started on
//! and the trivia (comments, whitespace, copied text) that preceded it. Later
//! tooling regenerates documentation comments from that trivia, so it is kept
//! verbatim and in source order.

use serde::{Deserialize, Serialize};

/// Which lexical unit a [`Token`] was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Generic,
    ArrayMarker,
    Direction,
    Oneway,
    Interface,
    Parcelable,
    Import,
    Package,
    IdValue,
    Comma,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Equals,
    Semicolon,
}

/// Kind of non-semantic lexical matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriviaKind {
    /// `// ...` up to the end of the line.
    ShortComment,
    /// `/* ... */`, possibly spanning lines.
    LongComment,
    /// `%{ ... %}` block copied through to generated output.
    CopyText,
    Whitespace,
}

/// A piece of trivia attached to the token that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trivia {
    pub line: u32,
    pub kind: TriviaKind,
    pub text: String,
}

impl Trivia {
    pub fn new(line: u32, kind: TriviaKind, text: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            text: text.into(),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TriviaKind::ShortComment | TriviaKind::LongComment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    line: u32,
    kind: TokenKind,
    text: String,
    trivia: Vec<Trivia>,
}

impl Token {
    /// Creates a token with empty text and no trivia.
    pub fn new(line: u32, kind: TokenKind) -> Self {
        Self {
            line,
            kind,
            text: String::new(),
            trivia: Vec::new(),
        }
    }

    pub fn with_text(line: u32, kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new(line, kind)
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Trivia preceding this token, in source order.
    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    /// Comment trivia only, in source order.
    pub fn comments(&self) -> impl Iterator<Item = &Trivia> {
        self.trivia.iter().filter(|t| t.is_comment())
    }

    // Only the grammar engine attaches trivia, once, while building the token.
    pub(crate) fn attach_trivia(&mut self, trivia: Vec<Trivia>) {
        debug_assert!(self.trivia.is_empty(), "trivia attached twice");
        self.trivia = trivia;
    }
}
