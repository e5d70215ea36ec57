//! Error taxonomy shared by every engine and execution discipline.
//!
//! Callers see exactly two parse-failure categories:
//!
//! - [`SyntaxError`]: the input is malformed (this includes trailing data
//!   after a top-level value unless multiple values were requested).
//! - [`IncompleteError`]: the input ended inside a lexeme or an open container.
//!
//! I/O failures of the input source are passed through untouched as
//! [`Error::Io`].

use std::{fmt, io};

use thiserror::Error;

use crate::event::EventKind;

/// Location of the byte that triggered an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Zero-based byte offset from the start of the input.
    pub offset: usize,
    /// One-based line number.
    pub line: usize,
    /// One-based column, counted in characters.
    pub column: usize,
}

impl Position {
    pub(crate) const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Advance past one input byte.
    #[inline]
    pub(crate) fn advance(&mut self, byte: u8) {
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if byte & 0xC0 != 0x80 {
            self.column += 1;
        }
    }

    /// Advance past a run of bytes known to contain no line feed.
    #[inline]
    pub(crate) fn advance_inline(&mut self, run: &[u8]) {
        self.offset += run.len();
        self.column += run.iter().filter(|b| **b & 0xC0 != 0x80).count();
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Every failure a parsing session can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// Input ended before the document was complete.
    #[error("incomplete JSON: {0}")]
    Incomplete(#[from] IncompleteError),
    /// The input source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// `true` when the input was malformed.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// `true` when the input was truncated.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete(_))
    }

    /// `true` when the input source itself failed.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Where in the input the failure was detected, when the engine knows.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax(e) => e.position,
            Self::Incomplete(e) => e.position,
            Self::Io(_) => None,
        }
    }

    /// A copy of this error for sessions that must report the same failure
    /// on every later call.
    pub(crate) fn replay(&self) -> Self {
        match self {
            Self::Syntax(e) => Self::Syntax(e.clone()),
            Self::Incomplete(e) => Self::Incomplete(e.clone()),
            Self::Io(e) => Self::Io(io::Error::new(e.kind(), e.to_string())),
        }
    }
}

/// Malformed input.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct SyntaxError {
    kind: SyntaxErrorKind,
    position: Option<Position>,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, position: Option<Position>) -> Self {
        Self { kind, position }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }

    /// Where it went wrong, when known.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at {pos}", self.kind),
            None => self.kind.fmt(f),
        }
    }
}

/// The reason behind a [`SyntaxError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SyntaxErrorKind {
    #[error("unexpected character '{}'", .0.escape_ascii())]
    InvalidCharacter(u8),
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("malformed number")]
    InvalidNumber,
    #[error("invalid escape '\\{}'", .0.escape_ascii())]
    InvalidEscape(u8),
    #[error("invalid unicode escape sequence at character '{}'", .0.escape_ascii())]
    InvalidUnicodeEscapeChar(u8),
    #[error("unpaired surrogate \\u{0:04X}")]
    LoneSurrogate(u32),
    #[error("control character 0x{0:02X} in string")]
    ControlCharacter(u8),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("trailing data after top-level value")]
    TrailingData,
    #[error("data fed after end of input")]
    AfterClose,
    #[error("unexpected {0} event")]
    UnexpectedEvent(EventKind),
    #[error("{0}")]
    Engine(String),
}

/// Input ended before the current lexeme or container was closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct IncompleteError {
    context: &'static str,
    position: Option<Position>,
}

impl IncompleteError {
    pub(crate) fn new(context: &'static str, position: Option<Position>) -> Self {
        Self { context, position }
    }

    /// Short description of what was left open.
    #[must_use]
    pub fn context(&self) -> &'static str {
        self.context
    }

    /// End-of-input position, when known.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }
}

impl fmt::Display for IncompleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at {pos}", self.context),
            None => f.write_str(self.context),
        }
    }
}
