//! Error types shared by the lexer, parser and code emitter.

use std::fmt;

use crate::SourcePosition;

/// The kind of error raised by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The token stream does not match the grammar (including running out
    /// of input in the middle of a construct)
    SyntaxError,
    /// A tree handed to a later stage breaks an invariant the parser would
    /// never produce
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::SyntaxError => f.write_str("SyntaxError"),
            ErrorKind::InternalError => f.write_str("InternalError"),
        }
    }
}

/// An error with a kind, a human-readable message and, when known, the
/// position in the source where it was detected.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError};
///
/// let error = JsError::new(ErrorKind::InternalError, "assignment target is not an lvalue");
/// assert_eq!(error.kind, ErrorKind::InternalError);
/// assert!(error.source_position.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}{}", display_position(.source_position))]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Source position where the error occurred
    pub source_position: Option<SourcePosition>,
}

impl JsError {
    /// Create an error without position information
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source_position: None,
        }
    }

    /// Attach a source position
    pub fn with_position(mut self, position: SourcePosition) -> Self {
        self.source_position = Some(position);
        self
    }

    /// True for grammar violations
    pub fn is_syntax_error(&self) -> bool {
        self.kind == ErrorKind::SyntaxError
    }
}

fn display_position(position: &Option<SourcePosition>) -> String {
    match position {
        Some(pos) => format!(" (line {}, column {})", pos.line, pos.column),
        None => String::new(),
    }
}
