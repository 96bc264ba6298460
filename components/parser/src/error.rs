//! Parser error types and helpers

use core_types::{ErrorKind, JsError, SourcePosition};

/// Create a syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: Option<SourcePosition>) -> JsError {
    JsError {
        kind: ErrorKind::SyntaxError,
        message: message.into(),
        source_position: position,
    }
}

/// Create an unexpected token error
pub fn unexpected_token(expected: &str, got: &str, position: Option<SourcePosition>) -> JsError {
    syntax_error(format!("Expected {}, got {}", expected, got), position)
}

/// Create an unexpected end of input error
pub fn unexpected_eof(position: Option<SourcePosition>) -> JsError {
    syntax_error("Unexpected end of input", position)
}

/// Create an error for a tree that breaks an emitter invariant
pub fn internal_error(message: impl Into<String>) -> JsError {
    JsError::new(ErrorKind::InternalError, message)
}
