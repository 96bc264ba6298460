//! Error types for the CLI

use core_types::JsError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Parse or emission error from the front end
    #[error("{0}")]
    Js(#[from] JsError),

    /// File I/O error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// REPL error
    #[error("REPL error: {0}")]
    Repl(String),
}

impl CliError {
    /// True when the input ended in the middle of a construct, so more
    /// lines could still complete it
    pub fn is_incomplete_input(&self) -> bool {
        match self {
            CliError::Js(e) => e.is_syntax_error() && e.message.contains("Unexpected end of input"),
            _ => false,
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
