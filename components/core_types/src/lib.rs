//! Shared error and source-location types for the tinyjit toolchain.
//!
//! Every stage of the front end (lexer, parser, emitter) reports failures
//! through the same [`JsError`] type so callers only ever match on one error
//! shape.
//!
//! # Overview
//!
//! - [`JsError`] - an error with a kind, message and optional source position
//! - [`ErrorKind`] - syntax errors versus internal contract breaks
//! - [`SourcePosition`] - line/column/offset of a point in the source text
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, SourcePosition};
//!
//! let error = JsError::new(ErrorKind::SyntaxError, "Expected ';', got '}'")
//!     .with_position(SourcePosition { line: 3, column: 7, offset: 41 });
//!
//! assert_eq!(error.to_string(), "SyntaxError: Expected ';', got '}' (line 3, column 7)");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{ErrorKind, JsError};
pub use source::SourcePosition;
