//! TinyJS compiler CLI library
//!
//! Provides the [`Compiler`] struct and the supporting modules behind the
//! `tinyjit` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod compiler;
pub mod error;
pub mod repl;

pub use cli::Cli;
pub use compiler::Compiler;
pub use error::{CliError, CliResult};
