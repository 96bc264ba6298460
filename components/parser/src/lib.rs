//! TinyJS Parser Component
//!
//! Turns script source into a syntax tree and renders that tree as C++ source
//! that calls back into the TinyJS runtime.
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes script source code
//! - [`TokenSource`] - The token stream the parser consumes ([`TokenStream`] wraps the lexer)
//! - [`Parser`] - Recursive descent parser producing a [`SyntaxTree`]
//! - [`Node`] - Syntax tree node kinds
//! - [`flatten`] - Sequence flattening and splicing
//! - [`CodeEmitter`] - Renders a tree as C++ source
//!
//! # Example
//!
//! ```
//! use parser::{CodeEmitter, EmitterConfig, NameStrategy, Parser};
//!
//! let source = "var a = 1; while (a < 3) { a = a + 1; }";
//! let mut parser = Parser::new(source).unwrap();
//! let tree = parser.parse().unwrap();
//!
//! let config = EmitterConfig::default().with_names(NameStrategy::Sequential);
//! let mut emitter = CodeEmitter::new(config);
//! let code = emitter.compile(&tree).unwrap();
//! assert!(code.contains("while("));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod emitter;
pub mod error;
pub mod flatten;
pub mod lexer;
pub mod names;
pub mod parser;
pub mod token_source;

pub use ast::{
    BinaryKind, BinaryOperator, Factor, FactorKind, Function, FunctionCall, Node, Operator,
    SyntaxTree, UnaryOp,
};
pub use emitter::{lvalue_path, CodeEmitter, EmitterConfig};
pub use lexer::{Keyword, Lexer, Punctuator, Token, TokenKind};
pub use names::{NameGenerator, NameStrategy};
pub use parser::{parse, Parser};
pub use token_source::{TokenSource, TokenStream};
