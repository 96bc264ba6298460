//! Token source seam between the parser and the lexer

use core_types::JsError;

use crate::error::{unexpected_eof, unexpected_token};
use crate::lexer::{Lexer, Token, TokenKind};

/// Supplies tokens to the parser.
///
/// The parser only ever looks at one token of lookahead. Implementations
/// must keep returning an end-of-input token once the input is exhausted.
pub trait TokenSource {
    /// The token under the cursor
    fn current(&self) -> &Token;

    /// Move past the current token and return it
    fn advance(&mut self) -> Result<Token, JsError>;

    /// Byte offset just past the most recently consumed token
    fn last_end(&self) -> usize;

    /// Verbatim source text between two byte offsets
    fn slice(&self, start: usize, end: usize) -> &str;

    /// Check whether the current token has the given kind
    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if it has the given kind, failing otherwise
    fn expect(&mut self, kind: TokenKind) -> Result<Token, JsError> {
        let token = self.current();
        if token.kind == kind {
            return self.advance();
        }
        if token.kind == TokenKind::EOF {
            Err(unexpected_eof(Some(token.position)))
        } else {
            Err(unexpected_token(
                &kind.to_string(),
                &token.describe(),
                Some(token.position),
            ))
        }
    }
}

/// [`TokenSource`] backed by the [`Lexer`]
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    current: Token,
    last_end: usize,
}

impl<'a> TokenStream<'a> {
    /// Start scanning `source`; fails if the first token is malformed
    pub fn new(source: &'a str) -> Result<Self, JsError> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            last_end: 0,
        })
    }
}

impl TokenSource for TokenStream<'_> {
    fn current(&self) -> &Token {
        &self.current
    }

    fn advance(&mut self) -> Result<Token, JsError> {
        let next = self.lexer.next_token()?;
        let consumed = std::mem::replace(&mut self.current, next);
        self.last_end = consumed.end;
        Ok(consumed)
    }

    fn last_end(&self) -> usize {
        self.last_end
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        self.lexer.source().get(start..end).unwrap_or("")
    }
}
