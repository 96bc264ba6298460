//! Lexer - tokenizes script source into tokens

use core_types::{JsError, SourcePosition};
use std::fmt;

use crate::error::syntax_error;

/// Reserved words of the scripting language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// var keyword
    Var,
    /// function keyword
    Function,
    /// return keyword
    Return,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// while keyword
    While,
    /// for keyword
    For,
    /// new keyword
    New,
    /// true keyword
    True,
    /// false keyword
    False,
    /// null keyword
    Null,
    /// undefined keyword
    Undefined,
}

impl Keyword {
    /// Source spelling of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Var => "var",
            Keyword::Function => "function",
            Keyword::Return => "return",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::For => "for",
            Keyword::New => "new",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::Undefined => "undefined",
        }
    }

    fn from_ident(ident: &str) -> Option<Self> {
        let keyword = match ident {
            "var" => Keyword::Var,
            "function" => Keyword::Function,
            "return" => Keyword::Return,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "while" => Keyword::While,
            "for" => Keyword::For,
            "new" => Keyword::New,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "null" => Keyword::Null,
            "undefined" => Keyword::Undefined,
            _ => return None,
        };
        Some(keyword)
    }
}

/// Punctuators (operators and delimiters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuator {
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Semicolon
    Semicolon,
    /// Comma
    Comma,
    /// Dot
    Dot,
    /// Colon
    Colon,
    /// Question mark
    Question,
    /// Assignment
    Assign,
    /// Plus
    Plus,
    /// Minus
    Minus,
    /// Multiply
    Star,
    /// Divide
    Slash,
    /// Modulo
    Percent,
    /// Equality
    EqEq,
    /// Strict equality
    EqEqEq,
    /// Inequality
    NotEq,
    /// Strict inequality
    NotEqEq,
    /// Less than
    Lt,
    /// Less than or equal
    LtEq,
    /// Greater than
    Gt,
    /// Greater than or equal
    GtEq,
    /// Logical AND
    AndAnd,
    /// Logical OR
    OrOr,
    /// Logical NOT
    Not,
    /// Bitwise AND
    And,
    /// Bitwise OR
    Or,
    /// Bitwise XOR
    Xor,
    /// Left shift
    LtLt,
    /// Right shift
    GtGt,
    /// Unsigned right shift
    GtGtGt,
    /// Plus equals
    PlusEq,
    /// Minus equals
    MinusEq,
    /// Increment
    PlusPlus,
    /// Decrement
    MinusMinus,
}

impl Punctuator {
    /// Source spelling of the punctuator
    pub fn as_str(&self) -> &'static str {
        match self {
            Punctuator::LParen => "(",
            Punctuator::RParen => ")",
            Punctuator::LBrace => "{",
            Punctuator::RBrace => "}",
            Punctuator::LBracket => "[",
            Punctuator::RBracket => "]",
            Punctuator::Semicolon => ";",
            Punctuator::Comma => ",",
            Punctuator::Dot => ".",
            Punctuator::Colon => ":",
            Punctuator::Question => "?",
            Punctuator::Assign => "=",
            Punctuator::Plus => "+",
            Punctuator::Minus => "-",
            Punctuator::Star => "*",
            Punctuator::Slash => "/",
            Punctuator::Percent => "%",
            Punctuator::EqEq => "==",
            Punctuator::EqEqEq => "===",
            Punctuator::NotEq => "!=",
            Punctuator::NotEqEq => "!==",
            Punctuator::Lt => "<",
            Punctuator::LtEq => "<=",
            Punctuator::Gt => ">",
            Punctuator::GtEq => ">=",
            Punctuator::AndAnd => "&&",
            Punctuator::OrOr => "||",
            Punctuator::Not => "!",
            Punctuator::And => "&",
            Punctuator::Or => "|",
            Punctuator::Xor => "^",
            Punctuator::LtLt => "<<",
            Punctuator::GtGt => ">>",
            Punctuator::GtGtGt => ">>>",
            Punctuator::PlusEq => "+=",
            Punctuator::MinusEq => "-=",
            Punctuator::PlusPlus => "++",
            Punctuator::MinusMinus => "--",
        }
    }
}

/// Discriminated token tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input
    EOF,
    /// Identifier (variable name, property name, ...)
    Identifier,
    /// Integer literal (decimal, hex or octal)
    Int,
    /// Floating point literal
    Float,
    /// String literal
    String,
    /// Reserved word
    Keyword(Keyword),
    /// Operator or delimiter
    Punctuator(Punctuator),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::EOF => f.write_str("end of input"),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::Int => f.write_str("integer"),
            TokenKind::Float => f.write_str("number"),
            TokenKind::String => f.write_str("string"),
            TokenKind::Keyword(k) => write!(f, "'{}'", k.as_str()),
            TokenKind::Punctuator(p) => write!(f, "'{}'", p.as_str()),
        }
    }
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token tag
    pub kind: TokenKind,
    /// Token text. Identifiers and numbers keep their spelling; strings hold
    /// the unescaped contents without quotes.
    pub text: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset just past the last character
    pub end: usize,
    /// Line/column of the first character
    pub position: SourcePosition,
}

impl Token {
    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => "end of input".to_string(),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            TokenKind::Int | TokenKind::Float => format!("number '{}'", self.text),
            TokenKind::String => format!("string \"{}\"", self.text),
            TokenKind::Keyword(_) | TokenKind::Punctuator(_) => self.kind.to_string(),
        }
    }
}

/// Lexer for script source code
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// The buffer being scanned
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Result<Token, JsError> {
        self.skip_whitespace_and_comments()?;

        let start_pos = self.current_position();
        if self.is_at_end() {
            return Ok(self.make_token(TokenKind::EOF, String::new(), start_pos));
        }

        let ch = self.advance();
        let punct = match ch {
            '(' => Punctuator::LParen,
            ')' => Punctuator::RParen,
            '{' => Punctuator::LBrace,
            '}' => Punctuator::RBrace,
            '[' => Punctuator::LBracket,
            ']' => Punctuator::RBracket,
            ';' => Punctuator::Semicolon,
            ',' => Punctuator::Comma,
            '.' => Punctuator::Dot,
            ':' => Punctuator::Colon,
            '?' => Punctuator::Question,
            '*' => Punctuator::Star,
            '/' => Punctuator::Slash,
            '%' => Punctuator::Percent,
            '^' => Punctuator::Xor,

            '=' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        Punctuator::EqEqEq
                    } else {
                        Punctuator::EqEq
                    }
                } else {
                    Punctuator::Assign
                }
            }

            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        Punctuator::NotEqEq
                    } else {
                        Punctuator::NotEq
                    }
                } else {
                    Punctuator::Not
                }
            }

            '+' => {
                if self.match_char('+') {
                    Punctuator::PlusPlus
                } else if self.match_char('=') {
                    Punctuator::PlusEq
                } else {
                    Punctuator::Plus
                }
            }

            '-' => {
                if self.match_char('-') {
                    Punctuator::MinusMinus
                } else if self.match_char('=') {
                    Punctuator::MinusEq
                } else {
                    Punctuator::Minus
                }
            }

            '<' => {
                if self.match_char('<') {
                    Punctuator::LtLt
                } else if self.match_char('=') {
                    Punctuator::LtEq
                } else {
                    Punctuator::Lt
                }
            }

            '>' => {
                if self.match_char('>') {
                    if self.match_char('>') {
                        Punctuator::GtGtGt
                    } else {
                        Punctuator::GtGt
                    }
                } else if self.match_char('=') {
                    Punctuator::GtEq
                } else {
                    Punctuator::Gt
                }
            }

            '&' => {
                if self.match_char('&') {
                    Punctuator::AndAnd
                } else {
                    Punctuator::And
                }
            }

            '|' => {
                if self.match_char('|') {
                    Punctuator::OrOr
                } else {
                    Punctuator::Or
                }
            }

            '"' | '\'' => return self.scan_string(ch, start_pos),

            _ if ch.is_ascii_digit() => return self.scan_number(ch, start_pos),

            _ if is_id_start(ch) => return Ok(self.scan_identifier(start_pos)),

            _ => {
                return Err(syntax_error(
                    format!("Unexpected character: '{}'", ch),
                    Some(start_pos),
                ))
            }
        };

        let text = punct.as_str().to_string();
        Ok(self.make_token(TokenKind::Punctuator(punct), text, start_pos))
    }

    fn scan_string(&mut self, quote: char, start_pos: SourcePosition) -> Result<Token, JsError> {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            match self.peek() {
                '\\' => {
                    self.advance();
                    if self.is_at_end() {
                        break;
                    }
                    let escaped = self.advance();
                    if escaped == '\n' {
                        self.line += 1;
                        self.column = 1;
                    }
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        'x' => value.push(self.scan_hex_escape(start_pos)?),
                        _ => value.push(escaped),
                    }
                }
                '\n' => {
                    return Err(syntax_error(
                        "Unterminated string literal",
                        Some(start_pos),
                    ));
                }
                _ => value.push(self.advance()),
            }
        }

        if self.is_at_end() {
            return Err(syntax_error("Unterminated string", Some(start_pos)));
        }

        self.advance(); // Closing quote
        Ok(self.make_token(TokenKind::String, value, start_pos))
    }

    fn scan_hex_escape(&mut self, start_pos: SourcePosition) -> Result<char, JsError> {
        let mut code = 0u32;
        for _ in 0..2 {
            let digit = if self.is_at_end() {
                None
            } else {
                self.peek().to_digit(16)
            };
            match digit {
                Some(d) => {
                    self.advance();
                    code = code * 16 + d;
                }
                None => {
                    return Err(syntax_error("Invalid hexadecimal escape", Some(start_pos)));
                }
            }
        }
        char::from_u32(code).ok_or_else(|| syntax_error("Invalid hexadecimal escape", Some(start_pos)))
    }

    fn scan_number(&mut self, first: char, start_pos: SourcePosition) -> Result<Token, JsError> {
        let mut kind = TokenKind::Int;

        if first == '0' && matches!(self.peek(), 'x' | 'X') {
            self.advance();
            if !self.peek().is_ascii_hexdigit() {
                return Err(syntax_error("Invalid hexadecimal literal", Some(start_pos)));
            }
            while self.peek().is_ascii_hexdigit() {
                self.advance();
            }
        } else {
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            if self.peek() == '.' && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
                kind = TokenKind::Float;
                self.advance(); // '.'
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
            if matches!(self.peek(), 'e' | 'E') {
                let signed = matches!(self.peek_next(), Some('+') | Some('-'));
                let digit_at = if signed {
                    self.position + 2
                } else {
                    self.position + 1
                };
                if self.char_at(digit_at).map_or(false, |c| c.is_ascii_digit()) {
                    kind = TokenKind::Float;
                    self.advance(); // 'e'
                    if signed {
                        self.advance();
                    }
                    while self.peek().is_ascii_digit() {
                        self.advance();
                    }
                }
            }
        }

        if is_id_start(self.peek()) {
            return Err(syntax_error(
                "Identifier starts immediately after numeric literal",
                Some(self.current_position()),
            ));
        }

        let text = self.source[start_pos.offset..self.byte_offset()].to_string();
        Ok(self.make_token(kind, text, start_pos))
    }

    fn scan_identifier(&mut self, start_pos: SourcePosition) -> Token {
        while !self.is_at_end() && is_id_continue(self.peek()) {
            self.advance();
        }

        let ident = &self.source[start_pos.offset..self.byte_offset()];
        let kind = match Keyword::from_ident(ident) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier,
        };
        let text = ident.to_string();
        self.make_token(kind, text, start_pos)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), JsError> {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\r' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                '/' => {
                    if self.peek_next() == Some('/') {
                        // Line comment
                        while !self.is_at_end() && self.peek() != '\n' {
                            self.advance();
                        }
                    } else if self.peek_next() == Some('*') {
                        // Block comment
                        let comment_start = self.current_position();
                        self.advance(); // /
                        self.advance(); // *
                        let mut found_end = false;
                        while !self.is_at_end() {
                            if self.peek() == '*' && self.peek_next() == Some('/') {
                                self.advance(); // *
                                self.advance(); // /
                                found_end = true;
                                break;
                            }
                            if self.advance() == '\n' {
                                self.line += 1;
                                self.column = 1;
                            }
                        }
                        if !found_end {
                            return Err(syntax_error(
                                "Unterminated multi-line comment",
                                Some(comment_start),
                            ));
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn make_token(&self, kind: TokenKind, text: String, start_pos: SourcePosition) -> Token {
        Token {
            kind,
            text,
            start: start_pos.offset,
            end: self.byte_offset(),
            position: start_pos,
        }
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|&(_, c)| c)
    }

    fn peek(&self) -> char {
        self.char_at(self.position).unwrap_or('\0')
    }

    fn peek_next(&self) -> Option<char> {
        self.char_at(self.position + 1)
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.position += 1;
        self.column += 1;
        ch
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn byte_offset(&self) -> usize {
        self.chars
            .get(self.position)
            .map_or(self.source.len(), |&(offset, _)| offset)
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.byte_offset(),
        }
    }
}

fn is_id_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_id_continue(ch: char) -> bool {
    is_id_start(ch) || ch.is_ascii_digit()
}
