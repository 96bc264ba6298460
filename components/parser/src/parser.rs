//! Recursive descent parser
//!
//! Precedence layers, tightest first: factor, unary, term, expression,
//! shift, condition, logic, ternary, base (assignment). Compound
//! assignment and `++`/`--` are desugared into plain assignments while
//! parsing.

use core_types::{JsError, SourcePosition};
use tracing::{debug, trace};

use crate::ast::{Factor, FactorKind, Function, FunctionCall, Node, Operator, SyntaxTree, UnaryOp};
use crate::error::{syntax_error, unexpected_eof, unexpected_token};
use crate::flatten;
use crate::lexer::{Keyword, Punctuator, Token, TokenKind};
use crate::token_source::{TokenSource, TokenStream};

/// Parse a complete source buffer
pub fn parse(source: &str) -> Result<SyntaxTree, JsError> {
    Parser::new(source)?.parse()
}

/// Script parser over any [`TokenSource`]
pub struct Parser<S> {
    tokens: S,
}

impl<'a> Parser<TokenStream<'a>> {
    /// Create a new parser for the given source code
    pub fn new(source: &'a str) -> Result<Self, JsError> {
        Ok(Self::from_tokens(TokenStream::new(source)?))
    }
}

impl<S: TokenSource> Parser<S> {
    /// Create a parser reading from an existing token source
    pub fn from_tokens(tokens: S) -> Self {
        Self { tokens }
    }

    /// Parse every statement up to end of input.
    ///
    /// Nested blocks are spliced into the top-level chain, and a program
    /// with a single statement yields that statement unwrapped.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&mut self) -> Result<SyntaxTree, JsError> {
        let mut chain = None;
        let mut count = 0usize;

        while !self.check(TokenKind::EOF) {
            if let Some(statement) = self.statement()? {
                chain = Some(flatten::append(chain, statement));
                count += 1;
            }
        }

        debug!(statements = count, "parsed program");
        Ok(SyntaxTree::new(chain))
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    fn statement(&mut self) -> Result<Option<Node>, JsError> {
        match self.kind() {
            TokenKind::Identifier
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::Keyword(Keyword::New)
            | TokenKind::Keyword(Keyword::True)
            | TokenKind::Keyword(Keyword::False)
            | TokenKind::Keyword(Keyword::Null)
            | TokenKind::Keyword(Keyword::Undefined)
            | TokenKind::Punctuator(Punctuator::LParen)
            | TokenKind::Punctuator(Punctuator::LBracket)
            | TokenKind::Punctuator(Punctuator::Not)
            | TokenKind::Punctuator(Punctuator::Minus)
            | TokenKind::Punctuator(Punctuator::PlusPlus)
            | TokenKind::Punctuator(Punctuator::MinusMinus) => {
                let expression = self.base()?;
                self.expect_punct(Punctuator::Semicolon)?;
                Ok(Some(expression))
            }
            TokenKind::Punctuator(Punctuator::LBrace) => self.block(),
            TokenKind::Punctuator(Punctuator::Semicolon) => {
                while self.eat_punct(Punctuator::Semicolon)? {}
                if self.check_punct(Punctuator::RBrace) || self.check(TokenKind::EOF) {
                    Ok(None)
                } else {
                    self.statement()
                }
            }
            TokenKind::Keyword(Keyword::Var) => self.var_statement().map(Some),
            TokenKind::Keyword(Keyword::If) => self.if_statement().map(Some),
            TokenKind::Keyword(Keyword::While) => self.while_statement().map(Some),
            TokenKind::Keyword(Keyword::For) => self.for_statement().map(Some),
            TokenKind::Keyword(Keyword::Return) => self.return_statement().map(Some),
            TokenKind::Keyword(Keyword::Function) => {
                let function = self.function_definition()?;
                Ok(Some(Node::Function(function)))
            }
            _ => {
                // Nothing else can start a statement; only end of input is fine here.
                self.tokens.expect(TokenKind::EOF)?;
                Ok(None)
            }
        }
    }

    /// Statement used as a loop or branch body
    fn body(&mut self) -> Result<Option<Node>, JsError> {
        if self.check(TokenKind::EOF) {
            return Err(unexpected_eof(Some(self.position())));
        }
        self.statement()
    }

    fn block(&mut self) -> Result<Option<Node>, JsError> {
        self.expect_punct(Punctuator::LBrace)?;

        let mut chain = None;
        while !self.check_punct(Punctuator::RBrace) && !self.check(TokenKind::EOF) {
            if let Some(statement) = self.statement()? {
                chain = Some(flatten::append(chain, statement));
            }
        }

        self.expect_punct(Punctuator::RBrace)?;
        Ok(chain)
    }

    fn var_statement(&mut self) -> Result<Node, JsError> {
        self.expect_keyword(Keyword::Var)?;

        let mut chain = None;
        loop {
            let name = self.tokens.expect(TokenKind::Identifier)?;
            let mut target = Node::identifier(name.text);
            while self.eat_punct(Punctuator::Dot)? {
                let property = self.tokens.expect(TokenKind::Identifier)?;
                target = Node::binary(Operator::Member, target, Node::identifier(property.text));
            }

            let initializer = if self.eat_punct(Punctuator::Assign)? {
                Some(Box::new(self.base()?))
            } else {
                None
            };

            let definition = Node::Definition {
                target: Box::new(target),
                initializer,
            };
            chain = Some(flatten::append(chain, definition));

            if !self.eat_punct(Punctuator::Comma)? {
                break;
            }
        }

        self.expect_punct(Punctuator::Semicolon)?;
        match chain {
            Some(chain) => Ok(chain),
            None => Err(syntax_error("Empty variable declaration", Some(self.position()))),
        }
    }

    fn if_statement(&mut self) -> Result<Node, JsError> {
        self.expect_keyword(Keyword::If)?;
        self.expect_punct(Punctuator::LParen)?;
        let condition = self.base()?;
        self.expect_punct(Punctuator::RParen)?;

        let then_branch = self.body()?;
        let else_branch = if self.check(TokenKind::Keyword(Keyword::Else)) {
            self.tokens.advance()?;
            self.body()?
        } else {
            None
        };

        Ok(Node::If {
            condition: Box::new(condition),
            then_branch: then_branch.map(Box::new),
            else_branch: else_branch.map(Box::new),
        })
    }

    fn while_statement(&mut self) -> Result<Node, JsError> {
        self.expect_keyword(Keyword::While)?;
        self.expect_punct(Punctuator::LParen)?;
        let condition = self.base()?;
        self.expect_punct(Punctuator::RParen)?;
        let body = self.body()?;

        Ok(Node::While {
            condition: Box::new(condition),
            body: body.map(Box::new),
        })
    }

    fn for_statement(&mut self) -> Result<Node, JsError> {
        self.expect_keyword(Keyword::For)?;
        self.expect_punct(Punctuator::LParen)?;

        // The init clause is a full statement and consumes its own `;`.
        let init = if self.eat_punct(Punctuator::Semicolon)? {
            None
        } else {
            self.statement()?
        };

        let condition = if self.check_punct(Punctuator::Semicolon) {
            None
        } else {
            Some(self.base()?)
        };
        self.expect_punct(Punctuator::Semicolon)?;

        let update = if self.check_punct(Punctuator::RParen) {
            None
        } else {
            Some(self.base()?)
        };
        self.expect_punct(Punctuator::RParen)?;

        let body = self.body()?;

        Ok(Node::For {
            init: init.map(Box::new),
            condition: condition.map(Box::new),
            update: update.map(Box::new),
            body: body.map(Box::new),
        })
    }

    fn return_statement(&mut self) -> Result<Node, JsError> {
        self.expect_keyword(Keyword::Return)?;
        let value = if self.check_punct(Punctuator::Semicolon) {
            None
        } else {
            Some(Box::new(self.base()?))
        };
        self.expect_punct(Punctuator::Semicolon)?;
        Ok(Node::Return { value })
    }

    fn function_definition(&mut self) -> Result<Function, JsError> {
        self.expect_keyword(Keyword::Function)?;

        let name = if self.check(TokenKind::Identifier) {
            Some(self.tokens.advance()?.text)
        } else {
            None
        };

        self.expect_punct(Punctuator::LParen)?;
        let mut params = Vec::new();
        if !self.check_punct(Punctuator::RParen) {
            loop {
                params.push(self.tokens.expect(TokenKind::Identifier)?.text);
                if !self.eat_punct(Punctuator::Comma)? {
                    break;
                }
            }
        }
        self.expect_punct(Punctuator::RParen)?;

        let body = self.block()?;
        trace!(name = ?name, params = params.len(), "parsed function");
        Ok(Function::new(name, params, body))
    }

    // ---------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------

    /// Assignment, right associative
    fn base(&mut self) -> Result<Node, JsError> {
        let position = self.position();
        let left = self.ternary()?;

        let compound = match self.kind() {
            TokenKind::Punctuator(Punctuator::Assign) => None,
            TokenKind::Punctuator(Punctuator::PlusEq) => Some(Operator::Add),
            TokenKind::Punctuator(Punctuator::MinusEq) => Some(Operator::Sub),
            _ => return Ok(left),
        };

        require_lvalue(&left, position)?;
        self.tokens.advance()?;
        let value = self.base()?;

        Ok(match compound {
            None => Node::assign(left, value),
            Some(operator) => {
                let target = left.clone();
                Node::assign(target, Node::binary(operator, left, value))
            }
        })
    }

    fn ternary(&mut self) -> Result<Node, JsError> {
        let condition = self.logic()?;
        if !self.eat_punct(Punctuator::Question)? {
            return Ok(condition);
        }

        let then_branch = self.base()?;
        self.expect_punct(Punctuator::Colon)?;
        let else_branch = self.base()?;

        Ok(Node::TernaryOperator {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn logic(&mut self) -> Result<Node, JsError> {
        let mut left = self.condition()?;
        while let Some(operator) = self.binary_operator(|p| match p {
            Punctuator::And => Some(Operator::BitAnd),
            Punctuator::Or => Some(Operator::BitOr),
            Punctuator::Xor => Some(Operator::BitXor),
            Punctuator::AndAnd => Some(Operator::And),
            Punctuator::OrOr => Some(Operator::Or),
            _ => None,
        }) {
            self.tokens.advance()?;
            let right = self.condition()?;
            left = Node::binary(operator, left, right);
        }
        Ok(left)
    }

    fn condition(&mut self) -> Result<Node, JsError> {
        let mut left = self.shift()?;
        while let Some(operator) = self.binary_operator(|p| match p {
            Punctuator::EqEq => Some(Operator::Eq),
            Punctuator::NotEq => Some(Operator::NotEq),
            Punctuator::EqEqEq => Some(Operator::StrictEq),
            Punctuator::NotEqEq => Some(Operator::StrictNotEq),
            Punctuator::Lt => Some(Operator::Lt),
            Punctuator::LtEq => Some(Operator::LtEq),
            Punctuator::Gt => Some(Operator::Gt),
            Punctuator::GtEq => Some(Operator::GtEq),
            _ => None,
        }) {
            self.tokens.advance()?;
            let right = self.shift()?;
            left = Node::binary(operator, left, right);
        }
        Ok(left)
    }

    fn shift(&mut self) -> Result<Node, JsError> {
        let mut left = self.expression()?;
        while let Some(operator) = self.binary_operator(|p| match p {
            Punctuator::LtLt => Some(Operator::Shl),
            Punctuator::GtGt => Some(Operator::Shr),
            Punctuator::GtGtGt => Some(Operator::UShr),
            _ => None,
        }) {
            self.tokens.advance()?;
            let right = self.expression()?;
            left = Node::binary(operator, left, right);
        }
        Ok(left)
    }

    /// Additive layer; a leading `-` negates the first term as `0 - x`
    fn expression(&mut self) -> Result<Node, JsError> {
        let negate = self.eat_punct(Punctuator::Minus)?;
        let mut left = self.term()?;
        if negate {
            left = Node::binary(Operator::Sub, int_literal("0"), left);
        }

        while let Some(operator) = self.binary_operator(|p| match p {
            Punctuator::Plus => Some(Operator::Add),
            Punctuator::Minus => Some(Operator::Sub),
            _ => None,
        }) {
            self.tokens.advance()?;
            let right = self.term()?;
            left = Node::binary(operator, left, right);
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Node, JsError> {
        let mut left = self.unary()?;
        while let Some(operator) = self.binary_operator(|p| match p {
            Punctuator::Star => Some(Operator::Mul),
            Punctuator::Slash => Some(Operator::Div),
            Punctuator::Percent => Some(Operator::Mod),
            _ => None,
        }) {
            self.tokens.advance()?;
            let right = self.unary()?;
            left = Node::binary(operator, left, right);
        }
        Ok(left)
    }

    /// `!`, and `++`/`--` in either position, desugared to `x = x +/- 1`
    fn unary(&mut self) -> Result<Node, JsError> {
        if self.eat_punct(Punctuator::Not)? {
            let operand = self.unary()?;
            return Ok(Node::UnaryOperator {
                operator: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }

        if let Some(operator) = self.step_operator() {
            self.tokens.advance()?;
            let position = self.position();
            let operand = self.unary()?;
            return step(operand, operator, position);
        }

        let position = self.position();
        let operand = self.factor()?;
        match self.step_operator() {
            Some(operator) => {
                self.tokens.advance()?;
                step(operand, operator, position)
            }
            None => Ok(operand),
        }
    }

    fn factor(&mut self) -> Result<Node, JsError> {
        let token = self.tokens.current().clone();
        match token.kind {
            TokenKind::Punctuator(Punctuator::LParen) => {
                self.tokens.advance()?;
                let inner = self.base()?;
                self.expect_punct(Punctuator::RParen)?;
                Ok(inner)
            }
            TokenKind::Keyword(Keyword::True) => {
                self.tokens.advance()?;
                Ok(int_literal("1"))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.tokens.advance()?;
                Ok(int_literal("0"))
            }
            TokenKind::Keyword(Keyword::Null) | TokenKind::Keyword(Keyword::Undefined) => {
                self.tokens.advance()?;
                Ok(Node::Factor(Factor::new(FactorKind::Identifier, token.text)))
            }
            TokenKind::Identifier => self.access_chain(),
            TokenKind::Int => {
                self.tokens.advance()?;
                Ok(Node::Factor(Factor::new(FactorKind::Int, token.text)))
            }
            TokenKind::Float => {
                self.tokens.advance()?;
                Ok(Node::Factor(Factor::new(FactorKind::Float, token.text)))
            }
            TokenKind::String => {
                self.tokens.advance()?;
                Ok(Node::Factor(Factor::new(FactorKind::String, token.text)))
            }
            TokenKind::Punctuator(Punctuator::LBrace) => {
                let literal = self.capture_balanced(Punctuator::LBrace, Punctuator::RBrace)?;
                Ok(Node::FunctionCall(FunctionCall::constructor("__obj_", &literal)))
            }
            TokenKind::Punctuator(Punctuator::LBracket) => {
                let literal = self.capture_balanced(Punctuator::LBracket, Punctuator::RBracket)?;
                Ok(Node::FunctionCall(FunctionCall::constructor("__array_", &literal)))
            }
            TokenKind::Keyword(Keyword::Function) => {
                Ok(Node::Function(self.function_definition()?))
            }
            TokenKind::Keyword(Keyword::New) => self.new_expression(),
            TokenKind::EOF => Err(unexpected_eof(Some(token.position))),
            _ => Err(unexpected_token(
                "expression",
                &token.describe(),
                Some(token.position),
            )),
        }
    }

    /// Identifier followed by any mix of calls, `.name` and `[index]`
    fn access_chain(&mut self) -> Result<Node, JsError> {
        let first = self.tokens.expect(TokenKind::Identifier)?;
        let start = first.start;
        let mut node = Node::identifier(first.text);

        loop {
            match self.kind() {
                TokenKind::Punctuator(Punctuator::LParen) => {
                    let callee_source = self.tokens.slice(start, self.tokens.last_end()).to_string();
                    let arguments_start = self.tokens.current().start;
                    self.tokens.advance()?;

                    let mut actuals = Vec::new();
                    if !self.check_punct(Punctuator::RParen) {
                        loop {
                            actuals.push(self.base()?);
                            if !self.eat_punct(Punctuator::Comma)? {
                                break;
                            }
                        }
                    }
                    self.expect_punct(Punctuator::RParen)?;

                    let arguments_source = self
                        .tokens
                        .slice(arguments_start, self.tokens.last_end())
                        .to_string();
                    node = Node::FunctionCall(FunctionCall::new(
                        node,
                        actuals,
                        callee_source,
                        arguments_source,
                    ));
                }
                TokenKind::Punctuator(Punctuator::Dot) => {
                    self.tokens.advance()?;
                    let property = self.tokens.expect(TokenKind::Identifier)?;
                    node = Node::binary(Operator::Member, node, Node::identifier(property.text));
                }
                TokenKind::Punctuator(Punctuator::LBracket) => {
                    self.tokens.advance()?;
                    let index = self.base()?;
                    self.expect_punct(Punctuator::RBracket)?;
                    node = Node::binary(Operator::Index, node, index);
                }
                _ => return Ok(node),
            }
        }
    }

    /// `new Name(args)`, captured as raw text for the runtime
    fn new_expression(&mut self) -> Result<Node, JsError> {
        self.expect_keyword(Keyword::New)?;
        let class_name = self.tokens.expect(TokenKind::Identifier)?;
        let mut literal = class_name.text;
        if self.check_punct(Punctuator::LParen) {
            literal.push_str(&self.capture_balanced(Punctuator::LParen, Punctuator::RParen)?);
        } else {
            literal.push_str("()");
        }
        Ok(Node::FunctionCall(FunctionCall::constructor("__new_", &literal)))
    }

    /// Consume a balanced `open ... close` group and return its source text
    fn capture_balanced(&mut self, open: Punctuator, close: Punctuator) -> Result<String, JsError> {
        let first = self.expect_punct(open)?;
        let mut depth = 1usize;

        while depth > 0 {
            let token = self.tokens.advance()?;
            match token.kind {
                TokenKind::EOF => return Err(unexpected_eof(Some(token.position))),
                TokenKind::Punctuator(p) if p == open => depth += 1,
                TokenKind::Punctuator(p) if p == close => depth -= 1,
                _ => {}
            }
        }

        Ok(self.tokens.slice(first.start, self.tokens.last_end()).to_string())
    }

    // ---------------------------------------------------------------
    // Token helpers
    // ---------------------------------------------------------------

    fn kind(&self) -> TokenKind {
        self.tokens.current().kind
    }

    fn position(&self) -> SourcePosition {
        self.tokens.current().position
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.tokens.check(kind)
    }

    fn check_punct(&self, punct: Punctuator) -> bool {
        self.check(TokenKind::Punctuator(punct))
    }

    fn eat_punct(&mut self, punct: Punctuator) -> Result<bool, JsError> {
        if self.check_punct(punct) {
            self.tokens.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, punct: Punctuator) -> Result<Token, JsError> {
        self.tokens.expect(TokenKind::Punctuator(punct))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, JsError> {
        self.tokens.expect(TokenKind::Keyword(keyword))
    }

    fn binary_operator(&self, select: impl Fn(Punctuator) -> Option<Operator>) -> Option<Operator> {
        match self.kind() {
            TokenKind::Punctuator(p) => select(p),
            _ => None,
        }
    }

    fn step_operator(&self) -> Option<Operator> {
        match self.kind() {
            TokenKind::Punctuator(Punctuator::PlusPlus) => Some(Operator::Add),
            TokenKind::Punctuator(Punctuator::MinusMinus) => Some(Operator::Sub),
            _ => None,
        }
    }
}

fn int_literal(text: &str) -> Node {
    Node::Factor(Factor::new(FactorKind::Int, text))
}

/// `x++`, `++x` → `x = x + 1`
fn step(operand: Node, operator: Operator, position: SourcePosition) -> Result<Node, JsError> {
    require_lvalue(&operand, position)?;
    let target = operand.clone();
    Ok(Node::assign(
        target,
        Node::binary(operator, operand, int_literal("1")),
    ))
}

fn require_lvalue(node: &Node, position: SourcePosition) -> Result<(), JsError> {
    if node.is_lvalue() {
        Ok(())
    } else {
        Err(syntax_error(
            format!("Invalid assignment target: {}", node.kind_name()),
            Some(position),
        ))
    }
}
