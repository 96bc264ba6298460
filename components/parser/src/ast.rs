//! Abstract Syntax Tree node definitions
//!
//! Every node owns its children through `Box`, so the tree is dropped as a
//! unit. Statement lists are chained through [`Node::Sequence`], which only
//! ever nests on its left (`first`) side. That chain is as deep as the
//! program is long, so dropping, cloning and comparing walk it in a loop.

use std::cell::OnceCell;
use std::fmt;

use crate::flatten;

/// Syntax tree node
#[derive(Debug)]
pub enum Node {
    /// Statement chain: everything before, then the most recent statement
    Sequence {
        /// Earlier statements (a single statement or another Sequence)
        first: Option<Box<Node>>,
        /// Most recent statement, never a Sequence
        last: Box<Node>,
    },

    /// Conditional statement
    If {
        /// Condition
        condition: Box<Node>,
        /// Then branch (None for an empty block)
        then_branch: Option<Box<Node>>,
        /// Else branch
        else_branch: Option<Box<Node>>,
    },

    /// While loop
    While {
        /// Loop condition
        condition: Box<Node>,
        /// Loop body (None for an empty block)
        body: Option<Box<Node>>,
    },

    /// C-style for loop; each clause may be empty
    For {
        /// Initializer statement
        init: Option<Box<Node>>,
        /// Loop condition
        condition: Option<Box<Node>>,
        /// Update expression
        update: Option<Box<Node>>,
        /// Loop body
        body: Option<Box<Node>>,
    },

    /// Literal value
    Factor(Factor),

    /// Name reference
    Identifier(String),

    /// Function definition or function expression
    Function(Function),

    /// Call expression
    FunctionCall(FunctionCall),

    /// Assignment
    Assign {
        /// Lvalue expression
        target: Box<Node>,
        /// Assigned value
        value: Box<Node>,
    },

    /// `var` declaration of one name
    Definition {
        /// Declared lvalue
        target: Box<Node>,
        /// Initializer
        initializer: Option<Box<Node>>,
    },

    /// Conditional expression `a ? b : c`
    TernaryOperator {
        /// Condition
        condition: Box<Node>,
        /// Value when true
        then_branch: Box<Node>,
        /// Value when false
        else_branch: Box<Node>,
    },

    /// Binary operation, including `.` and `[...]` access
    BinaryOperator(BinaryOperator),

    /// Prefix operation
    UnaryOperator {
        /// Operator
        operator: UnaryOp,
        /// Operand
        operand: Box<Node>,
    },

    /// Return statement
    Return {
        /// Returned value
        value: Option<Box<Node>>,
    },
}

impl Node {
    /// Chain `last` after `first`
    pub fn sequence(first: Option<Node>, last: Node) -> Node {
        debug_assert!(
            !matches!(last, Node::Sequence { .. }),
            "sequence chains nest on the left only"
        );
        Node::Sequence {
            first: first.map(Box::new),
            last: Box::new(last),
        }
    }

    /// Identifier node
    pub fn identifier(name: impl Into<String>) -> Node {
        Node::Identifier(name.into())
    }

    /// Binary operator node
    pub fn binary(operator: Operator, left: Node, right: Node) -> Node {
        Node::BinaryOperator(BinaryOperator::new(operator, left, right))
    }

    /// Assignment node
    pub fn assign(target: Node, value: Node) -> Node {
        Node::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    /// Short name of the node kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Sequence { .. } => "Sequence",
            Node::If { .. } => "If",
            Node::While { .. } => "While",
            Node::For { .. } => "For",
            Node::Factor(_) => "Factor",
            Node::Identifier(_) => "Identifier",
            Node::Function(_) => "Function",
            Node::FunctionCall(_) => "FunctionCall",
            Node::Assign { .. } => "Assign",
            Node::Definition { .. } => "Definition",
            Node::TernaryOperator { .. } => "TernaryOperator",
            Node::BinaryOperator(op) => match op.kind() {
                BinaryKind::Arithmetic => "BinaryOperator",
                BinaryKind::Relation => "Relation",
                BinaryKind::Condition => "Condition",
                BinaryKind::Access => "Access",
            },
            Node::UnaryOperator { .. } => "UnaryOperator",
            Node::Return { .. } => "Return",
        }
    }

    /// All direct children in source order
    pub fn children(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = Vec::new();
        match self {
            Node::Sequence { first, last } => {
                out.extend(first.as_deref());
                out.push(last);
            }
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(condition);
                out.extend(then_branch.as_deref());
                out.extend(else_branch.as_deref());
            }
            Node::While { condition, body } => {
                out.push(condition);
                out.extend(body.as_deref());
            }
            Node::For {
                init,
                condition,
                update,
                body,
            } => {
                out.extend(init.as_deref());
                out.extend(condition.as_deref());
                out.extend(update.as_deref());
                out.extend(body.as_deref());
            }
            Node::Factor(_) | Node::Identifier(_) => {}
            Node::Function(function) => out.extend(function.body.as_deref()),
            Node::FunctionCall(call) => {
                out.push(&call.callee);
                out.extend(call.actuals.iter());
            }
            Node::Assign { target, value } => {
                out.push(target);
                out.push(value);
            }
            Node::Definition {
                target,
                initializer,
            } => {
                out.push(target);
                out.extend(initializer.as_deref());
            }
            Node::TernaryOperator {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push(condition);
                out.push(then_branch);
                out.push(else_branch);
            }
            Node::BinaryOperator(op) => {
                out.push(&op.left);
                out.push(&op.right);
            }
            Node::UnaryOperator { operand, .. } => out.push(operand),
            Node::Return { value } => out.extend(value.as_deref()),
        }
        out
    }

    /// True when no Sequence anywhere in the tree has a Sequence as `last`
    pub fn is_left_heavy(&self) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if let Node::Sequence { last, .. } = node {
                if matches!(**last, Node::Sequence { .. }) {
                    return false;
                }
            }
            pending.extend(node.children());
        }
        true
    }

    /// Statements whose rendering is complete without a trailing `;`
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Node::Sequence { .. } | Node::If { .. } | Node::While { .. } | Node::For { .. }
        )
    }

    /// Whether the node may appear on the left of an assignment
    pub fn is_lvalue(&self) -> bool {
        match self {
            Node::Identifier(_) => true,
            Node::BinaryOperator(op) => op.kind() == BinaryKind::Access,
            _ => false,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Node::Sequence { .. } => {
                writeln!(f, "{}Sequence", pad)?;
                for statement in flatten::statements(self) {
                    statement.write_tree(f, depth + 1)?;
                }
                return Ok(());
            }
            Node::Factor(factor) => {
                writeln!(f, "{}Factor {:?} {:?}", pad, factor.kind, factor.text)?;
                return Ok(());
            }
            Node::Identifier(name) => {
                writeln!(f, "{}Identifier {}", pad, name)?;
                return Ok(());
            }
            Node::Function(function) => {
                writeln!(
                    f,
                    "{}Function {} ({})",
                    pad,
                    function.name().unwrap_or("<anonymous>"),
                    function.params.join(", ")
                )?;
            }
            Node::FunctionCall(call) => {
                writeln!(f, "{}FunctionCall {}", pad, call.replay_source())?;
            }
            Node::BinaryOperator(op) => {
                writeln!(f, "{}{} {}", pad, self.kind_name(), op.operator.symbol())?;
            }
            Node::UnaryOperator { operator, .. } => {
                writeln!(f, "{}UnaryOperator {}", pad, operator.symbol())?;
            }
            _ => writeln!(f, "{}{}", pad, self.kind_name())?,
        }
        for child in self.children() {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // Detach the `first` spine link by link; each detached node then
        // drops with nothing left to its left.
        let Node::Sequence { first, .. } = self else {
            return;
        };
        let mut next = first.take();
        while let Some(mut node) = next {
            next = match &mut *node {
                Node::Sequence { first, .. } => first.take(),
                _ => None,
            };
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        match self {
            Node::Sequence { first, last } => Node::Sequence {
                first: clone_spine(first.as_deref()),
                last: last.clone(),
            },
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => Node::If {
                condition: condition.clone(),
                then_branch: then_branch.clone(),
                else_branch: else_branch.clone(),
            },
            Node::While { condition, body } => Node::While {
                condition: condition.clone(),
                body: body.clone(),
            },
            Node::For {
                init,
                condition,
                update,
                body,
            } => Node::For {
                init: init.clone(),
                condition: condition.clone(),
                update: update.clone(),
                body: body.clone(),
            },
            Node::Factor(factor) => Node::Factor(factor.clone()),
            Node::Identifier(name) => Node::Identifier(name.clone()),
            Node::Function(function) => Node::Function(function.clone()),
            Node::FunctionCall(call) => Node::FunctionCall(call.clone()),
            Node::Assign { target, value } => Node::Assign {
                target: target.clone(),
                value: value.clone(),
            },
            Node::Definition {
                target,
                initializer,
            } => Node::Definition {
                target: target.clone(),
                initializer: initializer.clone(),
            },
            Node::TernaryOperator {
                condition,
                then_branch,
                else_branch,
            } => Node::TernaryOperator {
                condition: condition.clone(),
                then_branch: then_branch.clone(),
                else_branch: else_branch.clone(),
            },
            Node::BinaryOperator(op) => Node::BinaryOperator(op.clone()),
            Node::UnaryOperator { operator, operand } => Node::UnaryOperator {
                operator: *operator,
                operand: operand.clone(),
            },
            Node::Return { value } => Node::Return {
                value: value.clone(),
            },
        }
    }
}

/// Copy of a `first` spine, rebuilt bottom-up
fn clone_spine(node: Option<&Node>) -> Option<Box<Node>> {
    let mut lasts = Vec::new();
    let mut rebuilt = None;
    let mut cursor = node;
    while let Some(node) = cursor {
        match node {
            Node::Sequence { first, last } => {
                lasts.push(last);
                cursor = first.as_deref();
            }
            leaf => {
                rebuilt = Some(Box::new(leaf.clone()));
                cursor = None;
            }
        }
    }
    for last in lasts.into_iter().rev() {
        rebuilt = Some(Box::new(Node::Sequence {
            first: rebuilt,
            last: last.clone(),
        }));
    }
    rebuilt
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let (mut left, mut right) = (self, other);
        while let (
            Node::Sequence { first: a, last: x },
            Node::Sequence { first: b, last: y },
        ) = (left, right)
        {
            if x != y {
                return false;
            }
            match (a.as_deref(), b.as_deref()) {
                (Some(a), Some(b)) => {
                    left = a;
                    right = b;
                }
                (None, None) => return true,
                _ => return false,
            }
        }

        match (left, right) {
            (
                Node::If {
                    condition: c1,
                    then_branch: t1,
                    else_branch: e1,
                },
                Node::If {
                    condition: c2,
                    then_branch: t2,
                    else_branch: e2,
                },
            ) => c1 == c2 && t1 == t2 && e1 == e2,
            (
                Node::While {
                    condition: c1,
                    body: b1,
                },
                Node::While {
                    condition: c2,
                    body: b2,
                },
            ) => c1 == c2 && b1 == b2,
            (
                Node::For {
                    init: i1,
                    condition: c1,
                    update: u1,
                    body: b1,
                },
                Node::For {
                    init: i2,
                    condition: c2,
                    update: u2,
                    body: b2,
                },
            ) => i1 == i2 && c1 == c2 && u1 == u2 && b1 == b2,
            (Node::Factor(a), Node::Factor(b)) => a == b,
            (Node::Identifier(a), Node::Identifier(b)) => a == b,
            (Node::Function(a), Node::Function(b)) => a == b,
            (Node::FunctionCall(a), Node::FunctionCall(b)) => a == b,
            (
                Node::Assign {
                    target: t1,
                    value: v1,
                },
                Node::Assign {
                    target: t2,
                    value: v2,
                },
            ) => t1 == t2 && v1 == v2,
            (
                Node::Definition {
                    target: t1,
                    initializer: i1,
                },
                Node::Definition {
                    target: t2,
                    initializer: i2,
                },
            ) => t1 == t2 && i1 == i2,
            (
                Node::TernaryOperator {
                    condition: c1,
                    then_branch: t1,
                    else_branch: e1,
                },
                Node::TernaryOperator {
                    condition: c2,
                    then_branch: t2,
                    else_branch: e2,
                },
            ) => c1 == c2 && t1 == t2 && e1 == e2,
            (Node::BinaryOperator(a), Node::BinaryOperator(b)) => a == b,
            (
                Node::UnaryOperator {
                    operator: o1,
                    operand: a,
                },
                Node::UnaryOperator {
                    operator: o2,
                    operand: b,
                },
            ) => o1 == o2 && a == b,
            (Node::Return { value: a }, Node::Return { value: b }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// Lexical class of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
    /// Integer literal
    Int,
    /// Floating point literal
    Float,
    /// String literal
    String,
    /// Bare word (`null`, `undefined`)
    Identifier,
}

/// Literal leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    /// Lexical class
    pub kind: FactorKind,
    /// Literal text; strings are stored unescaped without quotes
    pub text: String,
}

impl Factor {
    /// Create a literal
    pub fn new(kind: FactorKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Integer value, zero when the text is not a valid integer
    pub fn as_int(&self) -> i64 {
        match self.kind {
            FactorKind::Int => parse_int_prefix(&self.text),
            FactorKind::Float => self.as_double() as i64,
            FactorKind::String | FactorKind::Identifier => 0,
        }
    }

    /// Floating point value, zero when the text is not numeric
    pub fn as_double(&self) -> f64 {
        match self.kind {
            FactorKind::Float => self.text.parse().unwrap_or(0.0),
            FactorKind::Int => self.as_int() as f64,
            FactorKind::String | FactorKind::Identifier => 0.0,
        }
    }
}

/// Parse the longest integer prefix, with `0x` hex and leading-zero octal
fn parse_int_prefix(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    let mut value: i64 = 0;
    for ch in digits.chars() {
        match ch.to_digit(radix) {
            Some(d) => value = value.wrapping_mul(i64::from(radix)).wrapping_add(i64::from(d)),
            None => break,
        }
    }
    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Function definition
#[derive(Debug, Clone)]
pub struct Function {
    /// Declared name, None for anonymous functions
    pub name: Option<String>,
    /// Parameter names
    pub params: Vec<String>,
    /// Body statements
    pub body: Option<Box<Node>>,
    synthesized: OnceCell<String>,
    symbol: OnceCell<String>,
}

impl Function {
    /// Create a function node
    pub fn new(name: Option<String>, params: Vec<String>, body: Option<Node>) -> Self {
        Self {
            name,
            params,
            body: body.map(Box::new),
            synthesized: OnceCell::new(),
            symbol: OnceCell::new(),
        }
    }

    /// Declared or previously synthesized name
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.synthesized.get().map(String::as_str))
    }

    /// Declared name, or a name produced by `make` on first use and kept
    /// for the rest of the node's life
    pub fn name_or_init(&self, make: impl FnOnce() -> String) -> &str {
        match &self.name {
            Some(name) => name,
            None => self.synthesized.get_or_init(make),
        }
    }

    /// Symbol of the compiled function, produced by `make` on first use
    pub fn symbol_or_init(&self, make: impl FnOnce() -> String) -> &str {
        self.symbol.get_or_init(make)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.body == other.body
    }
}

/// Call expression
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Callee expression
    pub callee: Box<Node>,
    /// Parsed arguments
    pub actuals: Vec<Node>,
    /// Verbatim callee text
    pub callee_source: String,
    /// Verbatim argument list text, parentheses included
    pub arguments_source: String,
}

impl FunctionCall {
    /// Create a call node
    pub fn new(
        callee: Node,
        actuals: Vec<Node>,
        callee_source: impl Into<String>,
        arguments_source: impl Into<String>,
    ) -> Self {
        Self {
            callee: Box::new(callee),
            actuals,
            callee_source: callee_source.into(),
            arguments_source: arguments_source.into(),
        }
    }

    /// Call to a runtime constructor (`__obj_`, `__array_`, `__new_`) taking
    /// the raw literal text as a single string argument
    pub fn constructor(name: &str, literal_source: &str) -> Self {
        let quoted = quote_script_string(literal_source);
        Self::new(
            Node::identifier(name),
            vec![Node::Factor(Factor::new(FactorKind::String, literal_source))],
            name,
            format!("({})", quoted),
        )
    }

    /// Source text handed to the runtime evaluator
    pub fn replay_source(&self) -> String {
        format!("{}{}", self.callee_source, self.arguments_source)
    }
}

fn quote_script_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Classification of binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
    /// Arithmetic, shift and bitwise operators
    Arithmetic,
    /// Comparisons
    Relation,
    /// `&&` and `||`
    Condition,
    /// `.` and `[...]`
    Access,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `.`
    Member,
    /// `[...]`
    Index,
}

impl Operator {
    /// Source spelling
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::UShr => ">>>",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::StrictEq => "===",
            Operator::StrictNotEq => "!==",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Member => ".",
            Operator::Index => "[",
        }
    }

    /// Operator classification
    pub fn kind(&self) -> BinaryKind {
        match self {
            Operator::Eq
            | Operator::NotEq
            | Operator::StrictEq
            | Operator::StrictNotEq
            | Operator::Lt
            | Operator::LtEq
            | Operator::Gt
            | Operator::GtEq => BinaryKind::Relation,
            Operator::And | Operator::Or => BinaryKind::Condition,
            Operator::Member | Operator::Index => BinaryKind::Access,
            _ => BinaryKind::Arithmetic,
        }
    }

    /// Operator tag passed to the runtime's binary operator entry point.
    /// Access operators have no tag; they become property lookups.
    pub fn runtime_tag(&self) -> Option<&'static str> {
        let tag = match self {
            Operator::Add => "'+'",
            Operator::Sub => "'-'",
            Operator::Mul => "'*'",
            Operator::Div => "'/'",
            Operator::Mod => "'%'",
            Operator::BitAnd => "'&'",
            Operator::BitOr => "'|'",
            Operator::BitXor => "'^'",
            Operator::Lt => "'<'",
            Operator::Gt => "'>'",
            Operator::Shl => "LEX_LSHIFT",
            Operator::Shr => "LEX_RSHIFT",
            Operator::UShr => "LEX_RSHIFTUNSIGNED",
            Operator::Eq => "LEX_EQUAL",
            Operator::NotEq => "LEX_NEQUAL",
            Operator::StrictEq => "LEX_TYPEEQUAL",
            Operator::StrictNotEq => "LEX_NTYPEEQUAL",
            Operator::LtEq => "LEX_LEQUAL",
            Operator::GtEq => "LEX_GEQUAL",
            Operator::And => "LEX_ANDAND",
            Operator::Or => "LEX_OROR",
            Operator::Member | Operator::Index => return None,
        };
        Some(tag)
    }
}

/// Binary operation
#[derive(Debug, Clone)]
pub struct BinaryOperator {
    /// Operator
    pub operator: Operator,
    /// Left operand
    pub left: Box<Node>,
    /// Right operand; an Identifier for `.` access
    pub right: Box<Node>,
    placeholder: OnceCell<String>,
}

impl BinaryOperator {
    /// Create a binary operation
    pub fn new(operator: Operator, left: Node, right: Node) -> Self {
        Self {
            operator,
            left: Box::new(left),
            right: Box::new(right),
            placeholder: OnceCell::new(),
        }
    }

    /// Operator classification
    pub fn kind(&self) -> BinaryKind {
        self.operator.kind()
    }

    /// Placeholder name standing in for an index expression inside an
    /// lvalue path, produced by `make` on first use
    pub fn placeholder_or_init(&self, make: impl FnOnce() -> String) -> &str {
        self.placeholder.get_or_init(make)
    }
}

impl PartialEq for BinaryOperator {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.left == other.left && self.right == other.right
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical NOT `!`
    Not,
}

impl UnaryOp {
    /// Source spelling
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
        }
    }
}

/// Result of parsing one source buffer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyntaxTree {
    root: Option<Node>,
}

impl SyntaxTree {
    /// Wrap a parse result
    pub fn new(root: Option<Node>) -> Self {
        Self { root }
    }

    /// Root node, None for an empty program
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Take ownership of the root node
    pub fn into_root(self) -> Option<Node> {
        self.root
    }

    /// True when the program has no statements
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Top-level statements in source order
    pub fn statements(&self) -> Vec<&Node> {
        self.root.as_ref().map(flatten::statements).unwrap_or_default()
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => fmt::Display::fmt(root, f),
            None => writeln!(f, "<empty>"),
        }
    }
}
