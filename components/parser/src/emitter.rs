//! Code emitter
//!
//! Walks a syntax tree and renders C++ source that drives the TinyJS runtime
//! directly. Values are `CScriptVar*` expressions and assignable places are
//! `CScriptVarLink*` locals. Anything that cannot be resolved statically
//! (calls, object and array literals, `new`) is handed back to the runtime's
//! evaluator as source text.
//!
//! Every function, wherever it appears in the tree, is rendered as a
//! top-level C++ function ("hoisted") and registered with the runtime at the
//! point where it was defined.
//!
//! Script names never reach C++ as written. A variable `x` lives in the local
//! `v_x`, an access path such as `a.b[i]` in `p_a_db_iXXXXX`, and a function
//! `f` in `fn_f`. Inside each spelling `_` only ever starts an escape, so two
//! different script names or places cannot meet on one C++ name, and keywords
//! or non-ASCII names cannot leak through.

use std::collections::HashSet;
use std::mem;

use core_types::JsError;
use tracing::debug;

use crate::ast::{BinaryOperator, Factor, FactorKind, Function, Node, Operator, SyntaxTree};
use crate::error::internal_error;
use crate::flatten;
use crate::names::{NameGenerator, NameStrategy};

/// Scope object handed to every emitted function
const SCOPE: &str = "scope_";
/// Opaque runtime context parameter
const USER_DATA: &str = "userData_";
/// Runtime handle recovered from the context parameter
const CONTEXT: &str = "js_";
/// Scratch slot for freshly boxed values
const SCRATCH: &str = "temp_";
/// Script name bound to the receiver, which lives on the scope object
const THIS: &str = "this";

/// Emitter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    /// One level of indentation
    pub indent: String,
    /// How anonymous function names and index placeholders are made
    pub names: NameStrategy,
    /// Name of the function wrapping top-level statements
    pub entry_point: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            names: NameStrategy::default(),
            entry_point: "script_main".to_string(),
        }
    }
}

impl EmitterConfig {
    /// Indent with `width` spaces per level
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }

    /// Use the given name strategy
    pub fn with_names(mut self, names: NameStrategy) -> Self {
        self.names = names;
        self
    }
}

/// Names visible inside one emitted C++ function
#[derive(Debug, Default)]
struct Frame {
    /// Script names that live in the function's own scope
    locals: HashSet<String>,
    /// C++ locals declared per open block, innermost last
    blocks: Vec<HashSet<String>>,
}

impl Frame {
    fn new(locals: HashSet<String>) -> Self {
        Self {
            locals,
            blocks: vec![HashSet::new()],
        }
    }

    fn is_declared(&self, name: &str) -> bool {
        self.blocks.iter().any(|block| block.contains(name))
    }

    fn declare(&mut self, name: &str) {
        if let Some(block) = self.blocks.last_mut() {
            block.insert(name.to_string());
        }
    }
}

/// Renders syntax trees as C++ source text
#[derive(Debug)]
pub struct CodeEmitter {
    config: EmitterConfig,
    names: NameGenerator,
    /// Finished function definitions, innermost first
    hoisted: Vec<String>,
    /// Addresses of the function nodes already rendered this pass
    rendered: HashSet<usize>,
    /// C++ function symbols handed out so far
    symbols: HashSet<String>,
    frames: Vec<Frame>,
    /// Declarations the statement being rendered needs ahead of it
    prelude: Vec<String>,
}

impl CodeEmitter {
    /// Create an emitter with the given settings
    pub fn new(config: EmitterConfig) -> Self {
        let names = NameGenerator::new(config.names);
        Self {
            config,
            names,
            hoisted: Vec::new(),
            rendered: HashSet::new(),
            symbols: HashSet::new(),
            frames: Vec::new(),
            prelude: Vec::new(),
        }
    }

    /// Active settings
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Render a whole program as one C++ translation unit.
    ///
    /// A program that is a single function definition renders as just that
    /// function. Anything else is wrapped in the configured entry point,
    /// preceded by every function it defines.
    pub fn compile(&mut self, tree: &SyntaxTree) -> Result<String, JsError> {
        self.rendered.clear();
        let entry = match tree.root() {
            Some(Node::Function(function)) => {
                self.function(function)?;
                None
            }
            root => Some(self.entry_point(root)?),
        };

        let functions = mem::take(&mut self.hoisted);
        let mut out = functions.join("\n");
        if let Some(entry) = entry {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&entry);
        }

        debug!(
            functions = functions.len(),
            bytes = out.len(),
            synthesized = self.names.issued(),
            "emitted program"
        );
        Ok(out)
    }

    /// Render `node` as statements at the given indentation.
    ///
    /// Functions met along the way are not rendered inline; their
    /// definitions come out ahead of the next [`Self::compile`] result.
    pub fn emit(&mut self, node: &Node, indentation: &str) -> Result<String, JsError> {
        if self.frames.is_empty() {
            self.frames.push(Frame::new(HashSet::new()));
        }
        self.lines(Some(node), indentation)
    }

    fn entry_point(&mut self, root: Option<&Node>) -> Result<String, JsError> {
        let mut locals = HashSet::new();
        if let Some(root) = root {
            collect_locals(root, &mut locals);
        }

        let unit = self.config.indent.clone();
        let body = self.in_frame(Frame::new(locals), |emitter| emitter.lines(root, &unit))?;

        let mut out = self.signature(&self.config.entry_point);
        out.push_str(&self.preamble());
        out.push_str(&body);
        out.push_str("}\n");
        Ok(out)
    }

    /// Render a function definition into the hoisted list; returns the
    /// script name it registers under and its C++ symbol
    fn function(&mut self, function: &Function) -> Result<(String, String), JsError> {
        let names = &mut self.names;
        let name = function
            .name_or_init(|| names.function_name())
            .to_string();
        let symbols = &mut self.symbols;
        let symbol = function
            .symbol_or_init(|| function_symbol(&name, symbols, names))
            .to_string();
        if !self.rendered.insert(function as *const Function as usize) {
            return Ok((name, symbol));
        }

        let mut locals: HashSet<String> = function.params.iter().cloned().collect();
        if let Some(body) = function.body.as_deref() {
            collect_locals(body, &mut locals);
        }
        let mut frame = Frame::new(locals);
        for param in &function.params {
            frame.declare(&variable_local(param));
        }

        let unit = self.config.indent.clone();
        let body = self.in_frame(frame, |emitter| {
            emitter.lines(function.body.as_deref(), &unit)
        })?;

        let mut out = self.signature(&symbol);
        out.push_str(&self.preamble());
        for param in &function.params {
            out.push_str(&format!(
                "{}CScriptVarLink* {} = {}->findChildOrCreate(\"{}\");\n",
                unit,
                variable_local(param),
                SCOPE,
                escape(param)
            ));
        }
        out.push_str(&body);
        out.push_str("}\n");

        self.hoisted.push(out);
        Ok((name, symbol))
    }

    fn signature(&self, name: &str) -> String {
        format!("void {}(CScriptVar* {}, void* {}) {{\n", name, SCOPE, USER_DATA)
    }

    fn preamble(&self) -> String {
        let unit = &self.config.indent;
        format!(
            "{0}CScriptVar* {1};\n{0}CTinyJS* {2} = (CTinyJS*){3};\n",
            unit, SCRATCH, CONTEXT, USER_DATA
        )
    }

    /// Run `render` with a fresh frame and prelude, restoring both afterwards
    fn in_frame<T>(
        &mut self,
        frame: Frame,
        render: impl FnOnce(&mut Self) -> Result<T, JsError>,
    ) -> Result<T, JsError> {
        let outer_prelude = mem::take(&mut self.prelude);
        self.frames.push(frame);
        let result = render(self);
        self.frames.pop();
        self.prelude = outer_prelude;
        result
    }

    fn frame(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::new(HashSet::new()));
        }
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    // ---------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------

    /// Every statement of `node`, one per line, oldest first
    fn lines(&mut self, node: Option<&Node>, indent: &str) -> Result<String, JsError> {
        let mut out = String::new();
        let Some(node) = node else {
            return Ok(out);
        };

        for statement in flatten::statements(node) {
            let outer = mem::take(&mut self.prelude);
            let rendered = self.statement(statement, indent);
            let prelude = mem::replace(&mut self.prelude, outer);
            let text = rendered?;

            for line in prelude {
                out.push_str(indent);
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str(&text);
            if !statement.is_compound() {
                out.push(';');
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Body of a control construct, one level deeper and in its own block
    fn block(&mut self, node: Option<&Node>, indent: &str) -> Result<String, JsError> {
        let inner = format!("{}{}", indent, self.config.indent);
        self.frame().blocks.push(HashSet::new());
        let result = self.lines(node, &inner);
        self.frame().blocks.pop();
        result
    }

    fn statement(&mut self, node: &Node, indent: &str) -> Result<String, JsError> {
        match node {
            Node::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.value(condition)?;
                let then_text = self.block(then_branch.as_deref(), indent)?;
                let mut out = format!(
                    "{}if({}->getBool()) {{\n{}{}}}",
                    indent, condition, then_text, indent
                );
                if let Some(else_branch) = else_branch {
                    let else_text = self.block(Some(else_branch), indent)?;
                    out.push_str(&format!(" else {{\n{}{}}}", else_text, indent));
                }
                Ok(out)
            }
            Node::While { condition, body } => {
                let condition = self.value(condition)?;
                let body = self.block(body.as_deref(), indent)?;
                Ok(format!(
                    "{}while({}->getBool()) {{\n{}{}}}",
                    indent, condition, body, indent
                ))
            }
            Node::For {
                init,
                condition,
                update,
                body,
            } => {
                // The init clause runs once, so it is rendered as ordinary
                // statements ahead of the loop.
                let init = self.lines(init.as_deref(), indent)?;
                let condition = match condition {
                    Some(condition) => format!("{}->getBool()", self.value(condition)?),
                    None => String::new(),
                };
                let update = match update {
                    Some(update) => self.value(update)?,
                    None => String::new(),
                };
                let body = self.block(body.as_deref(), indent)?;
                Ok(format!(
                    "{}{}for(; {}; {}) {{\n{}{}}}",
                    init, indent, condition, update, body, indent
                ))
            }
            Node::Function(function) => {
                let (name, symbol) = self.function(function)?;
                Ok(format!("{}{}", indent, register(&name, &symbol, function)))
            }
            Node::Assign { target, value } => self.assign_statement(target, value, indent),
            Node::Definition {
                target,
                initializer,
            } => {
                let path = lvalue_path(target, &mut self.names)?;
                let name = place_local(target, &mut self.names)?;
                let lookup = format!("{}->findChildOrCreateByPath(\"{}\")", SCOPE, escape(&path));
                let declaration = self.declaration(&name, &lookup);
                match initializer {
                    None => Ok(format!("{}{}", indent, declaration)),
                    Some(initializer) => {
                        let value = self.value(initializer)?;
                        Ok(format!(
                            "{}{};\n{}{}->replaceWith({})",
                            indent, declaration, indent, name, value
                        ))
                    }
                }
            }
            Node::Return { value } => {
                let value = match value {
                    Some(value) => self.value(value)?,
                    None => "new CScriptVar()".to_string(),
                };
                Ok(format!(
                    "{}{}->setReturnVar({});\n{}return",
                    indent, SCOPE, value, indent
                ))
            }
            _ => Ok(format!("{}{}", indent, self.value(node)?)),
        }
    }

    fn assign_statement(&mut self, target: &Node, value: &Node, indent: &str) -> Result<String, JsError> {
        match target {
            Node::Identifier(name) => {
                let link = self.link(name);
                let value = self.value(value)?;
                Ok(format!("{}{}->replaceWith({})", indent, link, value))
            }
            Node::BinaryOperator(access) => {
                let name = place_local(target, &mut self.names)?;
                let link = self.access_link(access)?;
                let declaration = self.declaration(&name, &link);
                self.prelude.push(format!("{};", declaration));
                let value = self.value(value)?;
                Ok(format!("{}{}->replaceWith({})", indent, name, value))
            }
            other => Err(internal_error(format!(
                "{} is not an assignment target",
                other.kind_name()
            ))),
        }
    }

    /// `CScriptVarLink* name = init` the first time, `name = init` after
    fn declaration(&mut self, name: &str, init: &str) -> String {
        let frame = self.frame();
        if frame.is_declared(name) {
            format!("{} = {}", name, init)
        } else {
            frame.declare(name);
            format!("CScriptVarLink* {} = {}", name, init)
        }
    }

    // ---------------------------------------------------------------
    // Values
    // ---------------------------------------------------------------

    /// Render an expression producing a `CScriptVar*`
    fn value(&mut self, node: &Node) -> Result<String, JsError> {
        match node {
            Node::Factor(factor) => Ok(literal(factor)),
            Node::Identifier(name) => Ok(format!("{}->var", self.link(name))),
            Node::BinaryOperator(op) => match op.operator.runtime_tag() {
                Some(tag) => {
                    let left = self.value(&op.left)?;
                    let right = self.value(&op.right)?;
                    Ok(format!("{}->mathsOp({}, {})", left, right, tag))
                }
                None => Ok(format!("{}->var", self.access_link(op)?)),
            },
            Node::UnaryOperator { operator, operand } => {
                let operand = self.value(operand)?;
                Ok(format!(
                    "({} = new CScriptVar({}{}->getBool()))",
                    SCRATCH,
                    operator.symbol(),
                    operand
                ))
            }
            Node::TernaryOperator {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.value(condition)?;
                let then_value = self.value(then_branch)?;
                let else_value = self.value(else_branch)?;
                Ok(format!(
                    "({}->getBool() ? {} : {})",
                    condition, then_value, else_value
                ))
            }
            Node::Assign { target, value } => self.assign_value(target, value),
            Node::FunctionCall(call) => Ok(format!(
                "{}->evaluateComplex(\"{}\").var",
                CONTEXT,
                escape(&call.replay_source())
            )),
            Node::Function(function) => {
                let (name, symbol) = self.function(function)?;
                Ok(format!(
                    "({}, {}->root->findChild(\"{}\")->var)",
                    register(&name, &symbol, function),
                    CONTEXT,
                    escape(&name)
                ))
            }
            Node::Sequence { .. }
            | Node::If { .. }
            | Node::While { .. }
            | Node::For { .. }
            | Node::Definition { .. }
            | Node::Return { .. } => Err(internal_error(format!(
                "{} cannot be used as a value",
                node.kind_name()
            ))),
        }
    }

    /// Assignment inside an expression: assign, then yield the new value
    fn assign_value(&mut self, target: &Node, value: &Node) -> Result<String, JsError> {
        match target {
            Node::Identifier(name) => {
                let link = self.link(name);
                let value = self.value(value)?;
                Ok(format!("({}->replaceWith({}), {}->var)", link, value, link))
            }
            Node::BinaryOperator(access) => {
                let name = place_local(target, &mut self.names)?;
                if !self.frame().is_declared(&name) {
                    self.frame().declare(&name);
                    self.prelude.push(format!("CScriptVarLink* {};", name));
                }
                let link = self.access_link(access)?;
                let value = self.value(value)?;
                Ok(format!(
                    "({} = {}, {}->replaceWith({}), {}->var)",
                    name, link, name, value, name
                ))
            }
            other => Err(internal_error(format!(
                "{} is not an assignment target",
                other.kind_name()
            ))),
        }
    }

    /// Link for a `.`/`[...]` access
    fn access_link(&mut self, access: &BinaryOperator) -> Result<String, JsError> {
        let object = self.value(&access.left)?;
        match (access.operator, &*access.right) {
            (Operator::Member, Node::Identifier(property)) => Ok(format!(
                "{}->findChildOrCreate(\"{}\")",
                object,
                escape(property)
            )),
            (Operator::Index, index) => {
                let index = self.value(index)?;
                Ok(format!("{}->findChildOrCreate({}->getString())", object, index))
            }
            (operator, right) => Err(internal_error(format!(
                "'{}' access with {} on the right",
                operator.symbol(),
                right.kind_name()
            ))),
        }
    }

    /// C++ local holding the link for a script name, looked up on first use
    fn link(&mut self, name: &str) -> String {
        let local = variable_local(name);
        let frame = self.frame();
        if !frame.is_declared(&local) {
            let owner = if name == THIS || frame.locals.contains(name) {
                SCOPE.to_string()
            } else {
                format!("{}->root", CONTEXT)
            };
            frame.declare(&local);
            self.prelude.push(format!(
                "CScriptVarLink* {} = {}->findChildOrCreate(\"{}\");",
                local,
                owner,
                escape(name)
            ));
        }
        local
    }
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

/// Path naming the place an lvalue refers to: `a`, `a.b`, or
/// `a_array__XXXXX` where an index expression stands in the chain
pub fn lvalue_path(node: &Node, names: &mut NameGenerator) -> Result<String, JsError> {
    match node {
        Node::Identifier(name) => Ok(name.clone()),
        Node::BinaryOperator(op) => match (op.operator, &*op.right) {
            (Operator::Member, Node::Identifier(property)) => {
                Ok(format!("{}.{}", lvalue_path(&op.left, names)?, property))
            }
            (Operator::Index, _) => {
                let left = lvalue_path(&op.left, names)?;
                let placeholder = op.placeholder_or_init(|| names.placeholder());
                Ok(format!("{}_array__{}", left, placeholder))
            }
            _ => Err(internal_error(format!(
                "'{}' expression has no lvalue path",
                op.operator.symbol()
            ))),
        },
        other => Err(internal_error(format!(
            "{} has no lvalue path",
            other.kind_name()
        ))),
    }
}

/// C++ local for the link to a script variable
fn variable_local(name: &str) -> String {
    let mut out = String::from("v_");
    spell(name, &mut out);
    out
}

/// C++ local for the link an lvalue refers to. Plain names share the
/// variable's local; access chains are spelled from their structure, with
/// `_d` before a property and `_i` before an index placeholder.
fn place_local(node: &Node, names: &mut NameGenerator) -> Result<String, JsError> {
    if let Node::Identifier(name) = node {
        return Ok(variable_local(name));
    }
    let mut out = String::from("p_");
    spell_place(node, names, &mut out)?;
    Ok(out)
}

fn spell_place(node: &Node, names: &mut NameGenerator, out: &mut String) -> Result<(), JsError> {
    match node {
        Node::Identifier(name) => {
            spell(name, out);
            Ok(())
        }
        Node::BinaryOperator(op) => match (op.operator, &*op.right) {
            (Operator::Member, Node::Identifier(property)) => {
                spell_place(&op.left, names, out)?;
                out.push_str("_d");
                spell(property, out);
                Ok(())
            }
            (Operator::Index, _) => {
                spell_place(&op.left, names, out)?;
                out.push_str("_i");
                out.push_str(op.placeholder_or_init(|| names.placeholder()));
                Ok(())
            }
            _ => Err(internal_error(format!(
                "'{}' expression has no lvalue path",
                op.operator.symbol()
            ))),
        },
        other => Err(internal_error(format!(
            "{} has no lvalue path",
            other.kind_name()
        ))),
    }
}

/// Spell script text in identifier characters. ASCII letters and digits
/// stand for themselves, `_` becomes `_u` and anything else `_x` plus six
/// hex digits.
fn spell(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' => out.push(ch),
            '_' => out.push_str("_u"),
            other => out.push_str(&format!("_x{:06x}", u32::from(other))),
        }
    }
}

/// C++ symbol for a hoisted function: `fn_` plus its spelled name, with a
/// `_s` suffix from the name generator when that symbol is already taken
fn function_symbol(name: &str, taken: &mut HashSet<String>, names: &mut NameGenerator) -> String {
    let mut base = String::from("fn_");
    spell(name, &mut base);
    let mut symbol = base.clone();
    while !taken.insert(symbol.clone()) {
        symbol = format!("{}_s{}", base, names.placeholder());
    }
    symbol
}

/// `addNative` call registering a hoisted function with the runtime under
/// its script name
fn register(name: &str, symbol: &str, function: &Function) -> String {
    format!(
        "{}->addNative(\"function {}({})\", &{}, {})",
        CONTEXT,
        escape(name),
        function.params.join(", "),
        symbol,
        CONTEXT
    )
}

fn literal(factor: &Factor) -> String {
    let boxed = match factor.kind {
        FactorKind::Int => format!("new CScriptVar({})", factor.as_int()),
        FactorKind::Float => format!("new CScriptVar({:?})", factor.as_double()),
        FactorKind::String => format!("new CScriptVar(\"{}\")", escape(&factor.text)),
        FactorKind::Identifier => match factor.text.as_str() {
            "null" => "new CScriptVar(TINYJS_BLANK_DATA, SCRIPTVAR_NULL)".to_string(),
            "undefined" => "new CScriptVar()".to_string(),
            other => format!("new CScriptVar({})", other),
        },
    };
    format!("({} = {})", SCRATCH, boxed)
}

/// Escape text for a C++ string literal
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Script names declared with `var` directly in `node`, not inside nested
/// functions
fn collect_locals(node: &Node, locals: &mut HashSet<String>) {
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        match node {
            Node::Function(_) => {}
            Node::Definition { target, .. } => {
                if let Node::Identifier(name) = &**target {
                    locals.insert(name.clone());
                }
            }
            Node::Sequence { .. } => pending.extend(flatten::statements(node)),
            _ => pending.extend(node.children()),
        }
    }
}
