//! Compile orchestration
//!
//! The [`Compiler`] owns one [`CodeEmitter`] for its whole lifetime, so
//! names synthesized for one input are never handed out again for a later
//! one (the REPL compiles many inputs into what is meant to be one program).

use std::fs;
use std::path::Path;

use parser::{CodeEmitter, EmitterConfig, SyntaxTree};
use tracing::{debug, info};

use crate::error::CliResult;

/// Parses script source and renders it as C++
#[derive(Debug)]
pub struct Compiler {
    /// Whether to print the syntax tree before emitting
    print_ast: bool,
    emitter: CodeEmitter,
}

impl Compiler {
    /// Create a compiler with the given emitter settings
    ///
    /// # Example
    /// ```
    /// use jit_cli::Compiler;
    /// use parser::EmitterConfig;
    ///
    /// let compiler = Compiler::new(EmitterConfig::default());
    /// assert!(!compiler.is_print_ast_enabled());
    /// ```
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            print_ast: false,
            emitter: CodeEmitter::new(config),
        }
    }

    /// Enable syntax tree printing
    pub fn with_print_ast(mut self, enabled: bool) -> Self {
        self.print_ast = enabled;
        self
    }

    /// Check if syntax tree printing is enabled
    pub fn is_print_ast_enabled(&self) -> bool {
        self.print_ast
    }

    /// Active emitter settings
    pub fn config(&self) -> &EmitterConfig {
        self.emitter.config()
    }

    /// Parse `source` without emitting anything
    pub fn parse(&self, source: &str) -> CliResult<SyntaxTree> {
        Ok(parser::parse(source)?)
    }

    /// Compile a script source string
    ///
    /// # Errors
    /// Returns `CliError::Js` if parsing or emission fails
    ///
    /// # Example
    /// ```
    /// use jit_cli::Compiler;
    /// use parser::{EmitterConfig, NameStrategy};
    ///
    /// let config = EmitterConfig::default().with_names(NameStrategy::Sequential);
    /// let mut compiler = Compiler::new(config);
    /// let code = compiler.compile_string("x = 1;").unwrap();
    /// assert!(code.starts_with("void script_main("));
    /// ```
    pub fn compile_string(&mut self, source: &str) -> CliResult<String> {
        let tree = self.parse(source)?;

        if self.print_ast {
            println!("AST:\n{}", tree);
        }

        let code = self.emitter.compile(&tree)?;
        debug!(source_bytes = source.len(), code_bytes = code.len(), "compiled source");
        Ok(code)
    }

    /// Compile a script file
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read or compilation fails
    ///
    /// # Example
    /// ```no_run
    /// use jit_cli::Compiler;
    /// use parser::EmitterConfig;
    ///
    /// let mut compiler = Compiler::new(EmitterConfig::default());
    /// let code = compiler.compile_file("fib.js").unwrap();
    /// ```
    pub fn compile_file(&mut self, path: impl AsRef<Path>) -> CliResult<String> {
        let path = path.as_ref();
        info!(path = %path.display(), "compiling file");
        let source = fs::read_to_string(path)?;
        self.compile_string(&source)
    }

    /// Compile `input` and write the result to `output`
    pub fn compile_file_to(
        &mut self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> CliResult<()> {
        let code = self.compile_file(input)?;
        write_output(output, &code)
    }

    /// Start the interactive compile loop
    ///
    /// # Errors
    /// Returns `CliError` if the line editor fails
    pub fn repl(&mut self) -> CliResult<()> {
        crate::repl::run_repl(self)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

/// Write emitted code to `path`, ending it with a newline
pub fn write_output(path: impl AsRef<Path>, code: &str) -> CliResult<()> {
    let path = path.as_ref();
    let mut text = code.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    fs::write(path, text)?;
    info!(path = %path.display(), bytes = code.len(), "wrote output");
    Ok(())
}
