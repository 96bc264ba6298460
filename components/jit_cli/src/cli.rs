//! Command line arguments

use clap::Parser;
use parser::{EmitterConfig, NameStrategy};
use tracing::Level;

/// TinyJS to C++ compiler
#[derive(Debug, Clone, Parser)]
#[command(name = "tinyjit", version, about = "Compile TinyJS scripts to C++ source")]
pub struct Cli {
    /// Script file to compile
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<String>,

    /// Compile inline script source
    #[arg(short = 'e', long = "eval", value_name = "SOURCE", conflicts_with = "file")]
    pub eval: Option<String>,

    /// Start the interactive compile loop
    #[arg(short = 'r', long = "repl")]
    pub repl: bool,

    /// Print the syntax tree before emitting
    #[arg(long = "print-ast")]
    pub print_ast: bool,

    /// Write the emitted C++ here instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<String>,

    /// Spaces per indentation level
    #[arg(long = "indent", value_name = "WIDTH", default_value_t = 4)]
    pub indent: usize,

    /// Seed for synthesized names, for reproducible output
    #[arg(long = "seed", value_name = "SEED", conflicts_with = "sequential_names")]
    pub seed: Option<u64>,

    /// Synthesize names from a counter instead of random letters
    #[arg(long = "sequential-names")]
    pub sequential_names: bool,

    /// Log more (repeat for debug and trace output)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            file: None,
            eval: None,
            repl: false,
            print_ast: false,
            output: None,
            indent: 4,
            seed: None,
            sequential_names: false,
            verbose: 0,
        }
    }
}

impl Cli {
    /// Arguments for compiling a single file with default settings
    pub fn with_file(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }

    /// Name synthesis strategy selected by the flags
    pub fn name_strategy(&self) -> NameStrategy {
        if self.sequential_names {
            NameStrategy::Sequential
        } else {
            NameStrategy::Random { seed: self.seed }
        }
    }

    /// Emitter settings selected by the flags
    pub fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig::default()
            .with_indent_width(self.indent)
            .with_names(self.name_strategy())
    }

    /// Most verbose log level to record
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
