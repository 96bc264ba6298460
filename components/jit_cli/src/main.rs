//! TinyJS compiler CLI
//!
//! Entry point for `tinyjit`. Parses CLI arguments, installs logging and
//! delegates to the Compiler.

use clap::Parser as ClapParser;
use jit_cli::compiler::write_output;
use jit_cli::{Cli, CliError, CliResult, Compiler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .init();

    let mut compiler = Compiler::new(cli.emitter_config()).with_print_ast(cli.print_ast);

    if let Some(file) = &cli.file {
        let result = compiler.compile_file(file);
        finish(result, &cli, Some(file));
    } else if let Some(source) = &cli.eval {
        let result = compiler.compile_string(source);
        finish(result, &cli, None);
    } else if cli.repl {
        compiler.repl()?;
    } else {
        // Default: show usage
        println!("TinyJS compiler v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage:");
        println!("  tinyjit --file <FILE>       Compile a script file");
        println!("  tinyjit --eval <SOURCE>     Compile inline script source");
        println!("  tinyjit --repl              Start the interactive compile loop");
        println!();
        println!("Run 'tinyjit --help' for more options.");
    }

    Ok(())
}

/// Print or write the emitted code, or report the error and exit non-zero
fn finish(result: CliResult<String>, cli: &Cli, file: Option<&str>) {
    let outcome = result.and_then(|code| match &cli.output {
        Some(path) => write_output(path, &code),
        None => {
            print!("{}", code);
            Ok(())
        }
    });

    match outcome {
        Ok(()) => {}
        Err(CliError::Io(e)) => {
            match file {
                Some(file) => eprintln!("Error: Could not process '{}': {}", file, e),
                None => eprintln!("Error: {}", e),
            }
            std::process::exit(1);
        }
        Err(CliError::Js(e)) if e.is_syntax_error() => {
            eprintln!("Syntax Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
