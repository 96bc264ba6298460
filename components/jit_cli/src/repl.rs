//! REPL (Read-Compile-Print Loop) implementation

use crate::compiler::Compiler;
use crate::error::{CliError, CliResult};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the interactive compile loop
///
/// Each complete input is parsed and emitted, and the C++ text is printed.
///
/// # Arguments
/// * `compiler` - The Compiler instance to use
///
/// # Returns
/// `Ok(())` when the loop exits normally
pub fn run_repl(compiler: &mut Compiler) -> CliResult<()> {
    let mut editor = DefaultEditor::new()
        .map_err(|e| CliError::Repl(format!("Failed to initialize editor: {}", e)))?;

    println!("TinyJS compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Type script source to see the emitted C++, or 'exit' to quit.");
    println!();

    let mut line_buffer = String::new();
    let mut in_multiline = false;

    loop {
        let prompt = if in_multiline { "... " } else { "> " };

        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if !in_multiline && is_exit_command(trimmed) {
                    println!("Goodbye!");
                    break;
                }

                if !in_multiline && trimmed.starts_with('.') {
                    handle_repl_command(trimmed, compiler);
                    continue;
                }

                if in_multiline {
                    line_buffer.push('\n');
                }
                line_buffer.push_str(&line);

                if !is_input_complete(&line_buffer) {
                    in_multiline = true;
                    continue;
                }

                let _ = editor.add_history_entry(line_buffer.as_str());

                match compiler.compile_string(&line_buffer) {
                    Ok(code) => print!("{}", code),
                    Err(e) if e.is_incomplete_input() => {
                        in_multiline = true;
                        continue;
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }

                in_multiline = false;
                line_buffer.clear();
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                if in_multiline {
                    println!("^C");
                    line_buffer.clear();
                    in_multiline = false;
                } else {
                    println!("Press Ctrl-D or type 'exit' to quit");
                }
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                return Err(CliError::Repl(format!("Readline error: {}", err)));
            }
        }
    }

    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    matches!(input, "exit" | ".exit" | "quit")
}

/// Handle special REPL commands
fn handle_repl_command(command: &str, compiler: &Compiler) {
    match command {
        ".help" => {
            println!("REPL Commands:");
            println!("  .help     - Show this help message");
            println!("  .config   - Show emitter settings");
            println!("  .exit     - Exit the REPL");
            println!("  exit      - Exit the REPL");
            println!("  quit      - Exit the REPL");
        }
        ".config" => {
            let config = compiler.config();
            println!("Indent: {} spaces", config.indent.len());
            println!("Names: {:?}", config.names);
            println!("Entry point: {}", config.entry_point);
            println!(
                "Print AST: {}",
                if compiler.is_print_ast_enabled() {
                    "enabled"
                } else {
                    "disabled"
                }
            );
        }
        _ => {
            println!("Unknown command: {}", command);
            println!("Type .help for available commands");
        }
    }
}

/// Check if the input appears to be complete
///
/// Braces, brackets and parentheses must balance outside string literals.
fn is_input_complete(input: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut string_char = ' ';
    let mut escape_next = false;

    for c in input.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if in_string {
            match c {
                '\\' => escape_next = true,
                c if c == string_char => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = true;
                string_char = c;
            }
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && !in_string
}
