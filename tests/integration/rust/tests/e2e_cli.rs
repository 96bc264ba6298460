//! End-to-End CLI Integration Tests
//!
//! Compiles the profiling scripts through the jit_cli Compiler API, from
//! command line arguments to C++ files on disk.

use clap::Parser as ClapParser;
use integration_tests::{BUBBLE_SORT, FACTORIAL, FIBONACCI};
use jit_cli::{Cli, CliError, Compiler};
use std::fs;
use tempfile::TempDir;

fn compiler_for(cli: &Cli) -> Compiler {
    Compiler::new(cli.emitter_config()).with_print_ast(cli.print_ast)
}

#[test]
fn test_e2e_compile_profiling_scripts_to_files() {
    let dir = TempDir::new().unwrap();

    for (name, source) in [
        ("fibonacci", FIBONACCI),
        ("factorial", FACTORIAL),
        ("bubble_sort", BUBBLE_SORT),
    ] {
        let input = dir.path().join(format!("{}.js", name));
        let output = dir.path().join(format!("{}.cpp", name));
        fs::write(&input, source).unwrap();

        let args = vec![
            "tinyjit".to_string(),
            "-f".to_string(),
            input.to_str().unwrap().to_string(),
            "-o".to_string(),
            output.to_str().unwrap().to_string(),
            "--sequential-names".to_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        let mut compiler = compiler_for(&cli);
        compiler
            .compile_file_to(cli.file.as_ref().unwrap(), cli.output.as_ref().unwrap())
            .unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("void script_main(CScriptVar* scope_, void* userData_) {"));
        assert!(written.contains("void fn_get_uiterations("));
        assert!(written.ends_with("}\n"));
    }
}

#[test]
fn test_e2e_eval_matches_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("fib.js");
    fs::write(&input, FIBONACCI).unwrap();

    let cli = Cli::try_parse_from(["tinyjit", "--sequential-names", "-e", FIBONACCI]).unwrap();
    let from_eval = compiler_for(&cli)
        .compile_string(cli.eval.as_ref().unwrap())
        .unwrap();
    let from_file = compiler_for(&cli).compile_file(&input).unwrap();

    assert_eq!(from_eval, from_file);
}

#[test]
fn test_e2e_indent_flag() {
    let cli = Cli::try_parse_from(["tinyjit", "--indent", "2", "--sequential-names"]).unwrap();
    let code = compiler_for(&cli).compile_string(FACTORIAL).unwrap();

    assert!(code.contains("\n  for(; v_i->var->mathsOp(v_n->var, LEX_LEQUAL)->getBool(); "));
    assert!(code.contains("\n    v_total->replaceWith(v_total->var->mathsOp(v_i->var, '*'));\n"));
}

#[test]
fn test_e2e_broken_script_reports_syntax_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.js");
    let broken = FIBONACCI.replace("return current;", "return current");
    fs::write(&input, broken).unwrap();

    let mut compiler = compiler_for(&Cli::with_file(input.to_str().unwrap()));
    match compiler.compile_file(&input) {
        Err(CliError::Js(e)) => {
            assert!(e.is_syntax_error());
            assert_eq!(e.message, "Expected ';', got '}'");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_e2e_long_script_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("long.js");
    let output = dir.path().join("long.cpp");
    let mut source = String::from("function tick(n) { return n + 1; }\n");
    for i in 0..200_000 {
        source.push_str(&format!("v{} = {};\n", i % 100, i));
    }
    fs::write(&input, source).unwrap();

    let cli = Cli::try_parse_from(["tinyjit", "--sequential-names"]).unwrap();
    let handle = std::thread::spawn(move || {
        let mut compiler = compiler_for(&cli);
        compiler.compile_file_to(&input, &output).map(|()| output)
    });
    let output = handle.join().expect("compiler thread").unwrap();

    let written = fs::read_to_string(output).unwrap();
    assert!(written.starts_with("void fn_tick("));
    assert_eq!(written.matches("->replaceWith((temp_ = new CScriptVar(").count(), 200_000);
    assert!(written.contains("    v_v99->replaceWith((temp_ = new CScriptVar(199999)));\n"));

    // a syntax error at the very end still unwinds cleanly
    let broken = "x = 1;\n".repeat(200_000) + "x = ;";
    let err = std::thread::spawn(move || Compiler::default().compile_string(&broken))
        .join()
        .expect("compiler thread")
        .unwrap_err();
    assert!(matches!(err, CliError::Js(ref e) if e.is_syntax_error()));
}
