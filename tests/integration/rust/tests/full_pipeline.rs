//! Full Pipeline Integration Tests
//!
//! Source text -> Parser -> SyntaxTree -> Flattener -> CodeEmitter.

use integration_tests::{compile_sequential, offset_of};
use parser::{flatten, parse, CodeEmitter, EmitterConfig, NameStrategy, Node};

#[test]
fn test_pipeline_nested_function_hoisted_innermost_first() {
    let code = compile_sequential(
        "function outer() { function inner() { return 1; } return inner(); }",
    );

    let inner = offset_of(&code, "void fn_inner(");
    let outer = offset_of(&code, "void fn_outer(");
    assert!(inner < outer);
    assert!(code.starts_with("void fn_inner("));
    assert!(!code.contains("script_main"));
    assert!(code.contains("    js_->addNative(\"function inner()\", &fn_inner, js_);\n"));
    assert!(code.contains("    scope_->setReturnVar(js_->evaluateComplex(\"inner()\").var);\n"));
}

#[test]
fn test_pipeline_anonymous_function_value() {
    let code = compile_sequential("f = function(a) { return a; };");
    let name = "AAAAAAAAAAAAAAAAAAAA";

    assert!(code.starts_with(&format!("void fn_{}(CScriptVar* scope_, void* userData_) {{\n", name)));
    assert!(code.contains("    CScriptVarLink* v_f = js_->root->findChildOrCreate(\"f\");\n"));
    assert!(code.contains(&format!(
        "    v_f->replaceWith((js_->addNative(\"function {0}(a)\", &fn_{0}, js_), js_->root->findChild(\"{0}\")->var));\n",
        name
    )));
}

#[test]
fn test_pipeline_flattened_statements_match_emitted_order() {
    let source = "a = 1; { b = 2; { c = 3; } } d = 4;";
    let tree = parse(source).unwrap();

    let names: Vec<&str> = flatten::statements(tree.root().unwrap())
        .into_iter()
        .map(|statement| match statement {
            Node::Assign { target, .. } => match &**target {
                Node::Identifier(name) => name.as_str(),
                other => panic!("unexpected target {}", other.kind_name()),
            },
            other => panic!("unexpected statement {}", other.kind_name()),
        })
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);

    let code = compile_sequential(source);
    let positions: Vec<usize> = names
        .iter()
        .map(|name| offset_of(&code, &format!("    v_{}->replaceWith(", name)))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_pipeline_desugared_forms_emit_identically() {
    let pairs = [
        ("x += 2;", "x = x + 2;"),
        ("x -= 2;", "x = x - 2;"),
        ("x++;", "x = x + 1;"),
        ("--x;", "x = x - 1;"),
        ("a.b += c;", "a.b = a.b + c;"),
    ];
    for (sugared, plain) in pairs {
        assert_eq!(compile_sequential(sugared), compile_sequential(plain), "{}", sugared);
    }
}

#[test]
fn test_pipeline_member_assignment_reuses_declaration() {
    let code = compile_sequential("a.b = 1; a.b = 2;");

    assert_eq!(code.matches("CScriptVarLink* p_a_db = ").count(), 1);
    assert!(code.contains("    p_a_db = v_a->var->findChildOrCreate(\"b\");\n"));
    assert!(code.contains("    p_a_db->replaceWith((temp_ = new CScriptVar(2)));\n"));
}

#[test]
fn test_pipeline_ternary_and_logic() {
    let code = compile_sequential("r = a && b ? 1 : 2.5;");

    assert!(code.contains(
        "    v_r->replaceWith((v_a->var->mathsOp(v_b->var, LEX_ANDAND)->getBool() ? \
         (temp_ = new CScriptVar(1)) : (temp_ = new CScriptVar(2.5))));\n"
    ));
}

#[test]
fn test_pipeline_random_names_are_valid_identifiers() {
    let tree = parse("x[i] = function() { return 0; };").unwrap();
    let mut emitter = CodeEmitter::new(EmitterConfig::default());
    let code = emitter.compile(&tree).unwrap();

    let marker = "CScriptVarLink* p_x_i";
    let start = offset_of(&code, marker) + marker.len();
    let placeholder: String = code[start..].chars().take_while(|c| !c.is_whitespace()).collect();
    assert_eq!(placeholder.len(), 5);
    assert!(placeholder.chars().all(|c| c.is_ascii_alphabetic()));

    let Some(Node::Assign { value, .. }) = tree.root() else {
        panic!("expected an assignment");
    };
    let Node::Function(function) = &**value else {
        panic!("expected a function value");
    };
    let name = function.name().unwrap();
    assert_eq!(name.len(), 20);
    assert!(code.starts_with(&format!("void fn_{}(", name)));
}

#[test]
fn test_pipeline_seeded_output_is_stable() {
    let source = "a[b] = function() { return a[c] = 1; };";
    let compile = || {
        let tree = parse(source).unwrap();
        let config = EmitterConfig::default().with_names(NameStrategy::Random { seed: Some(99) });
        CodeEmitter::new(config).compile(&tree).unwrap()
    };
    assert_eq!(compile(), compile());
}

#[test]
fn test_pipeline_syntax_error_stops_before_emission() {
    let err = parse("while (a) { b = ; }").unwrap_err();
    assert!(err.is_syntax_error());
    let position = err.source_position.unwrap();
    assert_eq!(position.line, 1);
    assert_eq!(position.column, 17);
}
