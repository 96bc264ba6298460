//! Profiling Script Integration Tests
//!
//! Drives the fibonacci, factorial and bubble sort benchmark scripts
//! through parse -> flatten -> emit and checks the C++ that comes out.

use integration_tests::{compile_sequential, offset_of, BUBBLE_SORT, FACTORIAL, FIBONACCI};
use parser::{parse, Node};

const SIGNATURE_TAIL: &str = "(CScriptVar* scope_, void* userData_) {";

fn function_names(source: &str) -> Vec<String> {
    let tree = parse(source).expect("script should parse");
    tree.statements()
        .into_iter()
        .map(|statement| match statement {
            Node::Function(function) => function.name().unwrap_or_default().to_string(),
            other => panic!("expected only function definitions, got {}", other.kind_name()),
        })
        .collect()
}

// =============================================================================
// Fibonacci
// =============================================================================

#[test]
fn test_fibonacci_top_level_functions() {
    assert_eq!(
        function_names(FIBONACCI),
        vec!["fib", "init", "get_iterations", "setup", "run"]
    );
}

#[test]
fn test_fibonacci_functions_hoisted_before_entry_point() {
    let code = compile_sequential(FIBONACCI);

    assert_eq!(code.matches(SIGNATURE_TAIL).count(), 6);
    let fib = offset_of(&code, "void fn_fib(");
    let run = offset_of(&code, "void fn_run(");
    let main = offset_of(&code, "void script_main(");
    assert!(fib < run && run < main);

    for registration in [
        "    js_->addNative(\"function fib(n)\", &fn_fib, js_);\n",
        "    js_->addNative(\"function init()\", &fn_init, js_);\n",
        "    js_->addNative(\"function get_iterations()\", &fn_get_uiterations, js_);\n",
        "    js_->addNative(\"function setup()\", &fn_setup, js_);\n",
        "    js_->addNative(\"function run()\", &fn_run, js_);\n",
    ] {
        assert!(offset_of(&code, registration) > main);
    }
}

#[test]
fn test_fibonacci_loop_body() {
    let code = compile_sequential(FIBONACCI);

    assert!(code.contains("    CScriptVarLink* v_n = scope_->findChildOrCreate(\"n\");\n"));
    assert!(code.contains("    CScriptVarLink* v_current = scope_->findChildOrCreateByPath(\"current\");\n"));
    assert!(code.contains("    v_last->replaceWith((temp_ = new CScriptVar(0)));\n"));
    assert!(code.contains("    v_penult->replaceWith((temp_ = new CScriptVar(1)));\n"));
    assert!(code.contains(
        "    for(; v_i->var->mathsOp(v_n->var, '<')->getBool(); \
         (v_i->replaceWith(v_i->var->mathsOp((temp_ = new CScriptVar(1)), '+')), v_i->var)) {\n"
    ));
    assert!(code.contains("        v_current->replaceWith(v_last->var->mathsOp(v_penult->var, '+'));\n"));
    assert!(code.contains("        v_penult->replaceWith(v_last->var);\n"));
    assert!(code.contains("        v_last->replaceWith(v_current->var);\n"));
    assert!(code.contains("    scope_->setReturnVar(v_current->var);\n    return;\n"));
}

#[test]
fn test_fibonacci_globals_resolve_through_root() {
    let code = compile_sequential(FIBONACCI);

    let expected = "void fn_get_uiterations(CScriptVar* scope_, void* userData_) {\n\
                    \x20   CScriptVar* temp_;\n\
                    \x20   CTinyJS* js_ = (CTinyJS*)userData_;\n\
                    \x20   CScriptVarLink* v_NUM_ITERATIONS = js_->root->findChildOrCreate(\"NUM_ITERATIONS\");\n\
                    \x20   scope_->setReturnVar(v_NUM_ITERATIONS->var);\n\
                    \x20   return;\n\
                    }\n";
    assert!(code.contains(expected), "missing:\n{}\nin:\n{}", expected, code);
    assert!(code.contains("    v_NUM_ITERATIONS->replaceWith((temp_ = new CScriptVar(50)));\n"));
    assert!(code.contains("    v_MAX_FIB->replaceWith((temp_ = new CScriptVar(1000)));\n"));
}

#[test]
fn test_fibonacci_empty_function() {
    let code = compile_sequential(FIBONACCI);

    assert!(code.contains(
        "void fn_setup(CScriptVar* scope_, void* userData_) {\n\
         \x20   CScriptVar* temp_;\n\
         \x20   CTinyJS* js_ = (CTinyJS*)userData_;\n\
         }\n"
    ));
}

#[test]
fn test_fibonacci_calls_replay_source() {
    let code = compile_sequential(FIBONACCI);

    assert!(code.contains(
        r#"js_->evaluateComplex("print(\"Running fibonacci numbers - \" + NUM_ITERATIONS + \" iterations; computing fib(\" + MAX_FIB + \") each time.\")").var;"#
    ));
    assert!(code.contains("        js_->evaluateComplex(\"fib(MAX_FIB)\").var;\n"));
    assert!(code.contains("    scope_->setReturnVar((temp_ = new CScriptVar(\"fib()\")));\n"));
}

// =============================================================================
// Factorial
// =============================================================================

#[test]
fn test_factorial_top_level_functions() {
    assert_eq!(
        function_names(FACTORIAL),
        vec!["factorial", "init", "get_iterations", "setup", "run"]
    );
}

#[test]
fn test_factorial_loop() {
    let code = compile_sequential(FACTORIAL);

    let declare = offset_of(&code, "    CScriptVarLink* v_i = scope_->findChildOrCreateByPath(\"i\");\n");
    let init = offset_of(&code, "    v_i->replaceWith((temp_ = new CScriptVar(1)));\n");
    let head = offset_of(&code, "    for(; v_i->var->mathsOp(v_n->var, LEX_LEQUAL)->getBool(); ");
    assert!(declare < init && init < head);

    assert!(code.contains("        v_total->replaceWith(v_total->var->mathsOp(v_i->var, '*'));\n"));
    assert!(code.contains("    scope_->setReturnVar(v_total->var);\n"));
}

#[test]
fn test_factorial_run_loop_without_braces() {
    let code = compile_sequential(FACTORIAL);

    let global = offset_of(
        &code,
        "    CScriptVarLink* v_NUM_ITERATIONS = js_->root->findChildOrCreate(\"NUM_ITERATIONS\");\n",
    );
    let head = offset_of(&code, "    for(; v_i->var->mathsOp(v_NUM_ITERATIONS->var, '<')->getBool(); ");
    let body = offset_of(&code, "        js_->evaluateComplex(\"fib(MAX_FACT)\").var;\n");
    assert!(global < head && head < body);
}

// =============================================================================
// Bubble sort
// =============================================================================

#[test]
fn test_bubble_sort_top_level_functions() {
    assert_eq!(
        function_names(BUBBLE_SORT),
        vec!["sort", "create", "init", "get_iterations", "setup", "run"]
    );
}

#[test]
fn test_bubble_sort_member_access_in_condition() {
    let code = compile_sequential(BUBBLE_SORT);

    assert!(code.contains(
        "for(; v_i->var->mathsOp(v_array->var->findChildOrCreate(\"length\")->var\
         ->mathsOp((temp_ = new CScriptVar(1)), '-'), '<')->getBool(); "
    ));
    assert!(code.contains(
        "for(; v_j->var->mathsOp(v_array->var->findChildOrCreate(\"length\")->var, '<')->getBool(); "
    ));
}

#[test]
fn test_bubble_sort_swap_uses_index_placeholders() {
    let code = compile_sequential(BUBBLE_SORT);

    assert!(code.contains(
        "            if(v_array->var->findChildOrCreate(v_i->var->getString())->var->mathsOp(\
         v_array->var->findChildOrCreate(v_j->var->getString())->var, '>')->getBool()) {\n"
    ));
    assert!(code.contains(
        "                v_temp->replaceWith(v_array->var->findChildOrCreate(v_j->var->getString())->var);\n"
    ));

    let first = offset_of(
        &code,
        "                CScriptVarLink* p_array_iAAAAA = v_array->var->findChildOrCreate(v_j->var->getString());\n",
    );
    let first_write = offset_of(
        &code,
        "                p_array_iAAAAA->replaceWith(v_array->var->findChildOrCreate(v_i->var->getString())->var);\n",
    );
    let second = offset_of(
        &code,
        "                CScriptVarLink* p_array_iAAAAB = v_array->var->findChildOrCreate(v_i->var->getString());\n",
    );
    let second_write = offset_of(&code, "                p_array_iAAAAB->replaceWith(v_temp->var);\n");
    assert!(first < first_write && first_write < second && second < second_write);
}

#[test]
fn test_bubble_sort_script_temp_does_not_clash_with_scratch() {
    let code = compile_sequential(BUBBLE_SORT);

    assert!(code.contains("    CScriptVar* temp_;\n"));
    assert!(code.contains("                CScriptVarLink* v_temp = scope_->findChildOrCreateByPath(\"temp\");\n"));
}

#[test]
fn test_bubble_sort_array_literal_and_calls() {
    let code = compile_sequential(BUBBLE_SORT);

    assert!(code.contains(r#"    v_a->replaceWith(js_->evaluateComplex("__array_(\"[]\")").var);"#));
    assert!(code.contains(
        "        CScriptVarLink* p_a_iAAAAC = v_a->var->findChildOrCreate(v_i->var->getString());\n"
    ));
    assert!(code.contains("        p_a_iAAAAC->replaceWith(js_->evaluateComplex(\"Math.rand()\").var);\n"));
    assert!(code.contains("    v_ARRAY->replaceWith(js_->evaluateComplex(\"create()\").var);\n"));
    assert!(code.contains("    scope_->setReturnVar(v_a->var);\n"));
}

#[test]
fn test_profiling_scripts_emit_deterministically() {
    for script in [FIBONACCI, FACTORIAL, BUBBLE_SORT] {
        assert_eq!(compile_sequential(script), compile_sequential(script));
    }
}
