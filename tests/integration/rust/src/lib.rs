//! Integration test suite for the TinyJS compiler
//!
//! This crate provides integration tests that verify components work
//! together correctly across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use jit_cli;
    pub use parser;
}

/// Fibonacci profiling script
pub const FIBONACCI: &str = include_str!("../fixtures/fibonacci.js");

/// Factorial profiling script
pub const FACTORIAL: &str = include_str!("../fixtures/factorial.js");

/// Bubble sort profiling script
pub const BUBBLE_SORT: &str = include_str!("../fixtures/bubble_sort.js");

/// Emit `source` with sequential names so the output is stable
pub fn compile_sequential(source: &str) -> String {
    use parser::{CodeEmitter, EmitterConfig, NameStrategy};

    let tree = parser::parse(source).expect("source should parse");
    let mut emitter = CodeEmitter::new(EmitterConfig::default().with_names(NameStrategy::Sequential));
    emitter.compile(&tree).expect("tree should emit")
}

/// Byte offset of `needle` in `haystack`, failing the test when absent
pub fn offset_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {:?} in:\n{}", needle, haystack))
}
