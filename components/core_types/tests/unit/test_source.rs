//! Unit tests for SourcePosition

use core_types::SourcePosition;

#[test]
fn test_default_is_zeroed() {
    let pos = SourcePosition::default();
    assert_eq!(pos.line, 0);
    assert_eq!(pos.column, 0);
    assert_eq!(pos.offset, 0);
}

#[test]
fn test_start_is_first_line_first_column() {
    let pos = SourcePosition::start();
    assert_eq!(pos.line, 1);
    assert_eq!(pos.column, 1);
    assert_eq!(pos.offset, 0);
}

#[test]
fn test_positions_compare_by_value() {
    let a = SourcePosition {
        line: 2,
        column: 3,
        offset: 9,
    };
    let b = a;
    assert_eq!(a, b);
    assert_ne!(a, SourcePosition::start());
}
