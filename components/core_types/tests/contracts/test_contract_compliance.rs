//! Contract compliance tests for core_types
//!
//! The parser and emitter rely on these shapes; changing them is a breaking
//! change for every other component.

use core_types::{ErrorKind, JsError, SourcePosition};

#[test]
fn test_js_error_has_public_fields() {
    let error = JsError {
        kind: ErrorKind::SyntaxError,
        message: "Expected identifier".to_string(),
        source_position: Some(SourcePosition {
            line: 1,
            column: 5,
            offset: 4,
        }),
    };
    assert_eq!(error.kind, ErrorKind::SyntaxError);
    assert_eq!(error.source_position.map(|p| p.offset), Some(4));
}

#[test]
fn test_source_position_offset_is_byte_offset() {
    let source = "var é = 1;";
    let pos = SourcePosition {
        line: 1,
        column: 7,
        offset: source.find('=').unwrap(),
    };
    assert_eq!(&source[pos.offset..pos.offset + 1], "=");
}

#[test]
fn test_js_error_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<JsError>();
}
