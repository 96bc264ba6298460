//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, SourcePosition};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_syntax_error() {
        let kind = ErrorKind::SyntaxError;
        assert!(matches!(kind, ErrorKind::SyntaxError));
    }

    #[test]
    fn test_error_kind_internal_error() {
        let kind = ErrorKind::InternalError;
        assert!(matches!(kind, ErrorKind::InternalError));
    }

    #[test]
    fn test_error_kind_is_copy() {
        let kind = ErrorKind::SyntaxError;
        let copy = kind;
        assert_eq!(kind, copy);
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_new_has_no_position() {
        let error = JsError::new(ErrorKind::SyntaxError, "Expected ')'");
        assert_eq!(error.message, "Expected ')'");
        assert!(error.source_position.is_none());
    }

    #[test]
    fn test_with_position_attaches_position() {
        let pos = SourcePosition {
            line: 4,
            column: 12,
            offset: 80,
        };
        let error = JsError::new(ErrorKind::SyntaxError, "oops").with_position(pos);
        assert_eq!(error.source_position, Some(pos));
    }

    #[test]
    fn test_is_syntax_error() {
        assert!(JsError::new(ErrorKind::SyntaxError, "a").is_syntax_error());
        assert!(!JsError::new(ErrorKind::InternalError, "b").is_syntax_error());
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&JsError::new(ErrorKind::InternalError, "x"));
    }

    #[test]
    fn test_display_includes_kind_and_message() {
        let error = JsError::new(ErrorKind::SyntaxError, "Unexpected character: '#'");
        let text = error.to_string();
        assert!(text.starts_with("SyntaxError"));
        assert!(text.contains("Unexpected character"));
    }

    #[test]
    fn test_clone_preserves_fields() {
        let error = JsError::new(ErrorKind::InternalError, "bad").with_position(SourcePosition::start());
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
