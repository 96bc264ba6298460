//! Source position type used for error reporting.

/// Represents a position in source code.
///
/// Lines and columns are 1-indexed; `offset` is a byte offset into the
/// source buffer, so it can be used directly to slice the original text.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition {
///     line: 10,
///     column: 5,
///     offset: 150,
/// };
///
/// assert_eq!(pos.line, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
    /// Byte offset from the start of the source buffer
    pub offset: usize,
}

impl SourcePosition {
    /// Position of the first character of a buffer
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}
