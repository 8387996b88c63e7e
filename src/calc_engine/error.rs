use std::fmt;

use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// What exactly made a span ungrammatical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `+` or `*` with nothing on one side.
    DanglingOperator(char),
    /// `)` with no open bracket to close.
    UnmatchedClose,
    /// `(` still open when the span ends.
    UnclosedOpen,
    /// Space, tab or newline inside the expression.
    UnexpectedWhitespace,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DanglingOperator(op) => write!(f, "operator '{op}' is missing an operand"),
            Violation::UnmatchedClose => f.write_str("')' has no matching '('"),
            Violation::UnclosedOpen => f.write_str("'(' is never closed"),
            Violation::UnexpectedWhitespace => f.write_str("whitespace is not allowed"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("not a valid expression: {violation} (byte {offset})")]
    InvalidExpression { offset: usize, violation: Violation },
}

impl ParseError {
    pub(crate) fn at(offset: usize, violation: Violation) -> Self {
        Self::InvalidExpression { offset, violation }
    }

    /// Absolute byte offset of the offending byte in the parsed input.
    pub fn offset(&self) -> usize {
        match self {
            Self::InvalidExpression { offset, .. } => *offset,
        }
    }

    pub fn violation(&self) -> Violation {
        match self {
            Self::InvalidExpression { violation, .. } => *violation,
        }
    }

    /// Two-line diagnostic: the quoted source, then a caret under the
    /// offending byte followed by the message.
    ///
    /// `source` must be the exact bytes that were handed to `parse`.
    pub fn caret(&self, source: &str) -> String {
        let safe_loc = self.offset().min(source.len());
        let char_offset = source
            .char_indices()
            .take_while(|(i, _)| *i < safe_loc)
            .count()
            + 1; // opening quote
        format!(
            "'{source}'\n{}^ {}",
            " ".repeat(char_offset),
            self.violation()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_starts_with_kind() {
        let err = ParseError::at(3, Violation::UnmatchedClose);
        assert!(err.to_string().starts_with("not a valid expression"));
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn caret_points_at_offset() {
        let err = ParseError::at(3, Violation::UnmatchedClose);
        assert_eq!(err.caret("1+2)"), "'1+2)'\n    ^ ')' has no matching '('");
    }

    #[test]
    fn caret_clamps_past_end() {
        let err = ParseError::at(10, Violation::UnclosedOpen);
        assert_eq!(err.caret("(1"), "'(1'\n   ^ '(' is never closed");
    }

    #[test]
    fn whitespace_message() {
        let err = ParseError::at(1, Violation::UnexpectedWhitespace);
        assert_eq!(err.caret("1 2"), "'1 2'\n  ^ whitespace is not allowed");
    }
}
