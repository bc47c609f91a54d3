//! Reference parse errors.
//!
//! The parser never reports diagnostics itself; callers convert a
//! [`ReferenceError`] with [`ReferenceError::to_diagnostic`] at the location
//! of the directive that carried the reference.

use copa_diagnostic::{Diagnostic, ErrorCode};
use copa_ir::Location;

/// Why a reference string is outside the grammar.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference is empty")]
    Empty,

    #[error("unexpected character `{ch}` at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("expected {expected} at offset {offset}, found {found}")]
    Expected {
        expected: &'static str,
        found: &'static str,
        offset: usize,
    },

    #[error("`{token}` is not an overloadable operator")]
    UnknownOperator { token: String, offset: usize },

    #[error("`{open}` at offset {offset} is never closed")]
    Unclosed { open: char, offset: usize },

    #[error("unexpected `{text}` after the end of the reference")]
    Trailing { text: String, offset: usize },

    #[error("{what} at offset {offset}")]
    Invalid { what: &'static str, offset: usize },
}

impl ReferenceError {
    /// Byte offset in the reference text where the problem was found.
    pub fn offset(&self) -> usize {
        match self {
            ReferenceError::Empty => 0,
            ReferenceError::UnexpectedChar { offset, .. }
            | ReferenceError::Expected { offset, .. }
            | ReferenceError::UnknownOperator { offset, .. }
            | ReferenceError::Unclosed { offset, .. }
            | ReferenceError::Trailing { offset, .. }
            | ReferenceError::Invalid { offset, .. } => *offset,
        }
    }

    pub fn to_diagnostic(&self, reference: &str, location: Location) -> Diagnostic {
        Diagnostic::at(
            ErrorCode::MalformedReference,
            location,
            format!("`{reference}` is not a valid member reference"),
        )
        .with_note(self.to_string())
    }
}
