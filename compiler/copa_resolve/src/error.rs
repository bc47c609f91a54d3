//! Typed resolution failures.

use copa_diagnostic::{Diagnostic, ErrorCode};
use copa_ir::Location;
use copa_reference::ReferenceError;

/// Why a reference could not be bound to exactly one usable symbol.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ResolutionFailure {
    #[error("`{reference}` is not a valid member reference: {error}")]
    Malformed {
        reference: String,
        #[source]
        error: ReferenceError,
    },

    #[error("`{name}` was not found in {scope}")]
    NotFound { name: String, scope: String },

    #[error("no overload of `{name}` matches ({signature})")]
    NoMatchingOverload { name: String, signature: String },

    #[error("`{name}` is ambiguous between {count} members; add a parameter list")]
    Ambiguous { name: String, count: usize },

    #[error("`{member}` has no `{accessor}` accessor")]
    MissingAccessor {
        member: String,
        accessor: &'static str,
    },

    #[error("`{name}` is visible from several imports: {}", .candidates.join(", "))]
    Conflict {
        name: String,
        candidates: Vec<String>,
    },

    #[error("`{name}` is a {found}, expected a {expected}")]
    WrongKind {
        name: String,
        found: &'static str,
        expected: &'static str,
    },

    #[error("the implementation of `{name}` is not accessible")]
    NotAccessible { name: String },

    #[error("`{name}` has no implementation to copy")]
    NoImplementation { name: String },

    #[error("`{name}` cannot be copied into itself or a declaration deriving from it")]
    SelfOrAncestor { name: String },

    #[error("type argument `{argument}` does not satisfy the `{constraint}` constraint of `{parameter}` on `{symbol}`")]
    InvalidTypeArgument {
        symbol: String,
        parameter: String,
        argument: String,
        constraint: String,
    },
}

impl ResolutionFailure {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolutionFailure::Malformed { .. } => ErrorCode::MalformedReference,
            ResolutionFailure::NotFound { .. }
            | ResolutionFailure::NoMatchingOverload { .. }
            | ResolutionFailure::Ambiguous { .. }
            | ResolutionFailure::MissingAccessor { .. } => ErrorCode::MemberCannotBeResolved,
            ResolutionFailure::Conflict { .. } => ErrorCode::MemberConflict,
            ResolutionFailure::WrongKind { .. } => ErrorCode::WrongMemberKind,
            ResolutionFailure::NotAccessible { .. } => ErrorCode::ImplementationNotAccessible,
            ResolutionFailure::NoImplementation { .. } => ErrorCode::MethodWithoutImplementation,
            ResolutionFailure::SelfOrAncestor { .. } => ErrorCode::SelfOrAncestorReference,
            ResolutionFailure::InvalidTypeArgument { .. } => ErrorCode::InvalidTypeParameter,
        }
    }

    /// Diagnostic reported at the directive that carried the reference.
    pub fn to_diagnostic(&self, location: Location) -> Diagnostic {
        match self {
            ResolutionFailure::Malformed { reference, error } => {
                error.to_diagnostic(reference, location)
            }
            _ => Diagnostic::at(self.code(), location, self.to_string()),
        }
    }
}
