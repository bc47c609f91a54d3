use copa_diagnostic::{Diagnostic, ErrorCode};
use copa_ir::Location;

/// Why a resolved target yielded nothing to copy.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("`{target}` has no part named `{part}`")]
    UnknownPartialPart {
        part: String,
        target: String,
        available: Vec<String>,
    },

    #[error("`{member}` has no `{accessor}` accessor")]
    MissingAccessor {
        member: String,
        accessor: &'static str,
    },

    #[error("`{name}` has no body to copy")]
    MissingBody { name: String },

    #[error("a {found} cannot be copied into a {destination}")]
    Incompatible {
        found: &'static str,
        destination: &'static str,
    },
}

impl ExtractError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractError::UnknownPartialPart { .. } => ErrorCode::UnknownPartialPartName,
            ExtractError::MissingAccessor { .. } => ErrorCode::MemberCannotBeResolved,
            ExtractError::MissingBody { .. } => ErrorCode::MethodWithoutImplementation,
            ExtractError::Incompatible { .. } => ErrorCode::WrongMemberKind,
        }
    }

    pub fn to_diagnostic(&self, location: Location) -> Diagnostic {
        let diagnostic = Diagnostic::at(self.code(), location, self.to_string());
        match self {
            ExtractError::UnknownPartialPart { available, .. } if !available.is_empty() => {
                let names: Vec<String> = available.iter().map(|n| format!("`{n}`")).collect();
                diagnostic.with_note(format!("named parts are {}", names.join(", ")))
            }
            _ => diagnostic,
        }
    }
}
