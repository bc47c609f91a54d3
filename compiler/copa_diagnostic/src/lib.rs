//! Diagnostic system for the copa generator.
//!
//! Every user-visible problem is a [`Diagnostic`] carrying an [`ErrorCode`]
//! from a fixed taxonomy, a [`Severity`], a message and the location of the
//! originating declaration. Errors are local to one directive: they suppress
//! that directive's output and nothing else. Warnings only annotate.
//!
//! # Error Guarantees
//!
//! ```text
//! // Can only get ErrorGuaranteed by emitting an error
//! let guarantee = queue.emit_error(diagnostic);
//! DirectiveState::Failed(guarantee)
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
