//! Symbol resolver for copy directives.
//!
//! Binds a parsed [`MemberReference`](copa_reference::MemberReference) (or a
//! direct type handle) against a [`SymbolGraphProvider`] and yields either a
//! [`ResolvedTarget`] or a typed [`ResolutionFailure`]. Resolution is a pure
//! function of (reference, snapshot, requesting declaration), so directives
//! can be resolved in parallel.

mod constraints;
pub mod display;
mod error;
mod overload;
mod resolver;
mod target;

use copa_ir::{DirectiveTarget, SymbolGraphProvider, SymbolId};
use copa_reference::parse_reference;

pub use error::ResolutionFailure;
pub use resolver::Resolver;
pub use target::ResolvedTarget;

/// Parse (when textual) and resolve a directive target for `context`.
#[tracing::instrument(level = "debug", skip_all, fields(context = ?context))]
pub fn resolve_target(
    graph: &dyn SymbolGraphProvider,
    target: &DirectiveTarget,
    context: SymbolId,
) -> Result<ResolvedTarget, ResolutionFailure> {
    let resolver = Resolver::new(graph, context);
    match target {
        DirectiveTarget::Reference(text) => {
            let reference =
                parse_reference(text).map_err(|error| ResolutionFailure::Malformed {
                    reference: text.clone(),
                    error,
                })?;
            resolver.resolve(&reference)
        }
        DirectiveTarget::Type(id) => resolver.resolve_symbol(*id),
    }
}
