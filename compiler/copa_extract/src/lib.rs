//! Content extractor and structural filter.
//!
//! Given a resolved target and the directive that requested it, pulls the
//! source syntax to copy (a body, a set of accessors, or a type's member
//! list) and adapts it to the destination's signature: parameter and generic
//! names are substituted, expression bodies become blocks, implicit accessor
//! bodies are synthesized and special members are renamed. Optional syntax
//! selected by [`AdditionalNodes`](copa_ir::AdditionalNodes) is filtered by
//! what the destination can structurally carry.

mod body;
mod content;
mod error;
mod extractor;
mod flags;
mod members;

pub use body::{implicit_accessor_body, to_block};
pub use content::{ContentShape, ExtractedContent, Extraction};
pub use error::ExtractError;
pub use extractor::{extract, ExtractRequest};
pub use members::rename_in_header;
