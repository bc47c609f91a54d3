//! Shared data model of the copa generator.
//!
//! Everything that flows between phases lives here: source locations, the
//! symbol model, the attribute-shaped directive surface and the
//! [`SymbolGraphProvider`] oracle together with its in-memory implementation.
//!
//! ```text
//! SnapshotBuilder ──finish()──► ProgramSnapshot: SymbolGraphProvider
//!                                   │
//!          parse ► resolve ► graph ► extract ► rewrite ► emit
//! ```

mod directive;
mod flags;
mod provider;
pub mod snapshot;
mod span;
mod symbol;
pub mod type_text;

pub use directive::{CopyDirective, DirectiveTarget, PatternAttribute};
pub use flags::{AdditionalNodes, Modifiers};
pub use provider::SymbolGraphProvider;
pub use snapshot::{ProgramSnapshot, SnapshotBuilder};
pub use span::{FileId, Location, Span, SpanError};
pub use symbol::{
    Accessibility, Accessor, AccessorKind, Body, DeclarationPart, OperatorKind, Param, RefKind,
    Symbol, SymbolId, SymbolKind, TypeKind, TypeParam, UsingAlias,
};
