//! Dependency graph over the copy directives of one generation pass.
//!
//! Every directive is a node. A node depends on every directive carried by
//! the declaration it copies from, so that declaration's own copies are
//! ordered first. Strongly connected components of size two or more (and
//! self-loops) are cycles: each is reported once and all of its members are
//! excluded from generation, while the rest of the graph is ordered by
//! dependency level.

mod cycle;
mod error;
mod graph;
mod order;
mod scc;

pub use cycle::Cycle;
pub use error::GraphError;
pub use graph::{DependencyGraph, DirectiveNode, NodeId};
pub use order::{analyze, GraphAnalysis};
