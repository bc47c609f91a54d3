use copa_diagnostic::{Diagnostic, ErrorCode};
use copa_ir::Location;

use crate::{DependencyGraph, NodeId};

/// A set of directives that depend on each other.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cycle {
    /// Sorted by source position.
    members: Vec<NodeId>,
}

impl Cycle {
    pub(crate) fn new(graph: &DependencyGraph, mut members: Vec<NodeId>) -> Self {
        members.sort_by_key(|id| graph.position(*id));
        Cycle { members }
    }

    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// Location of the earliest member.
    pub fn location(&self, graph: &DependencyGraph) -> Location {
        self.members
            .first()
            .map_or(Location::SYNTHETIC, |id| graph.node(*id).location)
    }

    /// One diagnostic for the whole cycle.
    pub fn to_diagnostic(&self, graph: &DependencyGraph) -> Diagnostic {
        let names: Vec<String> = self
            .members
            .iter()
            .map(|id| format!("`{}`", graph.node(*id).label))
            .collect();
        let mut diagnostic = Diagnostic::new(ErrorCode::CircularDependency).with_message(format!(
            "copy directives depend on each other: {}",
            names.join(", ")
        ));
        for (i, id) in self.members.iter().enumerate() {
            let node = graph.node(*id);
            diagnostic = if i == 0 {
                diagnostic.with_label(node.location, "this directive is part of a cycle")
            } else {
                diagnostic.with_secondary_label(node.location, "also part of the cycle")
            };
        }
        diagnostic.with_note("none of these declarations will be generated")
    }
}
