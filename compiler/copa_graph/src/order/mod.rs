//! Cycle exclusion and leveled topological order.

use copa_ir::Location;

use crate::scc::strongly_connected;
use crate::{Cycle, DependencyGraph, GraphError, NodeId};

/// Result of analyzing a directive graph.
#[derive(Clone, Debug)]
pub struct GraphAnalysis {
    /// Sorted by location of their earliest member.
    pub cycles: Vec<Cycle>,
    /// Every non-excluded node, dependencies first; ties within a level are
    /// broken by `Order`, then source position.
    pub order: Vec<NodeId>,
    levels: Vec<Option<u32>>,
}

impl GraphAnalysis {
    /// Whether `id` sits on a cycle.
    pub fn is_excluded(&self, id: NodeId) -> bool {
        self.levels[id.index()].is_none()
    }

    /// Longest dependency chain below `id`; 0 for nodes with no dependencies.
    pub fn level(&self, id: NodeId) -> Option<u32> {
        self.levels[id.index()]
    }
}

/// Detect cycles and order the remaining directives.
///
/// `cancelled` is polled at each traversal step.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = graph.len()))]
pub fn analyze(
    graph: &DependencyGraph,
    cancelled: &dyn Fn() -> bool,
) -> Result<GraphAnalysis, GraphError> {
    let components = strongly_connected(graph, cancelled)?;

    let mut levels: Vec<Option<u32>> = vec![None; graph.len()];
    let mut cycles = Vec::new();

    // Dependencies precede dependents in `components`, so every successor
    // level is known by the time a node is reached.
    for component in components {
        match component.as_slice() {
            [id] if !graph.successors(*id).contains(id) => {
                let level = graph
                    .successors(*id)
                    .iter()
                    .filter_map(|s| levels[s.index()])
                    .map(|l| l + 1)
                    .max()
                    .unwrap_or(0);
                levels[id.index()] = Some(level);
            }
            _ => cycles.push(Cycle::new(graph, component)),
        }
    }

    if cancelled() {
        return Err(GraphError::Cancelled);
    }

    cycles.sort_by_key(|c| c.location(graph));

    let mut order: Vec<NodeId> = graph.ids().filter(|id| levels[id.index()].is_some()).collect();
    order.sort_by_key(|id| sort_key(graph, &levels, *id));

    tracing::debug!(
        cycles = cycles.len(),
        ordered = order.len(),
        "dependency analysis complete"
    );
    Ok(GraphAnalysis {
        cycles,
        order,
        levels,
    })
}

fn sort_key(
    graph: &DependencyGraph,
    levels: &[Option<u32>],
    id: NodeId,
) -> (Option<u32>, i32, Location, NodeId) {
    let node = graph.node(id);
    (levels[id.index()], node.order, node.location, id)
}
