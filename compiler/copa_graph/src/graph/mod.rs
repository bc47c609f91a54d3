//! Arena of directive nodes with index-based edges.

use std::fmt;

use copa_ir::{Location, SymbolId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

/// Index into the directive arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// One copy directive as seen by the graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirectiveNode {
    /// Declaration carrying the directive.
    pub bearer: SymbolId,
    /// Position among the bearer's directives.
    pub slot: usize,
    /// Resolved target, `None` when resolution failed.
    pub target: Option<SymbolId>,
    /// Explicit `Order` hint.
    pub order: i32,
    pub location: Location,
    /// Display name of the bearer.
    pub label: String,
}

/// Directed graph: an edge `a -> b` means `a` copies from the bearer of `b`.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<DirectiveNode>,
    successors: Vec<SmallVec<[NodeId; 2]>>,
}

impl DependencyGraph {
    /// Connect every directive to the directives of its target.
    ///
    /// Targets outside the set of bearers (library symbols, plain source
    /// members) contribute no edges.
    pub fn build(nodes: Vec<DirectiveNode>) -> Self {
        let mut by_bearer: FxHashMap<SymbolId, SmallVec<[NodeId; 2]>> = FxHashMap::default();
        for (index, node) in nodes.iter().enumerate() {
            by_bearer
                .entry(node.bearer)
                .or_default()
                .push(node_id(index));
        }

        let successors: Vec<SmallVec<[NodeId; 2]>> = nodes
            .iter()
            .map(|node| {
                node.target
                    .and_then(|target| by_bearer.get(&target))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();

        let graph = DependencyGraph { nodes, successors };
        debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "built directive graph"
        );
        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &DirectiveNode {
        &self.nodes[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(node_id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DirectiveNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (node_id(i), n))
    }

    /// Directives `id` depends on.
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        &self.successors[id.index()]
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(SmallVec::len).sum()
    }

    /// Source-order key used to break ties deterministically.
    pub(crate) fn position(&self, id: NodeId) -> (Location, NodeId) {
        (self.node(id).location, id)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "directive counts of one pass fit in u32"
)]
fn node_id(index: usize) -> NodeId {
    NodeId::new(index as u32)
}
