use copa_ir::{FileId, Location, SymbolId};
use pretty_assertions::assert_eq;

use super::*;
use crate::DirectiveNode;

fn graph(edges: &[(u32, Option<u32>)]) -> DependencyGraph {
    DependencyGraph::build(
        edges
            .iter()
            .map(|&(bearer, target)| DirectiveNode {
                bearer: SymbolId::from_raw(bearer),
                slot: 0,
                target: target.map(SymbolId::from_raw),
                order: 0,
                location: Location::at(FileId::from_raw(0), bearer),
                label: bearer.to_string(),
            })
            .collect(),
    )
}

fn components(g: &DependencyGraph) -> Vec<Vec<u32>> {
    match strongly_connected(g, &|| false) {
        Ok(components) => components
            .into_iter()
            .map(|c| {
                let mut ids: Vec<u32> = c.into_iter().map(NodeId::raw).collect();
                ids.sort_unstable();
                ids
            })
            .collect(),
        Err(e) => panic!("{e}"),
    }
}

#[test]
fn chain_is_emitted_dependencies_first() {
    // 0 -> 1 -> 2
    let g = graph(&[(0, Some(1)), (1, Some(2)), (2, None)]);
    assert_eq!(components(&g), vec![vec![2], vec![1], vec![0]]);
}

#[test]
fn two_node_cycle_is_one_component() {
    let g = graph(&[(0, Some(1)), (1, Some(0))]);
    assert_eq!(components(&g), vec![vec![0, 1]]);
}

#[test]
fn cycle_with_tail() {
    // 0 -> 1 <-> 2, 3 -> 2
    let g = graph(&[(0, Some(1)), (1, Some(2)), (2, Some(1)), (3, Some(2))]);
    assert_eq!(components(&g), vec![vec![1, 2], vec![0], vec![3]]);
}

#[test]
fn long_chain_does_not_recurse() {
    let edges: Vec<(u32, Option<u32>)> = (0..50_000).map(|i| (i, Some(i + 1))).collect();
    let g = graph(&edges);
    let found = components(&g);
    assert_eq!(found.len(), 50_000);
    assert_eq!(found[0], vec![49_999]);
}

#[test]
fn cancellation_stops_the_walk() {
    let g = graph(&[(0, Some(1)), (1, None)]);
    assert_eq!(strongly_connected(&g, &|| true), Err(GraphError::Cancelled));
}
