//! Tarjan's strongly connected components, iteratively.
//!
//! Uses an explicit work stack instead of recursion so long directive chains
//! cannot overflow the thread stack. Components come out in reverse
//! topological order: a component is emitted only after every component it
//! points to.

use crate::{DependencyGraph, GraphError, NodeId};

const UNVISITED: u32 = u32::MAX;

pub(crate) fn strongly_connected(
    graph: &DependencyGraph,
    cancelled: &dyn Fn() -> bool,
) -> Result<Vec<Vec<NodeId>>, GraphError> {
    let n = graph.len();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<NodeId> = Vec::new();
    let mut components = Vec::new();
    let mut counter = 0u32;

    // Work entries: (node, position of the next successor to visit).
    let mut work: Vec<(NodeId, usize)> = Vec::new();

    for root in graph.ids() {
        if index[root.index()] != UNVISITED {
            continue;
        }
        work.push((root, 0));

        while let Some(&mut (v, ref mut next)) = work.last_mut() {
            let vi = v.index();
            if *next == 0 && index[vi] == UNVISITED {
                if cancelled() {
                    return Err(GraphError::Cancelled);
                }
                index[vi] = counter;
                lowlink[vi] = counter;
                counter += 1;
                stack.push(v);
                on_stack[vi] = true;
            }

            if let Some(&w) = graph.successors(v).get(*next) {
                *next += 1;
                let wi = w.index();
                if index[wi] == UNVISITED {
                    work.push((w, 0));
                } else if on_stack[wi] {
                    lowlink[vi] = lowlink[vi].min(index[wi]);
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                let pi = parent.index();
                lowlink[pi] = lowlink[pi].min(lowlink[vi]);
            }

            if lowlink[vi] == index[vi] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w.index()] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    Ok(components)
}

#[cfg(test)]
mod tests;
