// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dependency ordering
//!
//! A node depends on every path in its `children` and `inherits` maps.
//! Kahn's algorithm emits dependencies first; ready nodes are taken in
//! discovery order so the result is stable for a fixed input. When the sort
//! stalls, the lowest-index node lying on a cycle is released; nodes merely
//! waiting on a cycle keep their ordering constraints.

use crate::merge::MergedGraph;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Result of ordering a merged graph
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortOutcome {
    /// Discovery indices, dependencies before dependents
    pub order: Vec<usize>,
    /// Paths released early to break a cycle
    pub broken_cycles: Vec<String>,
}

/// Order the graph so that every node follows its dependencies
///
/// Dangling references and self references are ignored. When no node is
/// ready, the lowest discovery index inside a strongly connected component
/// of pending nodes is released with a warning and the sort continues, so
/// the order always covers every node.
pub fn topological_sort(graph: &MergedGraph) -> SortOutcome {
    let count = graph.len();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut dependencies: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut pending_deps = vec![0usize; count];

    for (index, node) in graph.nodes().iter().enumerate() {
        let mut seen: Vec<usize> = Vec::new();
        for dependency in node.dependencies() {
            let Some(dep) = graph.position(dependency) else {
                continue;
            };
            if dep == index || seen.contains(&dep) {
                continue;
            }
            seen.push(dep);
            dependents[dep].push(index);
            dependencies[index].push(dep);
            pending_deps[index] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = pending_deps
        .iter()
        .enumerate()
        .filter(|(_, &deps)| deps == 0)
        .map(|(index, _)| Reverse(index))
        .collect();

    let mut emitted = vec![false; count];
    let mut outcome = SortOutcome {
        order: Vec::with_capacity(count),
        broken_cycles: Vec::new(),
    };

    while outcome.order.len() < count {
        let index = match ready.pop() {
            Some(Reverse(index)) => index,
            None => {
                let Some(index) = lowest_on_cycle(&dependencies, &emitted)
                    .or_else(|| emitted.iter().position(|done| !done))
                else {
                    break;
                };
                let path = &graph.nodes()[index].path;
                log::warn!("Cyclic dependency detected, releasing {}", path);
                outcome.broken_cycles.push(path.clone());
                pending_deps[index] = 0;
                index
            }
        };

        if emitted[index] {
            continue;
        }
        emitted[index] = true;
        outcome.order.push(index);

        for &dependent in &dependents[index] {
            if emitted[dependent] || pending_deps[dependent] == 0 {
                continue;
            }
            pending_deps[dependent] -= 1;
            if pending_deps[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    outcome
}

/// Lowest pending index that belongs to a cycle among pending nodes
///
/// Iterative Tarjan over the dependency edges between unemitted nodes.
/// Self edges are never recorded, so only components with more than one
/// member count as cycles.
fn lowest_on_cycle(dependencies: &[Vec<usize>], emitted: &[bool]) -> Option<usize> {
    const UNVISITED: usize = usize::MAX;

    let count = dependencies.len();
    let mut visit_index = vec![UNVISITED; count];
    let mut low_link = vec![0usize; count];
    let mut on_stack = vec![false; count];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_visit = 0usize;
    let mut lowest: Option<usize> = None;

    for root in 0..count {
        if emitted[root] || visit_index[root] != UNVISITED {
            continue;
        }

        visit_index[root] = next_visit;
        low_link[root] = next_visit;
        next_visit += 1;
        stack.push(root);
        on_stack[root] = true;
        // (node, next edge to follow)
        let mut frames = vec![(root, 0usize)];

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            if let Some(&dep) = dependencies[node].get(frame.1) {
                frame.1 += 1;
                if emitted[dep] {
                    continue;
                }
                if visit_index[dep] == UNVISITED {
                    visit_index[dep] = next_visit;
                    low_link[dep] = next_visit;
                    next_visit += 1;
                    stack.push(dep);
                    on_stack[dep] = true;
                    frames.push((dep, 0));
                } else if on_stack[dep] {
                    low_link[node] = low_link[node].min(visit_index[dep]);
                }
                continue;
            }

            frames.pop();
            if low_link[node] == visit_index[node] {
                let mut size = 0usize;
                let mut component_min = node;
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    size += 1;
                    component_min = component_min.min(member);
                    if member == node {
                        break;
                    }
                }
                if size > 1 {
                    lowest = Some(lowest.map_or(component_min, |l| l.min(component_min)));
                }
            }
            if let Some(&(parent, _)) = frames.last() {
                low_link[parent] = low_link[parent].min(low_link[node]);
            }
        }
    }

    lowest
}
