// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer merging
//!
//! Entries sharing a path are combined member by member across `inherits`,
//! `attributes` and `children`. Nested values are replaced whole, never
//! merged recursively.
//!
//! Attribute keys carry the owner of their layer (`owner::name`), so an
//! attribute overrides any earlier one with the same bare name, whatever
//! its owner.

use ifcx_model::{split_attribute_key, Members, MergedNode, RawNode};
use rustc_hash::FxHashMap;

/// Merged nodes in first-seen path order
#[derive(Clone, Debug, Default)]
pub struct MergedGraph {
    nodes: Vec<MergedNode>,
    index: FxHashMap<String, usize>,
}

impl MergedGraph {
    /// Get a node by path
    pub fn get(&self, path: &str) -> Option<&MergedNode> {
        self.index.get(path).map(|&i| &self.nodes[i])
    }

    /// Discovery index of a path
    pub fn position(&self, path: &str) -> Option<usize> {
        self.index.get(path).copied()
    }

    /// Check if a path is present
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Nodes in discovery order
    pub fn nodes(&self) -> &[MergedNode] {
        &self.nodes
    }

    /// Get node count
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, node: RawNode) {
        match self.index.get(&node.path) {
            Some(&i) => {
                let existing = &mut self.nodes[i];
                overlay(&mut existing.inherits, node.inherits);
                overlay_attributes(&mut existing.attributes, node.attributes);
                overlay(&mut existing.children, node.children);
            }
            None => {
                self.index.insert(node.path.clone(), self.nodes.len());
                self.nodes.push(MergedNode::from(node));
            }
        }
    }
}

/// Combine raw entries into one node per path
///
/// Later entries win per member key; keys they do not mention are left
/// untouched. The owner stays that of the first entry for the path.
pub fn merge<I>(nodes: I) -> MergedGraph
where
    I: IntoIterator<Item = RawNode>,
{
    let mut graph = MergedGraph::default();
    let mut raw_count = 0usize;
    for node in nodes {
        raw_count += 1;
        graph.insert(node);
    }
    log::debug!("Merged {} entries into {} nodes", raw_count, graph.len());
    graph
}

fn overlay(target: &mut Members, source: Members) {
    for (key, value) in source {
        // insert keeps the position of an existing key
        target.insert(key, value);
    }
}

fn overlay_attributes(target: &mut Members, source: Members) {
    for (key, value) in source {
        let bare = split_attribute_key(&key).1;
        let shadowed = target
            .keys()
            .find(|existing| *existing != &key && split_attribute_key(existing).1 == bare)
            .cloned();

        match shadowed {
            // Swap the key in place so the attribute keeps its position
            Some(old_key) => {
                let mut replacement = Some((key, value));
                let mut rebuilt = Members::with_capacity(target.len());
                for (k, v) in std::mem::take(target) {
                    match replacement.take() {
                        Some((key, value)) if k == old_key => {
                            rebuilt.insert(key, value);
                        }
                        pending => {
                            replacement = pending;
                            rebuilt.insert(k, v);
                        }
                    }
                }
                *target = rebuilt;
            }
            None => {
                target.insert(key, value);
            }
        }
    }
}
