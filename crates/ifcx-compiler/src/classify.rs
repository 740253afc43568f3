// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity classification
//!
//! Computed from the final merged graph: a path nobody references is a
//! standalone root, anything referenced as a child or base is a fragment.

use crate::merge::MergedGraph;
use rustc_hash::FxHashMap;

/// Role of a node in the merged graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Referenced by nobody; a standalone root
    Prefab,
    /// Referenced as a child or inheritance base
    Fragment,
}

/// Reference counts over one merged graph
#[derive(Clone, Debug, Default)]
pub struct Classification {
    references: FxHashMap<String, usize>,
    roots: Vec<String>,
}

impl Classification {
    /// Classify every node of `graph`
    ///
    /// References from a node to itself and to paths outside the graph do
    /// not count.
    pub fn from_nodes(graph: &MergedGraph) -> Self {
        let mut references: FxHashMap<String, usize> = FxHashMap::default();

        for node in graph.nodes() {
            for target in node.dependencies() {
                if target != node.path && graph.contains(target) {
                    *references.entry(target.to_string()).or_default() += 1;
                }
            }
        }

        let roots = graph
            .nodes()
            .iter()
            .filter(|node| !references.contains_key(&node.path))
            .map(|node| node.path.clone())
            .collect();

        Self { references, roots }
    }

    /// Get the kind of a path
    pub fn kind(&self, path: &str) -> NodeKind {
        if self.references.contains_key(path) {
            NodeKind::Fragment
        } else {
            NodeKind::Prefab
        }
    }

    /// Number of child / base references to a path
    pub fn reference_count(&self, path: &str) -> usize {
        self.references.get(path).copied().unwrap_or(0)
    }

    /// Unreferenced paths in discovery order
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// The single unreferenced path, when there is exactly one
    pub fn main_root(&self) -> Option<&str> {
        match self.roots.as_slice() {
            [root] => Some(root),
            _ => None,
        }
    }
}
