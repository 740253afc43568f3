// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute lookup through inheritance
//!
//! An object sees its own attributes first, then those of each base in
//! declaration order, depth-first.

use crate::merge::MergedGraph;
use ifcx_model::split_attribute_key;
use rustc_hash::FxHashSet;
use serde_json::Value;

/// Resolves attributes along `inherits` edges of a merged graph
#[derive(Clone, Copy, Debug)]
pub struct InheritanceResolver<'a> {
    graph: &'a MergedGraph,
}

impl<'a> InheritanceResolver<'a> {
    /// Create a resolver over `graph`
    pub fn new(graph: &'a MergedGraph) -> Self {
        Self { graph }
    }

    /// Find the first attribute named `bare_name` visible from `path`
    ///
    /// Returns the owning path together with the value. Unknown paths and
    /// inheritance cycles end the search along that branch.
    pub fn lookup(&self, path: &str, bare_name: &str) -> Option<(&'a str, &'a Value)> {
        let mut visited = FxHashSet::default();
        self.lookup_inner(path, bare_name, &mut visited)
    }

    fn lookup_inner(
        &self,
        path: &str,
        bare_name: &str,
        visited: &mut FxHashSet<String>,
    ) -> Option<(&'a str, &'a Value)> {
        if !visited.insert(path.to_string()) {
            return None;
        }
        let node = self.graph.get(path)?;

        let own = node
            .attributes
            .iter()
            .find(|(key, _)| split_attribute_key(key).1 == bare_name);
        if let Some((_, value)) = own {
            return Some((node.path.as_str(), value));
        }

        node.inherit_paths()
            .find_map(|(_, base)| self.lookup_inner(base, bare_name, visited))
    }
}
