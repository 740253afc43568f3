// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFCX node representation
//!
//! An IFCX layer is a JSON document whose `data` array holds path-addressed
//! nodes. This module defines those nodes before ([`RawNode`]) and after
//! ([`MergedNode`]) layer merging, plus the small value types handed to the
//! mesh and material collaborators.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Insertion-ordered JSON object members
pub type Members = serde_json::Map<String, Value>;

/// Member name of a node's logical path
pub const PATH: &str = "path";
/// Member name of a node's inheritance map
pub const INHERITS: &str = "inherits";
/// Member name of a node's children map
pub const CHILDREN: &str = "children";
/// Member name of a node's attribute map
pub const ATTRIBUTES: &str = "attributes";
/// Separator between an attribute owner and its bare name
pub const ATTRIBUTE_SEPARATOR: &str = "::";

/// One entry of a layer's `data` array
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Logical path, unique across the merged namespace
    pub path: String,
    /// Owner prefab of the layer this entry came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Named inheritance bases (name -> path)
    #[serde(default)]
    pub inherits: Members,
    /// Named sub-objects (name -> path)
    #[serde(default)]
    pub children: Members,
    /// Namespaced attributes (`owner::name` -> value)
    #[serde(default)]
    pub attributes: Members,
}

impl RawNode {
    /// Create an empty node for a path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Build a node from one JSON entry
    ///
    /// Returns `None` for non-objects and entries without a string `path`.
    /// Non-object `inherits` / `children` / `attributes` members are treated
    /// as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let path = object.get(PATH)?.as_str()?.to_string();

        let members = |key: &str| -> Members {
            object
                .get(key)
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default()
        };

        Some(Self {
            path,
            owner: None,
            inherits: members(INHERITS),
            children: members(CHILDREN),
            attributes: members(ATTRIBUTES),
        })
    }

    /// Add an inheritance base
    pub fn with_inherit(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.inherits.insert(name.into(), Value::String(path.into()));
        self
    }

    /// Add a child
    pub fn with_child(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.children.insert(name.into(), Value::String(path.into()));
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// All raw entries sharing one path, combined member by member
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergedNode {
    /// Logical path
    pub path: String,
    /// Owner prefab of the layer that introduced the path
    pub owner: Option<String>,
    /// Named inheritance bases (name -> path)
    pub inherits: Members,
    /// Named sub-objects (name -> path)
    pub children: Members,
    /// Namespaced attributes (`owner::name` -> value)
    pub attributes: Members,
}

impl MergedNode {
    /// Iterate string-valued inheritance bases as (name, path)
    pub fn inherit_paths(&self) -> impl Iterator<Item = (&str, &str)> {
        string_members(&self.inherits)
    }

    /// Iterate string-valued children as (name, path)
    pub fn child_paths(&self) -> impl Iterator<Item = (&str, &str)> {
        string_members(&self.children)
    }

    /// Every path this node depends on: children first, then bases
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.child_paths()
            .chain(self.inherit_paths())
            .map(|(_, path)| path)
    }

    /// Check if the node owns children
    pub fn has_children(&self) -> bool {
        self.child_paths().next().is_some()
    }
}

impl From<RawNode> for MergedNode {
    fn from(raw: RawNode) -> Self {
        Self {
            path: raw.path,
            owner: raw.owner,
            inherits: raw.inherits,
            children: raw.children,
            attributes: raw.attributes,
        }
    }
}

fn string_members(members: &Members) -> impl Iterator<Item = (&str, &str)> {
    members
        .iter()
        .filter_map(|(name, value)| value.as_str().map(|path| (name.as_str(), path)))
}

/// Split an attribute key into (owner, bare name)
///
/// The split happens on the first separator; keys without one get the
/// `Unknown` owner.
pub fn split_attribute_key(key: &str) -> (&str, &str) {
    key.split_once(ATTRIBUTE_SEPARATOR)
        .unwrap_or((UNKNOWN_OWNER, key))
}

/// Owner assigned to attribute keys that carry none
pub const UNKNOWN_OWNER: &str = "Unknown";

/// Header metadata of one layer, in document order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerHeader {
    pub members: Members,
}

/// Identifier handed out by a [`MeshRegistry`](crate::MeshRegistry)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct MeshId(pub u32);

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier handed out by a [`MaterialRegistry`](crate::MaterialRegistry)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RGBA color, components in 0.0-1.0
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    /// Fully opaque white
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);

    /// Create a color from an RGB triple and an alpha
    pub fn new(rgb: [f32; 3], alpha: f32) -> Self {
        Rgba([rgb[0], rgb[1], rgb[2], alpha])
    }

    /// Alpha component
    pub fn alpha(&self) -> f32 {
        self.0[3]
    }

    /// Same color with another alpha
    pub fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Rgba([r, g, b, alpha])
    }

    /// Colors close enough to full alpha use the opaque base material
    pub fn is_opaque(&self) -> bool {
        self.alpha() > 0.99
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_node_from_value() {
        let value = json!({
            "path": "wall-1",
            "children": { "window": "win-1" },
            "inherits": { "type": "wall-type" },
            "attributes": { "bsi::ifc::class": { "code": "IfcWall" } }
        });

        let node = RawNode::from_value(&value).unwrap();
        assert_eq!(node.path, "wall-1");
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.inherits.len(), 1);
        assert!(node.attributes.contains_key("bsi::ifc::class"));
    }

    #[test]
    fn test_raw_node_rejects_pathless_entries() {
        assert!(RawNode::from_value(&json!({ "children": {} })).is_none());
        assert!(RawNode::from_value(&json!({ "path": 12 })).is_none());
        assert!(RawNode::from_value(&json!(["path"])).is_none());
    }

    #[test]
    fn test_non_string_children_are_ignored() {
        let mut merged: MergedNode = RawNode::new("a")
            .with_child("ok", "b")
            .with_attribute("x", json!(1))
            .into();
        merged.children.insert("broken".into(), json!(42));

        let children: Vec<_> = merged.child_paths().collect();
        assert_eq!(children, vec![("ok", "b")]);
        assert!(merged.has_children());
    }

    #[test]
    fn test_dependencies_children_then_bases() {
        let merged: MergedNode = RawNode::new("a")
            .with_inherit("base", "t")
            .with_child("c", "b")
            .into();
        let deps: Vec<_> = merged.dependencies().collect();
        assert_eq!(deps, vec!["b", "t"]);
    }

    #[test]
    fn test_split_attribute_key() {
        assert_eq!(
            split_attribute_key("ifc.OwnerL0::bsi::ifc::class"),
            ("ifc.OwnerL0", "bsi::ifc::class")
        );
        assert_eq!(split_attribute_key("customdata"), ("Unknown", "customdata"));
    }

    #[test]
    fn test_rgba_opacity() {
        assert!(Rgba::WHITE.is_opaque());
        assert!(!Rgba::new([0.8, 0.1, 0.1], 0.5).is_opaque());
        assert_eq!(Rgba::WHITE.with_alpha(0.0).alpha(), 0.0);
    }
}
