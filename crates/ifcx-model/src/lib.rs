// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFCX Model - Shared types and collaborator traits for the IFCX compiler
//!
//! This crate holds the vocabulary shared by the compiler core and its hosts:
//! the node types read from IFCX layers, the ids handed out by mesh and
//! material stores, and the traits through which the compiler reaches the
//! outside world.
//!
//! # Architecture
//!
//! - [`RawNode`] / [`MergedNode`] - path-addressed nodes before and after layer merging
//! - [`TextLoader`] - reads layer files
//! - [`MeshRegistry`] / [`MaterialRegistry`] - content-deduplicating render resource stores
//! - [`ScriptRunner`] - executes the generated ECS script
//!
//! # Example
//!
//! ```ignore
//! use ifcx_model::{RawNode, MergedNode};
//! use serde_json::json;
//!
//! let node = RawNode::from_value(&json!({ "path": "wall-1" })).unwrap();
//! let merged = MergedNode::from(node);
//! assert!(!merged.has_children());
//! ```

pub mod error;
pub mod traits;
pub mod types;

// Re-export all public types
pub use error::*;
pub use traits::*;
pub use types::*;
