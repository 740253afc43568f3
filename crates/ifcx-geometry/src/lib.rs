// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFCX Geometry Payloads
//!
//! Decoding of the geometric attribute payloads found in IFCX layers, plus
//! in-memory render resource stores.
//!
//! ## Overview
//!
//! - **Mesh Decoding**: `usd::usdgeom::mesh` values into validated triangle data
//! - **Transform Decomposition**: `usd::xformop` matrices into position, rotation and scale,
//!   converted to the host's units and handedness
//! - **Caches**: [`MeshCache`] and [`MaterialCache`], content-hashed and ref-counted
//!   implementations of the `ifcx-model` registry traits
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifcx_geometry::{decompose, matrix_from_value, Axis};
//! use serde_json::json;
//!
//! let value = json!({ "transform": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[2,0,0,1]] });
//! let matrix = matrix_from_value(&value)?;
//! let parts = decompose(&matrix, 100.0, Axis::Y)?;
//!
//! assert_eq!(parts.position.x, 200.0);
//! ```

pub mod error;
pub mod mesh;
pub mod registry;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Vector3};

// Re-export main types
pub use error::{Error, Result};
pub use mesh::{content_hash, decode_mesh, MeshPayload};
pub use registry::{CacheStats, MaterialCache, MaterialEntry, MeshCache};
pub use transform::{decompose, matrix_from_value, Axis, Decomposed, Rotator, XFORM_TRANSFORM};
