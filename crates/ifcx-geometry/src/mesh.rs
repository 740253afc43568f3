// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! USD mesh payload decoding
//!
//! A `usd::usdgeom::mesh` attribute carries `faceVertexIndices` (flat
//! triangle indices) and `points` (xyz triples).

use crate::{Error, Result};
use rustc_hash::FxHasher;
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// Member holding triangle indices
pub const MESH_INDICES: &str = "faceVertexIndices";
/// Member holding vertex positions
pub const MESH_POINTS: &str = "points";

/// Triangle geometry decoded from a mesh attribute
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshPayload {
    /// Vertex positions
    pub points: Vec<[f32; 3]>,
    /// Triangle indices, three per triangle
    pub indices: Vec<u32>,
}

impl MeshPayload {
    /// Decode a mesh attribute value
    ///
    /// Index entries that are not non-negative integers and points that are
    /// not numeric triples are skipped, the rest of the payload is kept.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::invalid_mesh("mesh value is not an object"))?;

        let indices = object
            .get(MESH_INDICES)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::invalid_mesh(format!("missing {MESH_INDICES}")))?;
        let points = object
            .get(MESH_POINTS)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::invalid_mesh(format!("missing {MESH_POINTS}")))?;

        let indices = indices
            .iter()
            .filter_map(Value::as_u64)
            .filter_map(|index| u32::try_from(index).ok())
            .collect();

        let points = points.iter().filter_map(parse_point).collect();

        Ok(Self { points, indices })
    }

    /// Check that the payload can form triangles
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(Error::degenerate_mesh("no points"));
        }
        if self.indices.is_empty() || self.indices.len() % 3 != 0 {
            return Err(Error::degenerate_mesh(format!(
                "{} indices is not a whole number of triangles",
                self.indices.len()
            )));
        }
        let vertex_count = self.points.len();
        if let Some(index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::degenerate_mesh(format!(
                "index {index} out of range for {vertex_count} points"
            )));
        }
        Ok(())
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Hash of the geometry, used for deduplication
    pub fn content_hash(&self) -> u64 {
        content_hash(&self.points, &self.indices)
    }
}

/// Decode and validate a mesh attribute in one step
pub fn decode_mesh(value: &Value) -> Result<MeshPayload> {
    let payload = MeshPayload::from_value(value)?;
    payload.validate()?;
    Ok(payload)
}

/// Hash raw mesh content
pub fn content_hash(points: &[[f32; 3]], indices: &[u32]) -> u64 {
    let mut hasher = FxHasher::default();

    points.len().hash(&mut hasher);
    indices.len().hash(&mut hasher);
    for point in points {
        for coord in point {
            coord.to_bits().hash(&mut hasher);
        }
    }
    indices.hash(&mut hasher);

    hasher.finish()
}

fn parse_point(value: &Value) -> Option<[f32; 3]> {
    match value.as_array()?.as_slice() {
        [x, y, z] => Some([
            x.as_f64()? as f32,
            y.as_f64()? as f32,
            z.as_f64()? as f32,
        ]),
        _ => None,
    }
}
