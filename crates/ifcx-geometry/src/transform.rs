// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transform decomposition for `usd::xformop` payloads
//!
//! The payload is a row-major 4x4 matrix in row-vector convention
//! (translation in the last row). Decomposition yields position, rotation
//! and scale in the host's units and handedness.

use crate::{Error, Result};
use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Member holding the matrix rows
pub const XFORM_TRANSFORM: &str = "transform";

/// Scales smaller than this are treated as collapsed
const MIN_SCALE: f64 = 1e-12;

/// Coordinate axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Euler rotation in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotator {
    /// Rotation about Y
    pub pitch: f64,
    /// Rotation about Z
    pub yaw: f64,
    /// Rotation about X
    pub roll: f64,
}

/// Decomposed transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decomposed {
    pub position: Vector3<f64>,
    pub rotation: Rotator,
    pub scale: Vector3<f64>,
}

impl Default for Decomposed {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Rotator::default(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Read the matrix out of an xformop attribute value
///
/// Accepts either the xformop object (`{"transform": [[..] x4]}`) or the
/// bare row array.
pub fn matrix_from_value(value: &Value) -> Result<Matrix4<f64>> {
    let rows = match value {
        Value::Object(object) => object
            .get(XFORM_TRANSFORM)
            .ok_or_else(|| Error::invalid_transform(format!("missing {XFORM_TRANSFORM}")))?,
        other => other,
    };

    let rows = rows
        .as_array()
        .filter(|rows| rows.len() == 4)
        .ok_or_else(|| Error::invalid_transform("expected 4 rows"))?;

    let mut flat = [0.0f64; 16];
    for (row_index, row) in rows.iter().enumerate() {
        let row = row
            .as_array()
            .filter(|row| row.len() == 4)
            .ok_or_else(|| Error::invalid_transform(format!("row {row_index} is not 4 numbers")))?;
        for (column_index, cell) in row.iter().enumerate() {
            flat[row_index * 4 + column_index] = cell.as_f64().ok_or_else(|| {
                Error::invalid_transform(format!("[{row_index}][{column_index}] is not a number"))
            })?;
        }
    }

    Ok(Matrix4::from_row_slice(&flat))
}

/// Split a row-vector matrix into position, rotation and scale
///
/// # Arguments
/// * `matrix` - Row-major matrix as read by [`matrix_from_value`]
/// * `unit_scale` - Factor applied to the translation (e.g. 100 for m -> cm)
/// * `flip` - Axis mirrored to change handedness
pub fn decompose(matrix: &Matrix4<f64>, unit_scale: f64, flip: Axis) -> Result<Decomposed> {
    // Column-vector form: translation ends up in the last column
    let columns = matrix.transpose();
    let translation = Vector3::new(columns[(0, 3)], columns[(1, 3)], columns[(2, 3)]);
    let mut linear: Matrix3<f64> = columns.fixed_view::<3, 3>(0, 0).into_owned();

    let mut scale = Vector3::new(
        linear.column(0).norm(),
        linear.column(1).norm(),
        linear.column(2).norm(),
    );
    if scale.iter().any(|s| *s < MIN_SCALE || !s.is_finite()) {
        return Err(Error::invalid_transform("collapsed or non-finite scale"));
    }

    if linear.determinant() < 0.0 {
        scale.x = -scale.x;
    }
    for i in 0..3 {
        let s = scale[i];
        linear.column_mut(i).unscale_mut(s);
    }

    let mirror = Matrix3::from_diagonal(&mirror_diagonal(flip));
    let rotation = Rotation3::from_matrix(&(mirror * linear * mirror));
    let position = mirror * translation * unit_scale;

    let (roll, pitch, yaw) = rotation.euler_angles();

    Ok(Decomposed {
        position,
        rotation: Rotator {
            pitch: pitch.to_degrees(),
            yaw: yaw.to_degrees(),
            roll: roll.to_degrees(),
        },
        scale,
    })
}

fn mirror_diagonal(flip: Axis) -> Vector3<f64> {
    let mut diagonal = Vector3::new(1.0, 1.0, 1.0);
    diagonal[flip.index()] = -1.0;
    diagonal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn xform(rows: Value) -> Value {
        json!({ "transform": rows })
    }

    #[test]
    fn test_identity() {
        let value = xform(json!([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]));
        let matrix = matrix_from_value(&value).unwrap();
        let d = decompose(&matrix, 100.0, Axis::Y).unwrap();

        assert_relative_eq!(d.position.norm(), 0.0);
        assert_relative_eq!(d.scale, Vector3::new(1.0, 1.0, 1.0), epsilon = 1e-9);
        assert_relative_eq!(d.rotation.yaw, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_translation_scaled_and_flipped() {
        let value = xform(json!([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [1.0, 2.0, 3.0, 1]]));
        let matrix = matrix_from_value(&value).unwrap();
        let d = decompose(&matrix, 100.0, Axis::Y).unwrap();

        assert_relative_eq!(d.position, Vector3::new(100.0, -200.0, 300.0), epsilon = 1e-9);
    }

    #[test]
    fn test_scale_extracted() {
        let value = xform(json!([[2, 0, 0, 0], [0, 3, 0, 0], [0, 0, 4, 0], [0, 0, 0, 1]]));
        let matrix = matrix_from_value(&value).unwrap();
        let d = decompose(&matrix, 1.0, Axis::Y).unwrap();

        assert_relative_eq!(d.scale, Vector3::new(2.0, 3.0, 4.0), epsilon = 1e-9);
    }

    #[test]
    fn test_yaw_mirrors_with_handedness() {
        // +90 degrees about Z, row-vector convention
        let value = xform(json!([[0, 1, 0, 0], [-1, 0, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]));
        let matrix = matrix_from_value(&value).unwrap();

        let d = decompose(&matrix, 1.0, Axis::Y).unwrap();
        assert_relative_eq!(d.rotation.yaw, -90.0, epsilon = 1e-6);
        assert_relative_eq!(d.rotation.pitch, 0.0, epsilon = 1e-6);
        assert_relative_eq!(d.rotation.roll, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bare_row_array_accepted() {
        let rows = json!([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]);
        assert!(matrix_from_value(&rows).is_ok());
    }

    #[test]
    fn test_malformed_matrix_rejected() {
        assert!(matrix_from_value(&xform(json!([[1, 0, 0, 0]]))).is_err());
        assert!(matrix_from_value(&xform(json!([[1, 0, 0], [0, 1, 0], [0, 0, 1], [0, 0, 0]]))).is_err());
        assert!(matrix_from_value(&json!({ "other": [] })).is_err());
    }

    #[test]
    fn test_collapsed_scale_rejected() {
        let value = xform(json!([[0, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]]));
        let matrix = matrix_from_value(&value).unwrap();
        assert!(decompose(&matrix, 1.0, Axis::Y).is_err());
    }
}
