// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for geometry payload decoding

use thiserror::Error;

/// Geometry decoding result type
pub type Result<T> = std::result::Result<T, Error>;

/// Geometry decoding errors
///
/// The compiler treats every one of these as "nothing to emit" for the
/// attribute that carried the payload.
#[derive(Error, Debug)]
pub enum Error {
    /// Mesh payload is missing fields or has the wrong shape
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Mesh payload decoded but cannot form triangles
    #[error("Degenerate mesh: {0}")]
    DegenerateMesh(String),

    /// Transform payload is not a usable 4x4 matrix
    #[error("Invalid transform: {0}")]
    InvalidTransform(String),
}

impl Error {
    /// Create an invalid mesh error
    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Error::InvalidMesh(msg.into())
    }

    /// Create a degenerate mesh error
    pub fn degenerate_mesh(msg: impl Into<String>) -> Self {
        Error::DegenerateMesh(msg.into())
    }

    /// Create an invalid transform error
    pub fn invalid_transform(msg: impl Into<String>) -> Self {
        Error::InvalidTransform(msg.into())
    }
}
