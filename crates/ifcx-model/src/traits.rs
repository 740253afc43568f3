// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collaborator traits
//!
//! The compiler core never touches the file system, the renderer or the
//! scripting engine directly. Hosts plug those in through these traits.

use crate::{MaterialId, MeshId, Result, Rgba};

/// Reads a layer file into text
pub trait TextLoader {
    /// Load the file at `path` as UTF-8 text
    ///
    /// # Returns
    /// The file contents, or `CompileError::Io` when missing or unreadable
    fn load(&self, path: &str) -> Result<String>;
}

/// Content-deduplicating mesh store
///
/// Implementations hash the geometry and hand back the same id for identical
/// content, counting one reference per successful call.
pub trait MeshRegistry {
    /// Register triangle geometry, or reuse an identical mesh
    ///
    /// # Arguments
    /// * `points` - Vertex positions
    /// * `indices` - Triangle indices into `points`, three per triangle
    ///
    /// # Returns
    /// A stable id, or `None` when the registry rejects the geometry
    fn create_or_reuse(&mut self, points: &[[f32; 3]], indices: &[u32]) -> Option<MeshId>;

    /// Add a reference to an existing mesh
    fn retain(&mut self, id: MeshId);

    /// Drop a reference; the mesh goes away with its last reference
    fn release(&mut self, id: MeshId);
}

/// Content-deduplicating material store
pub trait MaterialRegistry {
    /// Register a material, or reuse an identical one
    ///
    /// # Arguments
    /// * `color` - Base color including alpha
    /// * `opaque` - Selects the opaque or the translucent base material
    /// * `offset` - Depth offset used to separate coplanar surfaces
    ///
    /// # Returns
    /// A stable id, or `None` when the registry rejects the request
    fn create_or_reuse(&mut self, color: Rgba, opaque: bool, offset: f32) -> Option<MaterialId>;

    /// Add a reference to an existing material
    fn retain(&mut self, id: MaterialId);

    /// Drop a reference; the material goes away with its last reference
    fn release(&mut self, id: MaterialId);
}

/// Executes generated script text in the host ECS
///
/// Script errors are the runner's business: implementations log them and
/// return normally.
pub trait ScriptRunner {
    /// Run `script`, using `label` to identify it in diagnostics
    fn run(&mut self, label: &str, script: &str);
}
