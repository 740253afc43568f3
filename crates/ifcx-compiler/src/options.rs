// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compiler configuration

use ifcx_geometry::Axis;
use ifcx_model::{CompileError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where relationship statements end up in the script
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipMode {
    /// Trailing `// relationships` section, one entity per object
    #[default]
    Split,
    /// Pairs inside the owning object's block
    Inline,
}

/// Settings for one [`IfcxCompiler`](crate::IfcxCompiler)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Script namespace; empty means unscoped
    pub scope: String,
    /// Source to target length factor applied to translations
    pub unit_scale: f64,
    /// Axis mirrored to convert handedness
    pub flip_axis: Axis,
    /// Depth offset for materials of `offset_categories`
    pub coplanar_offset: f32,
    /// Class codes whose materials receive `coplanar_offset`
    pub offset_categories: Vec<String>,
    /// Placement of relationship statements
    pub relationship_mode: RelationshipMode,
    /// Emit Layer and Owner entities for each loaded layer
    pub emit_layers: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            scope: "ifc".to_string(),
            unit_scale: 100.0,
            flip_axis: Axis::Y,
            coplanar_offset: -0.5,
            offset_categories: vec!["IfcSpace".to_string()],
            relationship_mode: RelationshipMode::Split,
            emit_layers: true,
        }
    }
}

impl CompilerOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing members keep their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| CompileError::json("<options>", &err))
    }

    /// Load options from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| CompileError::io(path.display().to_string(), err))?;
        serde_json::from_str(&text)
            .map_err(|err| CompileError::json(path.display().to_string(), &err))
    }

    /// Set the script namespace
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Set the length factor
    pub fn with_unit_scale(mut self, unit_scale: f64) -> Self {
        self.unit_scale = unit_scale;
        self
    }

    /// Set the handedness flip axis
    pub fn with_flip_axis(mut self, axis: Axis) -> Self {
        self.flip_axis = axis;
        self
    }

    /// Set the coplanar depth offset
    pub fn with_coplanar_offset(mut self, offset: f32) -> Self {
        self.coplanar_offset = offset;
        self
    }

    /// Replace the offset categories
    pub fn with_offset_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.offset_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set where relationship statements are emitted
    pub fn with_relationship_mode(mut self, mode: RelationshipMode) -> Self {
        self.relationship_mode = mode;
        self
    }

    /// Set whether layer entities are emitted
    pub fn with_layers(mut self, enabled: bool) -> Self {
        self.emit_layers = enabled;
        self
    }

    /// Prefix `name` with the scope
    pub fn scoped(&self, name: &str) -> String {
        if self.scope.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.scope, name)
        }
    }

    /// Check if a class code receives the coplanar offset
    pub fn is_offset_category(&self, code: &str) -> bool {
        self.offset_categories.iter().any(|category| category == code)
    }
}
