// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-object attribute translation
//!
//! Walks one merged node's attributes in document order and turns each into
//! container lines, relationship edges, or registrations with the mesh and
//! material stores.

use super::descriptor::{
    classify_attribute, AttributeKind, ATTRIBUTE_CLASS, ATTRIBUTE_DIFFUSECOLOR,
    ATTRIBUTE_OPACITY, ATTRIBUTE_VISIBILITY,
};
use super::format::{format_float, format_members, format_value, format_vector, quote};
use super::relationship::{extract_refs, RelationshipRef};
use crate::merge::MergedGraph;
use crate::options::CompilerOptions;
use crate::preprocess::format_name;
use crate::resolve::InheritanceResolver;
use ifcx_geometry::{decode_mesh, decompose, matrix_from_value, Decomposed, XFORM_TRANSFORM};
use ifcx_model::{
    split_attribute_key, MaterialId, MaterialRegistry, MergedNode, MeshRegistry, Rgba,
};
use serde_json::Value;

/// Visibility value marking a hidden object
pub const VISIBILITY_INVISIBLE: &str = "invisible";
/// Member of an object-shaped visibility value
pub const VISIBILITY_MEMBER: &str = "visibility";
/// Member of the class attribute holding the class code
pub const CLASS_CODE: &str = "code";

/// Collaborators the translator registers resources with
pub struct TranslateContext<'r> {
    pub meshes: &'r mut dyn MeshRegistry,
    pub materials: &'r mut dyn MaterialRegistry,
}

impl<'r> TranslateContext<'r> {
    /// Bundle the two registries
    pub fn new(meshes: &'r mut dyn MeshRegistry, materials: &'r mut dyn MaterialRegistry) -> Self {
        Self { meshes, materials }
    }
}

/// Translation result for one object
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TranslatedAttributes {
    /// Attribute container body, one physical line each, without the outer indent
    pub lines: Vec<String>,
    /// Relationship edges to known paths, in document order
    pub relationships: Vec<RelationshipRef>,
}

impl TranslatedAttributes {
    /// Check if nothing was produced
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.relationships.is_empty()
    }
}

/// Attribute values an object sees on itself or through inheritance
///
/// Built once per object so handlers never rescan siblings.
#[derive(Clone, Debug, Default)]
pub struct SiblingIndex<'a> {
    /// Raw opacity value
    pub opacity: Option<&'a Value>,
    /// Class code of the object
    pub class_code: Option<&'a str>,
    /// False when the visibility attribute says invisible
    pub visible: bool,
    /// Whether a diffuse color applies to the object
    pub has_diffuse_color: bool,
}

impl<'a> SiblingIndex<'a> {
    /// Index the attributes visible from `path`
    pub fn build(resolver: &InheritanceResolver<'a>, path: &str) -> Self {
        let value = |name: &str| resolver.lookup(path, name).map(|(_, value)| value);

        let opacity = value(ATTRIBUTE_OPACITY);
        let class_code = value(ATTRIBUTE_CLASS)
            .and_then(|class| class.get(CLASS_CODE))
            .and_then(Value::as_str);
        let visible = !value(ATTRIBUTE_VISIBILITY).is_some_and(is_invisible);
        let has_diffuse_color = value(ATTRIBUTE_DIFFUSECOLOR).is_some();

        Self {
            opacity,
            class_code,
            visible,
            has_diffuse_color,
        }
    }

    /// Opacity as a literal, `1` when absent
    pub fn opacity_literal(&self) -> String {
        self.opacity
            .map(|value| format_value(value, false))
            .unwrap_or_else(|| "1".to_string())
    }

    /// Opacity as an alpha in 0.0-1.0, opaque when absent
    pub fn alpha(&self) -> f32 {
        self.opacity
            .and_then(Value::as_f64)
            .map(|alpha| alpha.clamp(0.0, 1.0) as f32)
            .unwrap_or(1.0)
    }
}

fn is_invisible(value: &Value) -> bool {
    let flag = match value {
        Value::Object(object) => object.get(VISIBILITY_MEMBER).and_then(Value::as_str),
        other => other.as_str(),
    };
    flag == Some(VISIBILITY_INVISIBLE)
}

/// Translates node attributes against one merged graph
pub struct AttributeTranslator<'a> {
    options: &'a CompilerOptions,
    graph: &'a MergedGraph,
    resolver: InheritanceResolver<'a>,
}

impl<'a> AttributeTranslator<'a> {
    /// Create a translator
    pub fn new(options: &'a CompilerOptions, graph: &'a MergedGraph) -> Self {
        Self {
            options,
            graph,
            resolver: InheritanceResolver::new(graph),
        }
    }

    /// Translate every attribute of `node`
    ///
    /// Mesh and material stores are called at most once per attribute.
    pub fn translate(&self, node: &MergedNode, ctx: &mut TranslateContext<'_>) -> TranslatedAttributes {
        let siblings = SiblingIndex::build(&self.resolver, &node.path);
        let mut out = TranslatedAttributes::default();

        for (key, value) in &node.attributes {
            let (owner, bare) = split_attribute_key(key);
            let name = format_name(bare);
            let kind = classify_attribute(bare);

            if kind == AttributeKind::Excluded {
                continue;
            }
            if value == &Value::Bool(true) {
                out.lines.push(format!("({owner}, {name})"));
                continue;
            }

            match kind {
                AttributeKind::Excluded => {}
                AttributeKind::NameOnly => out.lines.push(format!("({owner}, {name})")),
                AttributeKind::Enum => match value.as_str() {
                    Some(case) => out.lines.push(format!("({owner}, {name}): {{{case}}}")),
                    None => out.lines.push(generic_line(owner, &name, value)),
                },
                AttributeKind::Vector => match value.as_array() {
                    Some(items) => out
                        .lines
                        .push(format!("({owner}, {name}): {}", format_vector(items, None))),
                    None => out.lines.push(generic_line(owner, &name, value)),
                },
                AttributeKind::Relationship => {
                    out.lines.push(format!("({owner}, {name})"));
                    self.relationships(node, &name, value, &mut out.relationships);
                }
                AttributeKind::Mesh => self.mesh(node, value, ctx, &mut out.lines),
                AttributeKind::Transform => self.transform(node, owner, &name, value, &mut out.lines),
                AttributeKind::Material => {
                    self.diffuse_color(node, owner, &name, value, &siblings, ctx, &mut out.lines)
                }
                AttributeKind::Visibility => {
                    self.visibility(owner, &name, &siblings, ctx, &mut out.lines)
                }
                AttributeKind::Generic => out.lines.push(generic_line(owner, &name, value)),
            }
        }

        out
    }

    fn relationships(
        &self,
        node: &MergedNode,
        component: &str,
        value: &Value,
        out: &mut Vec<RelationshipRef>,
    ) {
        for edge in extract_refs(component, value) {
            if self.graph.contains(&edge.target) {
                out.push(edge);
            } else {
                log::debug!("{}: dropped {} to unknown {}", node.path, edge.kind, edge.target);
            }
        }
    }

    fn mesh(
        &self,
        node: &MergedNode,
        value: &Value,
        ctx: &mut TranslateContext<'_>,
        lines: &mut Vec<String>,
    ) {
        let payload = match decode_mesh(value) {
            Ok(payload) => payload,
            Err(err) => {
                log::debug!("{}: no mesh emitted: {}", node.path, err);
                return;
            }
        };
        match ctx.meshes.create_or_reuse(&payload.points, &payload.indices) {
            Some(id) => lines.push(format!("Mesh: {{{id}}}")),
            None => log::debug!("{}: mesh registry rejected geometry", node.path),
        }
    }

    fn transform(
        &self,
        node: &MergedNode,
        owner: &str,
        name: &str,
        value: &Value,
        lines: &mut Vec<String>,
    ) {
        let decomposed = matrix_from_value(value).and_then(|matrix| {
            decompose(&matrix, self.options.unit_scale, self.options.flip_axis)
        });
        let Decomposed {
            position,
            rotation,
            scale,
        } = match decomposed {
            Ok(decomposed) => decomposed,
            Err(err) => {
                log::debug!("{}: no transform emitted: {}", node.path, err);
                return;
            }
        };

        lines.push(format!(
            "Position: {{{{{}, {}, {}}}}}",
            number(position.x),
            number(position.y),
            number(position.z)
        ));
        lines.push(format!(
            "Rotation: {{{{{}, {}, {}}}}}",
            number(rotation.pitch),
            number(rotation.yaw),
            number(rotation.roll)
        ));
        lines.push(format!(
            "Scale: {{{{{}, {}, {}}}}}",
            number(scale.x),
            number(scale.y),
            number(scale.z)
        ));

        let raw = value.get(XFORM_TRANSFORM).unwrap_or(value).to_string();
        lines.push(format!("_ : {owner} {{"));
        lines.push("\tAttribute".to_string());
        lines.push(format!("\tName: {}", braced(&quote(name))));
        lines.push("\t_ {".to_string());
        lines.push(format!("\t\tName: {}", braced(&quote(XFORM_TRANSFORM))));
        lines.push(format!("\t\tValue: {}", braced(&quote(&raw))));
        lines.push("\t}".to_string());
        lines.push("}".to_string());
    }

    #[allow(clippy::too_many_arguments)]
    fn diffuse_color(
        &self,
        node: &MergedNode,
        owner: &str,
        name: &str,
        value: &Value,
        siblings: &SiblingIndex<'_>,
        ctx: &mut TranslateContext<'_>,
        lines: &mut Vec<String>,
    ) {
        let Some(items) = value.as_array() else {
            lines.push(generic_line(owner, name, value));
            return;
        };
        let opacity = siblings.opacity_literal();
        lines.push(format!(
            "({owner}, {name}): {}",
            format_vector(items, Some(&opacity))
        ));

        // Hidden objects get their material from the visibility attribute
        if !siblings.visible {
            return;
        }
        let Some(rgb) = rgb(items) else {
            log::debug!("{}: diffuse color is not an RGB triple", node.path);
            return;
        };
        let color = Rgba::new(rgb, siblings.alpha());
        if let Some(id) = self.material(color, siblings, ctx) {
            lines.push(format!("Material: {{{id}}}"));
        }
    }

    fn visibility(
        &self,
        owner: &str,
        name: &str,
        siblings: &SiblingIndex<'_>,
        ctx: &mut TranslateContext<'_>,
        lines: &mut Vec<String>,
    ) {
        lines.push(format!("({owner}, {name}): {{{}}}", siblings.visible));

        let color = if !siblings.visible {
            Rgba::WHITE.with_alpha(0.0)
        } else if !siblings.has_diffuse_color {
            Rgba::WHITE
        } else {
            return;
        };
        if let Some(id) = self.material(color, siblings, ctx) {
            lines.push(format!("Material: {{{id}}}"));
        }
    }

    fn material(
        &self,
        color: Rgba,
        siblings: &SiblingIndex<'_>,
        ctx: &mut TranslateContext<'_>,
    ) -> Option<MaterialId> {
        let offset = match siblings.class_code {
            Some(code) if self.options.is_offset_category(code) => self.options.coplanar_offset,
            _ => 0.0,
        };
        ctx.materials
            .create_or_reuse(color, color.is_opaque(), offset)
    }
}

fn generic_line(owner: &str, name: &str, value: &Value) -> String {
    let body = match value {
        Value::Object(object) => format_members(object),
        other => format_value(other, false),
    };
    format!("({owner}, {name}): {}", braced(&body))
}

fn braced(body: &str) -> String {
    format!("{{{body}}}")
}

fn rgb(items: &[Value]) -> Option<[f32; 3]> {
    match items {
        [r, g, b, ..] => Some([r.as_f64()? as f32, g.as_f64()? as f32, b.as_f64()? as f32]),
        _ => None,
    }
}

// Rounds off decomposition noise and negative zero
fn number(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    format_float(if rounded == 0.0 { 0.0 } else { rounded })
}
