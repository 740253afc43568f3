// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Script assembly
//!
//! Emits, in order: the `using` line, Layer/Owner entities, then for each
//! node in sorted order its attribute container followed by its object
//! block, and finally the relationship section.

use crate::attributes::{AttributeTranslator, RelationshipRef, TranslateContext, TranslatedAttributes};
use crate::classify::{Classification, NodeKind};
use crate::layer::{emit_layer, ParsedLayer};
use crate::merge::MergedGraph;
use crate::options::{CompilerOptions, RelationshipMode};
use crate::preprocess::{clean_name, format_name};
use ifcx_model::MergedNode;
use std::fmt::Write;

/// Keyword declaring a template entity
pub const PREFAB: &str = "prefab ";
/// Marker carried by every object
pub const IFC_OBJECT: &str = "IfcObject";
/// Marker carried by standalone roots
pub const HIERARCHY: &str = "Hierarchy";
/// Trait keeping child order
pub const ORDERED_CHILDREN: &str = "OrderedChildren";
/// Marker of attribute container entities
pub const ATTRIBUTE_CONTAINER: &str = "AttributeContainer";
/// Header of the relationship section
pub const RELATIONSHIPS_HEADER: &str = "// relationships";

/// Assembled script and what went into it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmittedScript {
    pub text: String,
    /// Object blocks written
    pub blocks: usize,
    /// Relationship pairs written
    pub relationship_statements: usize,
}

/// Writes the script for one merged graph
pub struct ScriptEmitter<'a> {
    options: &'a CompilerOptions,
    graph: &'a MergedGraph,
    classes: &'a Classification,
}

impl<'a> ScriptEmitter<'a> {
    /// Create an emitter
    pub fn new(
        options: &'a CompilerOptions,
        graph: &'a MergedGraph,
        classes: &'a Classification,
    ) -> Self {
        Self {
            options,
            graph,
            classes,
        }
    }

    /// Emit the whole script
    ///
    /// # Arguments
    /// * `layers` - Loaded layers, for Layer/Owner entities
    /// * `order` - Discovery indices in dependency order
    /// * `ctx` - Mesh and material stores used while translating
    pub fn emit(
        &self,
        layers: &[ParsedLayer],
        order: &[usize],
        ctx: &mut TranslateContext<'_>,
    ) -> EmittedScript {
        let translator = AttributeTranslator::new(self.options, self.graph);
        let mut script = EmittedScript::default();
        let mut side_table: Vec<(usize, &MergedNode, Vec<RelationshipRef>)> = Vec::new();

        if !self.options.scope.is_empty() {
            let _ = writeln!(script.text, "using {}", self.options.scope);
            script.text.push('\n');
        }

        if self.options.emit_layers && !layers.is_empty() {
            for layer in layers {
                script.text.push_str(&emit_layer(layer));
            }
            script.text.push('\n');
        }

        for &index in order {
            let Some(node) = self.graph.nodes().get(index) else {
                continue;
            };
            let translated = translator.translate(node, ctx);
            script.relationship_statements += translated.relationships.len();

            script.text.push_str(&self.object_text(node, &translated));
            script.blocks += 1;

            if self.options.relationship_mode == RelationshipMode::Split
                && !translated.relationships.is_empty()
            {
                side_table.push((index, node, translated.relationships));
            }
        }

        if !side_table.is_empty() {
            // Side table follows discovery order, not dependency order
            side_table.sort_by_key(|(index, _, _)| *index);
            script.text.push('\n');
            script.text.push_str(RELATIONSHIPS_HEADER);
            script.text.push('\n');
            for (_, node, relationships) in &side_table {
                let _ = writeln!(script.text, "{} {{", self.relationships_path(&node.path));
                for edge in relationships {
                    let _ = writeln!(script.text, "\t({}, {})", edge.kind, edge.target);
                }
                script.text.push_str("}\n");
            }
        }

        log::debug!(
            "Emitted {} blocks, {} relationship statements",
            script.blocks,
            script.relationship_statements
        );
        script
    }

    /// Attribute container (when non-empty) and object block for one node
    pub fn object_text(&self, node: &MergedNode, translated: &TranslatedAttributes) -> String {
        let mut out = String::new();
        let is_fragment = self.classes.kind(&node.path) == NodeKind::Fragment;
        let has_container = !translated.lines.is_empty();

        if has_container {
            let _ = writeln!(out, "{} {{", self.attributes_path(&node.path));
            let _ = writeln!(out, "\t{ATTRIBUTE_CONTAINER}");
            for line in &translated.lines {
                let _ = writeln!(out, "\t{line}");
            }
            out.push_str("}\n");
        }

        let mut bases: Vec<&str> = Vec::new();
        if !is_fragment {
            if let Some(owner) = node.owner.as_deref() {
                bases.push(owner);
            }
        }
        for (_, base) in node.inherit_paths() {
            if self.graph.contains(base) && base != node.path {
                bases.push(base);
            } else {
                log::debug!("{}: dropped base {}", node.path, base);
            }
        }

        let _ = write!(
            out,
            "{}{}",
            if is_fragment { PREFAB } else { "" },
            self.options.scoped(&node.path)
        );
        if !bases.is_empty() {
            let _ = write!(out, ": {}", bases.join(", "));
        }
        out.push_str(" {\n");

        let _ = writeln!(out, "\t{IFC_OBJECT}");
        if !is_fragment {
            let _ = writeln!(out, "\t{HIERARCHY}");
        }
        if node.child_paths().any(|(_, child)| self.graph.contains(child)) {
            let _ = writeln!(out, "\t{ORDERED_CHILDREN}");
        }
        if has_container {
            let _ = writeln!(out, "\t(Attributes, {})", self.attributes_path(&node.path));
        }
        if !translated.relationships.is_empty() {
            match self.options.relationship_mode {
                RelationshipMode::Split => {
                    let _ = writeln!(
                        out,
                        "\t(Relationships, {})",
                        self.relationships_path(&node.path)
                    );
                }
                RelationshipMode::Inline => {
                    for edge in &translated.relationships {
                        let _ = writeln!(out, "\t({}, {})", edge.kind, edge.target);
                    }
                }
            }
        }
        self.write_children(&mut out, node, is_fragment);
        out.push_str("}\n");

        out
    }

    fn write_children(&self, out: &mut String, node: &MergedNode, is_fragment: bool) {
        for (name, child) in node.child_paths() {
            if !self.graph.contains(child) {
                log::debug!("{}: dropped child {} -> {}", node.path, name, child);
                continue;
            }
            let name = format_name(name);
            let _ = write!(
                out,
                "\t{}{}: {}",
                if is_fragment { PREFAB } else { "" },
                name,
                child
            );
            if let Some(owner) = node.owner.as_deref() {
                let _ = write!(out, ", {owner}");
            }
            let _ = writeln!(out, " {{Name: {{\"{}\"}}}}", clean_name(&name));
        }
    }

    fn attributes_path(&self, path: &str) -> String {
        self.options.scoped(&format!("attributes.{path}"))
    }

    fn relationships_path(&self, path: &str) -> String {
        self.options.scoped(&format!("relationships.{path}"))
    }
}
