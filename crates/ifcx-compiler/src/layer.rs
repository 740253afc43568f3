// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer parsing and owner injection
//!
//! Each layer file becomes a [`ParsedLayer`]: its header, a stable layer id,
//! the path of the owner prefab standing for the layer, and its data entries
//! stamped with that owner.

use crate::attributes::format_value;
use crate::options::CompilerOptions;
use crate::preprocess::{format_name, normalize_uuids};
use ifcx_model::{CompileError, LayerHeader, RawNode, Result, ATTRIBUTE_SEPARATOR};
use serde_json::Value;
use std::fmt::Write;
use std::path::Path;

/// Top-level member holding layer metadata
pub const HEADER: &str = "header";
/// Top-level member holding the node entries
pub const DATA: &str = "data";

/// One layer's raw text, as produced by a [`TextLoader`](ifcx_model::TextLoader)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerSource {
    /// File path, used for ids and diagnostics
    pub path: String,
    /// UTF-8 file contents
    pub text: String,
}

impl LayerSource {
    /// Create a source from a path and its contents
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// A layer that passed parsing and structural checks
#[derive(Clone, Debug)]
pub struct ParsedLayer {
    /// File path the layer came from
    pub source_path: String,
    /// `L{index}_{stem}`
    pub layer_id: String,
    /// Scoped path of the Layer entity
    pub entity_path: String,
    /// Scoped path of the owner prefab
    pub owner_path: String,
    /// Header members in document order
    pub header: LayerHeader,
    /// Owner-stamped entries, in document order
    pub nodes: Vec<RawNode>,
    /// Entries dropped for lacking an object shape or a string path
    pub skipped_entries: usize,
}

/// Derive the id of the layer loaded at `index` from `path`
pub fn layer_id(index: usize, path: &str) -> String {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("layer");
    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("L{index}_{stem}")
}

/// Owner prefab path for a layer entity path (`Owner` after the last `.`)
pub fn owner_path(entity_path: &str) -> String {
    match entity_path.rsplit_once('.') {
        Some((scope, name)) => format!("{scope}.Owner{name}"),
        None => format!("Owner{entity_path}"),
    }
}

/// Parse one layer
///
/// # Arguments
/// * `source` - Raw layer text and its path
/// * `index` - Load position of the layer within the batch
/// * `options` - Supplies the scope used for entity paths
///
/// # Returns
/// The parsed layer, or a fatal-to-file error (bad JSON, missing `header`
/// object, missing `data` array)
pub fn parse_layer(
    source: &LayerSource,
    index: usize,
    options: &CompilerOptions,
) -> Result<ParsedLayer> {
    let text = normalize_uuids(&source.text);
    let document: Value =
        serde_json::from_str(&text).map_err(|err| CompileError::json(&source.path, &err))?;

    let header = document
        .get(HEADER)
        .and_then(Value::as_object)
        .ok_or_else(|| CompileError::missing_section(&source.path, HEADER))?;
    let data = document
        .get(DATA)
        .and_then(Value::as_array)
        .ok_or_else(|| CompileError::missing_section(&source.path, DATA))?;

    let layer_id = layer_id(index, &source.path);
    let entity_path = options.scoped(&layer_id);
    let owner_path = owner_path(&entity_path);

    let mut nodes = Vec::with_capacity(data.len());
    let mut skipped_entries = 0;
    for entry in data {
        match RawNode::from_value(entry) {
            Some(node) => nodes.push(inject_owner(node, &owner_path)),
            None => skipped_entries += 1,
        }
    }

    log::debug!(
        "Layer {} ({}): {} entries, {} skipped",
        layer_id,
        source.path,
        nodes.len(),
        skipped_entries
    );

    Ok(ParsedLayer {
        source_path: source.path.clone(),
        layer_id,
        entity_path,
        owner_path,
        header: LayerHeader {
            members: header.clone(),
        },
        nodes,
        skipped_entries,
    })
}

/// Stamp a node with its layer owner
///
/// Sets `owner` and rewrites every attribute key `k` to `{owner}::{k}`,
/// keeping member order.
pub fn inject_owner(mut node: RawNode, owner: &str) -> RawNode {
    node.attributes = std::mem::take(&mut node.attributes)
        .into_iter()
        .map(|(key, value)| (format!("{owner}{ATTRIBUTE_SEPARATOR}{key}"), value))
        .collect();
    node.owner = Some(owner.to_string());
    node
}

/// Script text for a layer's Layer entity and owner prefab
pub fn emit_layer(layer: &ParsedLayer) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} {{", layer.entity_path);
    out.push_str("\tLayer\n");
    let _ = writeln!(
        out,
        "\tPath: {{{}}}",
        format_value(&Value::String(layer.source_path.clone()), false)
    );
    for (key, value) in &layer.header.members {
        let _ = writeln!(
            out,
            "\t{}: {{{}}}",
            format_name(&capitalize(key)),
            format_value(value, false)
        );
    }
    out.push_str("}\n");

    let _ = writeln!(out, "prefab {} {{", layer.owner_path);
    let _ = writeln!(out, "\tOwner: {{\"{}\"}}", layer.entity_path);
    out.push_str("}\n");

    out
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
