// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compiler entry point

use crate::attributes::TranslateContext;
use crate::classify::Classification;
use crate::emitter::ScriptEmitter;
use crate::layer::{parse_layer, LayerSource, ParsedLayer};
use crate::merge::merge;
use crate::options::CompilerOptions;
use crate::sort::topological_sort;
use ifcx_model::{CompileError, MaterialRegistry, MeshRegistry, ScriptRunner, TextLoader};
use rustc_hash::FxHashSet;

/// A layer that contributed nothing, and why
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedLayer {
    pub path: String,
    pub error: String,
}

/// A layer that made it into the script
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerSummary {
    pub path: String,
    pub layer_id: String,
    /// Entries taken from the `data` array
    pub entries: usize,
    /// Entries dropped for lacking a path
    pub skipped_entries: usize,
}

/// Everything that went wrong or was worked around during a compile
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub skipped_layers: Vec<SkippedLayer>,
    /// Paths released early to break dependency cycles
    pub broken_cycles: Vec<String>,
    pub merged_nodes: usize,
    pub relationship_statements: usize,
}

/// Output of one compile
#[derive(Clone, Debug, Default)]
pub struct Compilation {
    /// Generated script text
    pub script: String,
    /// Layers that were compiled, in load order
    pub layers: Vec<LayerSummary>,
    pub diagnostics: Diagnostics,
}

impl Compilation {
    /// Label used when running the script: layer ids joined by ` | `
    pub fn label(&self) -> String {
        self.layers
            .iter()
            .map(|layer| layer.layer_id.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// IFCX to ECS script compiler
///
/// # Example
///
/// ```ignore
/// use ifcx_compiler::{IfcxCompiler, LayerSource};
/// use ifcx_geometry::{MaterialCache, MeshCache};
///
/// let compiler = IfcxCompiler::new();
/// let sources = vec![LayerSource::new("hello-wall.ifcx", text)];
/// let compilation = compiler.compile(&sources, &mut MeshCache::new(), &mut MaterialCache::new());
/// println!("{}", compilation.script);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IfcxCompiler {
    options: CompilerOptions,
}

impl IfcxCompiler {
    /// Create a compiler with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with custom options
    pub fn with_options(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Get the options
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile in-memory layers
    ///
    /// Layers that fail to parse are skipped and reported in the
    /// diagnostics; the rest are compiled as usual.
    pub fn compile(
        &self,
        sources: &[LayerSource],
        meshes: &mut dyn MeshRegistry,
        materials: &mut dyn MaterialRegistry,
    ) -> Compilation {
        self.compile_with(sources, Vec::new(), meshes, materials)
    }

    /// Load layers through `loader`, then compile them
    ///
    /// Unreadable files are skipped like unparsable ones.
    pub fn load(
        &self,
        loader: &dyn TextLoader,
        paths: &[String],
        meshes: &mut dyn MeshRegistry,
        materials: &mut dyn MaterialRegistry,
    ) -> Compilation {
        let mut sources = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for path in unique(paths.iter().map(String::as_str)) {
            match loader.load(path) {
                Ok(text) => sources.push(LayerSource::new(path, text)),
                Err(err) => skipped.push(skip(path, &err)),
            }
        }

        self.compile_with(&sources, skipped, meshes, materials)
    }

    /// Hand a compiled script to `runner`
    pub fn run(&self, compilation: &Compilation, runner: &mut dyn ScriptRunner) {
        runner.run(&compilation.label(), &compilation.script);
    }

    fn compile_with(
        &self,
        sources: &[LayerSource],
        mut skipped: Vec<SkippedLayer>,
        meshes: &mut dyn MeshRegistry,
        materials: &mut dyn MaterialRegistry,
    ) -> Compilation {
        let mut layers: Vec<ParsedLayer> = Vec::with_capacity(sources.len());
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        for source in sources {
            if !seen.insert(source.path.as_str()) {
                log::warn!("Layer {} listed more than once, loading it once", source.path);
                continue;
            }
            match parse_layer(source, layers.len(), &self.options) {
                Ok(layer) => layers.push(layer),
                Err(err) => skipped.push(skip(&source.path, &err)),
            }
        }

        let summaries = layers
            .iter()
            .map(|layer| LayerSummary {
                path: layer.source_path.clone(),
                layer_id: layer.layer_id.clone(),
                entries: layer.nodes.len(),
                skipped_entries: layer.skipped_entries,
            })
            .collect();

        let nodes = layers.iter().flat_map(|layer| layer.nodes.iter().cloned());
        let graph = merge(nodes);
        let sorted = topological_sort(&graph);
        let classes = Classification::from_nodes(&graph);
        if let Some(root) = classes.main_root() {
            log::debug!("Main root: {}", root);
        }

        let mut ctx = TranslateContext::new(meshes, materials);
        let emitted =
            ScriptEmitter::new(&self.options, &graph, &classes).emit(&layers, &sorted.order, &mut ctx);

        Compilation {
            script: emitted.text,
            layers: summaries,
            diagnostics: Diagnostics {
                skipped_layers: skipped,
                broken_cycles: sorted.broken_cycles,
                merged_nodes: graph.len(),
                relationship_statements: emitted.relationship_statements,
            },
        }
    }
}

fn unique<'p>(paths: impl Iterator<Item = &'p str>) -> Vec<&'p str> {
    let mut seen = FxHashSet::default();
    paths
        .filter(|path| {
            let first = seen.insert(*path);
            if !first {
                log::warn!("Layer {} listed more than once, loading it once", path);
            }
            first
        })
        .collect()
}

fn skip(path: &str, err: &CompileError) -> SkippedLayer {
    match err {
        CompileError::MissingSection { .. } => log::warn!("Skipping layer: {}", err),
        _ => log::error!("Skipping layer {}: {}", path, err),
    }
    SkippedLayer {
        path: path.to_string(),
        error: err.to_string(),
    }
}
