// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFCX Compiler - IFCX layers to ECS entity/prefab scripts
//!
//! This crate turns one or more IFCX layer documents into a single script
//! for an entity-component-system scripting layer. It reaches files,
//! render resources and the script engine only through the traits in
//! `ifcx-model`.
//!
//! # Pipeline
//!
//! 1. **Preprocess** - hyphenated UUIDs become `ID...` identifiers
//! 2. **Parse** - `header` / `data` checks, owner injection per layer
//! 3. **Merge** - entries sharing a path are overlaid member by member
//! 4. **Sort** - dependencies (children, bases) before dependents
//! 5. **Classify** - standalone roots versus referenced fragments
//! 6. **Translate** - attributes to components, meshes, materials, relationships
//! 7. **Emit** - layer entities, object blocks, relationship section
//!
//! # Example
//!
//! ```ignore
//! use ifcx_compiler::{FsLoader, IfcxCompiler, WriterRunner};
//! use ifcx_geometry::{MaterialCache, MeshCache};
//!
//! let compiler = IfcxCompiler::new();
//! let compilation = compiler.load(
//!     &FsLoader::new(),
//!     &["hello-wall.ifcx".to_string()],
//!     &mut MeshCache::new(),
//!     &mut MaterialCache::new(),
//! );
//!
//! let mut runner = WriterRunner::new(std::io::stdout());
//! compiler.run(&compilation, &mut runner);
//! ```

pub mod attributes;
pub mod classify;
mod compiler;
pub mod emitter;
mod io;
pub mod layer;
pub mod merge;
pub mod options;
pub mod preprocess;
pub mod resolve;
pub mod sort;

pub use classify::{Classification, NodeKind};
pub use compiler::{Compilation, Diagnostics, IfcxCompiler, LayerSummary, SkippedLayer};
pub use emitter::{EmittedScript, ScriptEmitter};
pub use io::{FsLoader, WriterRunner};
pub use layer::{emit_layer, inject_owner, parse_layer, LayerSource, ParsedLayer};
pub use merge::{merge, MergedGraph};
pub use options::{CompilerOptions, RelationshipMode};
pub use preprocess::{clean_name, format_name, normalize_uuids};
pub use resolve::InheritanceResolver;
pub use sort::{topological_sort, SortOutcome};

pub use ifcx_model::{CompileError, Result};
