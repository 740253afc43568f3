// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end compiles through the public API

use ifcx_compiler::{
    merge, normalize_uuids, topological_sort, Classification, CompilerOptions, IfcxCompiler,
    LayerSource, NodeKind, RelationshipMode,
};
use ifcx_geometry::{MaterialCache, MeshCache};
use ifcx_model::{MaterialId, MaterialRegistry, MeshId, MeshRegistry, RawNode, Rgba, ScriptRunner};

/// Mesh registry counting registrations
#[derive(Default)]
struct CountingMeshes {
    created: Vec<usize>,
}

impl MeshRegistry for CountingMeshes {
    fn create_or_reuse(&mut self, _points: &[[f32; 3]], indices: &[u32]) -> Option<MeshId> {
        self.created.push(indices.len());
        Some(MeshId(self.created.len() as u32))
    }

    fn retain(&mut self, _id: MeshId) {}

    fn release(&mut self, _id: MeshId) {}
}

/// Material registry recording requests
#[derive(Default)]
struct RecordingMaterials {
    requests: Vec<(Rgba, bool, f32)>,
}

impl MaterialRegistry for RecordingMaterials {
    fn create_or_reuse(&mut self, color: Rgba, opaque: bool, offset: f32) -> Option<MaterialId> {
        self.requests.push((color, opaque, offset));
        Some(MaterialId(self.requests.len() as u32))
    }

    fn retain(&mut self, _id: MaterialId) {}

    fn release(&mut self, _id: MaterialId) {}
}

#[derive(Default)]
struct RecordingRunner {
    runs: Vec<(String, String)>,
}

impl ScriptRunner for RecordingRunner {
    fn run(&mut self, label: &str, script: &str) {
        self.runs.push((label.to_string(), script.to_string()));
    }
}

fn compile(sources: &[LayerSource]) -> (String, CountingMeshes, RecordingMaterials) {
    compile_with(CompilerOptions::default(), sources)
}

fn compile_with(
    options: CompilerOptions,
    sources: &[LayerSource],
) -> (String, CountingMeshes, RecordingMaterials) {
    let mut meshes = CountingMeshes::default();
    let mut materials = RecordingMaterials::default();
    let compilation =
        IfcxCompiler::with_options(options).compile(sources, &mut meshes, &mut materials);
    (compilation.script, meshes, materials)
}

fn layer(path: &str, data: &str) -> LayerSource {
    LayerSource::new(path, format!(r#"{{ "header": {{ "id": "{path}" }}, "data": {data} }}"#))
}

#[test]
fn test_two_layer_wall_merge() {
    let first = layer(
        "base.ifcx",
        r#"[
            { "path": "wall-1", "children": { "window": "win-1" },
              "attributes": { "core::height": 3.0 } },
            { "path": "win-1" }
        ]"#,
    );
    let second = layer(
        "overlay.ifcx",
        r#"[
            { "path": "wall-1",
              "attributes": { "core::height": 3.5, "core::isExternal": true } }
        ]"#,
    );

    let (script, _, _) = compile(&[first, second]);

    assert!(script.contains("\t(ifc.OwnerL1_overlay, core_height): {3.5}\n"));
    assert!(!script.contains("core_height): {3.0}"));
    assert!(script.contains("\t(ifc.OwnerL1_overlay, core_isExternal)\n"));
    assert!(script.contains("\twindow: win-1, ifc.OwnerL0_base {Name: {\"window\"}}\n"));
    assert!(script.contains("ifc.wall-1: ifc.OwnerL0_base {"));
    assert!(script.contains("prefab ifc.win-1 {"));

    // The window is declared before the wall that uses it
    let window = script.find("prefab ifc.win-1 {").unwrap();
    let wall = script.find("ifc.wall-1: ").unwrap();
    assert!(window < wall);
}

#[test]
fn test_mesh_registration_counts() {
    let mesh = |indices: &str| {
        layer(
            "mesh.ifcx",
            &format!(
                r#"[{{ "path": "m", "attributes": {{ "usd::usdgeom::mesh": {{
                    "faceVertexIndices": {indices},
                    "points": [[0,0,0],[1,0,0],[0,1,0],[1,1,0]] }} }} }}]"#
            ),
        )
    };

    let (script, meshes, _) = compile(&[mesh("[0,1,2,2,1,3]")]);
    assert_eq!(meshes.created, vec![6]);
    assert!(script.contains("\tMesh: {1}\n"));

    let (script, meshes, _) = compile(&[mesh("[0,1,2,2,1]")]);
    assert!(meshes.created.is_empty());
    assert!(!script.contains("Mesh:"));
    assert!(script.contains("ifc.m: ifc.OwnerL0_mesh {"));
}

#[test]
fn test_diffuse_color_opacity() {
    let with = layer(
        "c.ifcx",
        r#"[{ "path": "s", "attributes": {
            "bsi::ifc::presentation::diffuseColor": [0.8, 0.1, 0.1],
            "bsi::ifc::presentation::opacity": 0.5 } }]"#,
    );
    let (script, _, materials) = compile(&[with]);
    assert!(script.contains("bsi_ifc_presentation_diffuseColor): {{0.8, 0.1, 0.1, 0.5}}\n"));
    assert!(!script.contains("bsi_ifc_presentation_opacity"));
    assert_eq!(materials.requests.len(), 1);
    assert!(!materials.requests[0].1);

    let without = layer(
        "c.ifcx",
        r#"[{ "path": "s", "attributes": { "bsi::ifc::presentation::diffuseColor": [0.8, 0.1, 0.1] } }]"#,
    );
    let (script, _, materials) = compile(&[without]);
    assert!(script.contains("bsi_ifc_presentation_diffuseColor): {{0.8, 0.1, 0.1, 1}}\n"));
    assert!(materials.requests[0].1);
}

#[test]
fn test_space_material_offset() {
    let source = layer(
        "s.ifcx",
        r#"[{ "path": "room", "attributes": {
            "bsi::ifc::class": { "code": "IfcSpace" },
            "bsi::ifc::presentation::diffuseColor": [0.2, 0.2, 0.9] } }]"#,
    );
    let (_, _, materials) = compile(&[source]);
    assert_eq!(materials.requests[0].2, -0.5);

    let options = CompilerOptions::default().with_offset_categories(Vec::<String>::new());
    let source = layer(
        "s.ifcx",
        r#"[{ "path": "room", "attributes": {
            "bsi::ifc::class": { "code": "IfcSpace" },
            "bsi::ifc::presentation::diffuseColor": [0.2, 0.2, 0.9] } }]"#,
    );
    let (_, _, materials) = compile_with(options, &[source]);
    assert_eq!(materials.requests[0].2, 0.0);
}

#[test]
fn test_bad_layers_skipped() {
    let good = layer("good.ifcx", r#"[{ "path": "a" }]"#);
    let broken = LayerSource::new("broken.ifcx", "{ \"header\": {}, \"data\": [ ");
    let headless = LayerSource::new("headless.ifcx", r#"{ "data": [{ "path": "b" }] }"#);

    let mut meshes = MeshCache::new();
    let mut materials = MaterialCache::new();
    let compilation =
        IfcxCompiler::new().compile(&[broken, good, headless], &mut meshes, &mut materials);

    let skipped: Vec<_> = compilation
        .diagnostics
        .skipped_layers
        .iter()
        .map(|s| s.path.as_str())
        .collect();
    assert_eq!(skipped, vec!["broken.ifcx", "headless.ifcx"]);
    assert_eq!(compilation.layers.len(), 1);
    assert!(compilation.script.contains("ifc.a: ifc.OwnerL0_good {"));
    assert!(!compilation.script.contains("ifc.b"));
}

#[test]
fn test_cycle_does_not_abort() {
    let source = layer(
        "cycle.ifcx",
        r#"[
            { "path": "a", "inherits": { "base": "b" } },
            { "path": "b", "inherits": { "base": "a" } }
        ]"#,
    );

    let mut meshes = MeshCache::new();
    let mut materials = MaterialCache::new();
    let compilation = IfcxCompiler::new().compile(&[source], &mut meshes, &mut materials);

    assert_eq!(compilation.diagnostics.broken_cycles, vec!["a".to_string()]);
    assert!(compilation.script.contains("prefab ifc.a: b {"));
    assert!(compilation.script.contains("prefab ifc.b: a {"));
}

#[test]
fn test_topological_validity_over_layers() {
    let nodes = vec![
        RawNode::new("building").with_child("storey", "storey-1"),
        RawNode::new("storey-1").with_child("w1", "wall-1").with_child("w2", "wall-2"),
        RawNode::new("wall-1").with_inherit("type", "wall-type"),
        RawNode::new("wall-2").with_inherit("type", "wall-type"),
        RawNode::new("wall-type"),
    ];
    let graph = merge(nodes);
    let outcome = topological_sort(&graph);

    let rank = |path: &str| {
        let index = graph.position(path).unwrap();
        outcome.order.iter().position(|&i| i == index).unwrap()
    };
    for node in graph.nodes() {
        for dep in node.dependencies() {
            assert!(rank(dep) < rank(&node.path));
        }
    }

    let classes = Classification::from_nodes(&graph);
    assert_eq!(classes.main_root(), Some("building"));
    assert_eq!(classes.kind("storey-1"), NodeKind::Fragment);
    assert_eq!(classes.kind("wall-type"), NodeKind::Fragment);
}

#[test]
fn test_uuid_paths_become_identifiers() {
    let source = layer(
        "u.ifcx",
        r#"[
            { "path": "93791d5d-5beb-437b-b8ec-2f1f0ba4bf3b",
              "children": { "part": "0a1b2c3d-0000-4000-8000-00000000abcd" } },
            { "path": "0a1b2c3d-0000-4000-8000-00000000abcd" }
        ]"#,
    );
    let (script, _, _) = compile(&[source]);

    assert!(script.contains("ifc.ID93791d5d5beb437bb8ec2f1f0ba4bf3b: ifc.OwnerL0_u {"));
    assert!(script.contains("\tpart: ID0a1b2c3d00004000800000000000abcd, ifc.OwnerL0_u"));
    assert_eq!(normalize_uuids(&script), script);
}

#[test]
fn test_relationship_modes() {
    let data = r#"[
        { "path": "wall", "attributes": {
            "bsi::ifc::spaceBoundary": { "relatingSpace": { "ref": "room" } },
            "bsi::ifc::systemMembership": [{ "ref": "hvac" }, { "ref": "nowhere" }] } },
        { "path": "room" },
        { "path": "hvac" }
    ]"#;

    let (split, _, _) = compile(&[layer("r.ifcx", data)]);
    let section = split.split("// relationships\n").nth(1).unwrap();
    assert_eq!(
        section,
        "ifc.relationships.wall {\n\t(bsi_ifc_spaceBoundary_relatingSpace, room)\n\t(bsi_ifc_systemMembership, hvac)\n}\n"
    );

    let inline_options = CompilerOptions::default().with_relationship_mode(RelationshipMode::Inline);
    let (inline, _, _) = compile_with(inline_options, &[layer("r.ifcx", data)]);
    assert!(inline.contains("\t(bsi_ifc_systemMembership, hvac)\n"));
    assert!(!inline.contains("relationships"));
}

#[test]
fn test_layer_entities_and_run_label() {
    let a = layer("a.ifcx", r#"[{ "path": "x" }]"#);
    let b = layer("b.ifcx", r#"[{ "path": "y" }]"#);

    let compiler = IfcxCompiler::new();
    let mut meshes = MeshCache::new();
    let mut materials = MaterialCache::new();
    let compilation = compiler.compile(&[a, b], &mut meshes, &mut materials);

    assert!(compilation.script.starts_with("using ifc\n\nifc.L0_a {\n\tLayer\n"));
    assert!(compilation.script.contains("prefab ifc.OwnerL1_b {\n\tOwner: {\"ifc.L1_b\"}\n}\n"));

    let mut runner = RecordingRunner::default();
    compiler.run(&compilation, &mut runner);
    assert_eq!(runner.runs[0].0, "L0_a | L1_b");

    let quiet = IfcxCompiler::with_options(CompilerOptions::default().with_layers(false));
    let compilation = quiet.compile(&[layer("a.ifcx", "[]")], &mut meshes, &mut materials);
    assert_eq!(compilation.script, "using ifc\n\n");
}
