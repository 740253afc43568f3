// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compile throughput over synthetic multi-layer models
//!
//! Run with: cargo bench -p ifcx-compiler --bench compile

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ifcx_compiler::{IfcxCompiler, LayerSource};
use ifcx_geometry::{MaterialCache, MeshCache};
use serde_json::{json, Value};

/// Storeys of walls sharing one mesh, plus an overlay layer touching every wall
fn generate_layers(storeys: usize, walls_per_storey: usize) -> Vec<LayerSource> {
    let mut base = Vec::new();
    let mut overlay = Vec::new();

    let storey_children: serde_json::Map<String, Value> = (0..storeys)
        .map(|s| (format!("storey{s}"), json!(format!("storey-{s}"))))
        .collect();
    base.push(json!({
        "path": "site",
        "children": storey_children,
        "attributes": { "bsi::ifc::class": { "code": "IfcSite", "uri": "" } }
    }));

    for s in 0..storeys {
        let walls: serde_json::Map<String, Value> = (0..walls_per_storey)
            .map(|w| (format!("wall{w}"), json!(format!("wall-{s}-{w}"))))
            .collect();
        base.push(json!({ "path": format!("storey-{s}"), "children": walls }));

        for w in 0..walls_per_storey {
            let path = format!("wall-{s}-{w}");
            base.push(json!({
                "path": path,
                "inherits": { "type": "wall-type" },
                "attributes": {
                    "bsi::ifc::class": { "code": "IfcWall", "uri": "" },
                    "bsi::ifc::presentation::diffuseColor": [0.6, 0.6, 0.6],
                    "usd::xformop": { "transform": [
                        [1.0, 0.0, 0.0, 0.0],
                        [0.0, 1.0, 0.0, 0.0],
                        [0.0, 0.0, 1.0, 0.0],
                        [w as f64, s as f64 * 3.0, 0.0, 1.0]
                    ] }
                }
            }));
            overlay.push(json!({
                "path": path,
                "attributes": { "bsi::ifc::prop::IsExternal": w % 2 == 0 }
            }));
        }
    }

    base.push(json!({
        "path": "wall-type",
        "attributes": { "usd::usdgeom::mesh": {
            "faceVertexIndices": [0, 1, 2, 2, 1, 3],
            "points": [[0, 0, 0], [1, 0, 0], [0, 1, 0], [1, 1, 0]]
        } }
    }));

    let document = |id: &str, data: Vec<Value>| {
        json!({ "header": { "id": id, "version": "ifcx_alpha" }, "data": data }).to_string()
    };
    vec![
        LayerSource::new("base.ifcx", document("base", base)),
        LayerSource::new("overlay.ifcx", document("overlay", overlay)),
    ]
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let compiler = IfcxCompiler::new();

    for &(storeys, walls) in &[(4usize, 25usize), (10, 100), (20, 250)] {
        let sources = generate_layers(storeys, walls);
        let nodes = storeys * walls;
        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &sources, |b, sources| {
            b.iter(|| {
                let mut meshes = MeshCache::new();
                let mut materials = MaterialCache::new();
                black_box(compiler.compile(black_box(sources), &mut meshes, &mut materials))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
