// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ifcx-compile` - compile IFCX layers into an ECS script

use anyhow::{bail, Context, Result};
use ifcx_compiler::{CompilerOptions, FsLoader, IfcxCompiler, WriterRunner};
use ifcx_geometry::{MaterialCache, MeshCache};
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    scope: Option<String>,
    out: Option<String>,
    layers: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return;
    }

    if let Err(err) = run(&args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  ifcx-compile [--config <file>] [--scope <name>] [--out <file>] <layer.ifcx>...");
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "--config" => parsed.config = Some(value("--config")?),
            "--scope" => parsed.scope = Some(value("--scope")?),
            "--out" => parsed.out = Some(value("--out")?),
            flag if flag.starts_with("--") => bail!("unknown option `{flag}`"),
            layer => parsed.layers.push(layer.to_string()),
        }
    }

    if parsed.layers.is_empty() {
        print_usage();
        bail!("no layer files given");
    }
    Ok(parsed)
}

fn run(args: &[String]) -> Result<()> {
    let args = parse_args(args)?;

    let mut options = match &args.config {
        Some(path) => CompilerOptions::from_json_file(path)
            .with_context(|| format!("reading config {path}"))?,
        None => CompilerOptions::default(),
    };
    if let Some(scope) = args.scope {
        options = options.with_scope(scope);
    }

    let compiler = IfcxCompiler::with_options(options);
    let mut meshes = MeshCache::new();
    let mut materials = MaterialCache::new();
    let compilation = compiler.load(&FsLoader::new(), &args.layers, &mut meshes, &mut materials);

    let diagnostics = &compilation.diagnostics;
    if !diagnostics.skipped_layers.is_empty() || !diagnostics.broken_cycles.is_empty() {
        log::warn!(
            "{} layer(s) skipped, {} cycle(s) broken",
            diagnostics.skipped_layers.len(),
            diagnostics.broken_cycles.len()
        );
    }
    log::info!(
        "{} nodes, {} meshes, {} materials",
        diagnostics.merged_nodes,
        meshes.stats().entries,
        materials.stats().entries
    );

    let writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {path}"))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let mut runner = WriterRunner::new(writer);
    compiler.run(&compilation, &mut runner);

    if runner.failures() > 0 {
        bail!("failed to write the script");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(&strings(&["--scope", "site", "a.ifcx", "--out", "o.txt", "b.ifcx"])).unwrap();
        assert_eq!(args.scope.as_deref(), Some("site"));
        assert_eq!(args.out.as_deref(), Some("o.txt"));
        assert_eq!(args.layers, vec!["a.ifcx", "b.ifcx"]);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&strings(&[])).is_err());
        assert!(parse_args(&strings(&["a.ifcx", "--scope"])).is_err());
        assert!(parse_args(&strings(&["--bogus", "a.ifcx"])).is_err());
    }
}
