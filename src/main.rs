use std::path::Path;
use std::time::Instant;

use anyhow::{Context, bail};
use log::info;
use risk_adjust::algorithm::{HccResolver, ReferenceBuilder};
use risk_adjust::source::FileSystemSource;
use risk_adjust::{BuildConfig, ResolverConfig, SchemeVersion, store};

#[cfg(feature = "snmalloc")]
#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

const USAGE: &str = "Usage:
  risk-adjust build <raw-root> <manifest.json> <out-dir>
  risk-adjust resolve <reference-dir> <v12|v21|v22> <diagnoses.parquet> <out.parquet>";

fn build(raw_root: &Path, manifest: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let source = FileSystemSource::from_manifest(raw_root, manifest)
        .with_context(|| format!("loading manifest {}", manifest.display()))?;
    info!(
        "Building reference tables from {} artifacts under {}",
        source.entries().len(),
        raw_root.display()
    );

    let build = ReferenceBuilder::new(BuildConfig::default()).build(&source)?;
    let written = store::write_library(out_dir, &build.library)
        .with_context(|| format!("writing reference tables to {}", out_dir.display()))?;
    info!("Wrote {} reference tables to {}", written.len(), out_dir.display());

    println!("{}", serde_json::to_string_pretty(&build.report)?);
    Ok(())
}

fn resolve(reference_dir: &Path, version: &str, input: &Path, output: &Path) -> anyhow::Result<()> {
    let version: SchemeVersion = version.parse()?;
    let library = store::read_library(reference_dir)
        .with_context(|| format!("reading reference tables from {}", reference_dir.display()))?;
    let records = store::read_diagnoses(input)
        .with_context(|| format!("reading diagnosis records from {}", input.display()))?;

    let resolution = HccResolver::new(&library, ResolverConfig::default()).resolve(&records, version)?;
    store::write_matrix(output, &resolution.matrix)
        .with_context(|| format!("writing matrix to {}", output.display()))?;

    println!("{}", serde_json::to_string_pretty(&resolution.stats)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let start = Instant::now();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["build", raw_root, manifest, out_dir] => {
            build(Path::new(raw_root), Path::new(manifest), Path::new(out_dir))?;
        }
        ["resolve", reference_dir, version, input, output] => {
            resolve(Path::new(reference_dir), version, Path::new(input), Path::new(output))?;
        }
        _ => bail!("{USAGE}"),
    }

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
