//! Discovery preview CLI.
//!
//! A coverage pass runs inside the test binary that registers the types, so
//! this tool cannot exercise anything itself. It shows which source files a
//! pass would visit under a root and which type names they map to, using the
//! same layout and depth rules.
//!
//! ```text
//! super-coverage ./my-project --max-depth 10 --emit-json preview.json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use super_coverage::args::Args;
use super_coverage::locator::{discover_source_paths, SourceLayout};
use super_coverage::strategy::{CoverageConfig, CoverageStrategy};

#[derive(Debug, Serialize)]
struct PreviewEntry {
    path: String,
    type_name: String,
}

#[derive(Debug, Serialize)]
struct DiscoveryPreview {
    root: String,
    layout: SourceLayout,
    max_depth: usize,
    entries: Vec<PreviewEntry>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match args.config.as_deref() {
        Some(path) => CoverageConfig::from_json_file(path)?,
        None => CoverageConfig::from_env(),
    };
    let max_depth = args
        .max_depth
        .unwrap_or_else(|| config.depth_to_scan_files_from_folders());
    let layout = args.layout();

    let paths = discover_source_paths(&args.root, &layout, max_depth)?;
    let entries: Vec<PreviewEntry> = paths
        .into_iter()
        .filter_map(|path| {
            let type_name = layout.type_name_for_path(&path)?;
            Some(PreviewEntry { path, type_name })
        })
        .collect();
    tracing::info!(
        root = %args.root.display(),
        count = entries.len(),
        max_depth,
        "discovery preview"
    );

    let preview = DiscoveryPreview {
        root: args.root.display().to_string(),
        layout,
        max_depth,
        entries,
    };

    match args.emit_json.as_deref() {
        Some(path) if path == Path::new("-") => {
            write_json(io::stdout().lock(), &preview).context("write preview to stdout")?
        }
        Some(path) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_json(BufWriter::new(file), &preview)
                .with_context(|| format!("write {}", path.display()))?;
        }
        None => {
            let mut out = io::stdout().lock();
            for entry in &preview.entries {
                writeln!(out, "{}\t{}", entry.type_name, entry.path)?;
            }
        }
    }
    Ok(())
}

fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).context("serialize JSON")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
