use clap::Parser;
use std::path::PathBuf;

use crate::locator::SourceLayout;

/// Preview what a coverage pass would discover under a source tree.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Scan root (the directory that contains the source root).
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Source root relative to the scan root; either separator form is accepted.
    #[arg(long, value_name = "PATH", default_value = "src/main/java")]
    pub source_root: String,

    /// Source file extension, with or without the leading dot.
    #[arg(long, value_name = "EXT", default_value = "java")]
    pub extension: String,

    /// Override the scan depth (otherwise config file, `COVERAGE_SCAN_DEPTH`, or 15).
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Read the coverage configuration from a JSON file instead of the environment.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the discovery preview as JSON to this path (`-` for stdout).
    #[arg(long, value_name = "PATH")]
    pub emit_json: Option<PathBuf>,

    /// Log filter (e.g. `info`, `super_coverage=debug`). `RUST_LOG` wins when set.
    #[arg(long, default_value = "info")]
    pub log: String,
}

impl Args {
    pub fn layout(&self) -> SourceLayout {
        SourceLayout::new(self.source_root.clone(), self.extension.clone())
    }
}
