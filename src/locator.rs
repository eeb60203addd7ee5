//! Type discovery: walk a source tree, map source files to type names and load them.
//!
//! Only files below the conventional source root with the conventional
//! extension are visible, e.g. with the default layout:
//!
//! ```text
//! src/main/java/com/acme/Wallet.java   ──►  com.acme.Wallet
//! src\main\java\com\acme\Wallet.java   ──►  com.acme.Wallet
//! ```
//!
//! Paths are sorted before loading so repeated runs see types in the same order.

use anyhow::{Context, Result};
use coverage_types::Invokable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

use crate::registry::TypeLoader;
use crate::strategy::CoverageStrategy;

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Directory convention recognized by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLayout {
    /// Source root relative to the scan root, written with either separator.
    pub source_root: String,
    /// File extension without the leading dot.
    pub extension: String,
    pub namespace_separator: char,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            source_root: "src/main/java".to_string(),
            extension: "java".to_string(),
            namespace_separator: '.',
        }
    }
}

impl SourceLayout {
    pub fn new(source_root: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            extension: extension.into(),
            ..Self::default()
        }
    }

    /// `src/main/java/`
    pub fn unix_prefix(&self) -> String {
        let root: Vec<&str> = self
            .source_root
            .split(is_separator)
            .filter(|s| !s.is_empty())
            .collect();
        format!("{}/", root.join("/"))
    }

    /// `src\main\java\`
    pub fn windows_prefix(&self) -> String {
        self.unix_prefix().replace('/', "\\")
    }

    fn postfix(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.'))
    }

    fn strip_prefix<'p>(&self, path: &'p str) -> Option<&'p str> {
        path.strip_prefix(self.unix_prefix().as_str())
            .or_else(|| path.strip_prefix(self.windows_prefix().as_str()))
    }

    /// Whether a path (relative to the scan root) is a source file of this layout.
    pub fn matches(&self, path: &str) -> bool {
        self.type_name_for_path(path).is_some()
    }

    /// Fully-qualified type name for a source path, or `None` if the path is
    /// outside the layout.
    pub fn type_name_for_path(&self, path: &str) -> Option<String> {
        let stem = self.strip_prefix(path)?.strip_suffix(self.postfix().as_str())?;
        let segments: Vec<&str> = stem.split(is_separator).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        let separator = self.namespace_separator.to_string();
        Some(segments.join(separator.as_str()))
    }
}

/// Walk `root` up to `max_depth` levels and return the sorted relative paths of
/// every source file the layout recognizes.
///
/// A fault while reading the tree (missing or unreadable root, unreadable
/// subdirectory) aborts the walk.
pub fn discover_source_paths(
    root: &Path,
    layout: &SourceLayout,
    max_depth: usize,
) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).max_depth(max_depth) {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative = relative.to_string_lossy().into_owned();
        if layout.matches(&relative) {
            paths.push(relative);
        }
    }
    paths.sort();
    Ok(paths)
}

/// One discovered source file and the outcome of loading its type.
pub struct DiscoveredType {
    pub path: String,
    pub type_name: String,
    pub resolved: Result<Arc<dyn Invokable>>,
}

pub struct TypeLocator<'a> {
    loader: &'a dyn TypeLoader,
    layout: &'a SourceLayout,
    strategy: &'a dyn CoverageStrategy,
}

impl<'a> TypeLocator<'a> {
    pub fn new(
        loader: &'a dyn TypeLoader,
        layout: &'a SourceLayout,
        strategy: &'a dyn CoverageStrategy,
    ) -> Self {
        Self {
            loader,
            layout,
            strategy,
        }
    }

    /// Walk eagerly, then load lazily as the returned iterator is consumed.
    pub fn discover_types(&self, root: &Path, max_depth: usize) -> Result<DiscoveredTypes<'a>> {
        let paths = discover_source_paths(root, self.layout, max_depth)?;
        tracing::debug!(root = %root.display(), count = paths.len(), "discovered source files");
        Ok(DiscoveredTypes {
            paths: paths.into_iter(),
            loader: self.loader,
            layout: self.layout,
            strategy: self.strategy,
        })
    }
}

pub struct DiscoveredTypes<'a> {
    paths: std::vec::IntoIter<String>,
    loader: &'a dyn TypeLoader,
    layout: &'a SourceLayout,
    strategy: &'a dyn CoverageStrategy,
}

impl Iterator for DiscoveredTypes<'_> {
    type Item = DiscoveredType;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        self.strategy.print_out(&path);
        let type_name = self
            .layout
            .type_name_for_path(&path)
            .unwrap_or_else(|| path.clone());
        let resolved = self
            .loader
            .load_type(&type_name)
            .with_context(|| format!("resolve {}", path));
        Some(DiscoveredType {
            path,
            type_name,
            resolved,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}
