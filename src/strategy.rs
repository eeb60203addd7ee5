//! Coverage strategy: the tunables the exerciser reads, plus the gated
//! diagnostic output helpers.
//!
//! The engine never owns its configuration; it is handed a
//! [`CoverageStrategy`] at construction time. [`DefaultCoverageStrategy`]
//! carries the stock values, [`CoverageConfig`] is the plain-data version that
//! can be loaded from JSON or from `COVERAGE_*` environment variables.

use anyhow::{Context, Result};
use coverage_types::env_utils::{env_bool_or, env_var_or};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::report::FailureKind;
use crate::utils::duration_ms;

pub const DEFAULT_INJECTION_DEPTH: usize = 5;
pub const DEFAULT_SCAN_DEPTH: usize = 15;
pub const DEFAULT_METHOD_TIMEOUT_MS: u64 = 500;

pub trait CoverageStrategy: Send + Sync {
    /// How many levels the single-parameter constructor heuristic may chain.
    fn depth_for_constructor_injection(&self) -> usize;

    /// Upper bound on directory traversal below the scan root.
    fn depth_to_scan_files_from_folders(&self) -> usize;

    /// Deadline for a single method invocation.
    fn method_timeout(&self) -> Duration;

    fn is_printing_out_enabled(&self) -> bool;

    fn is_failure_printing_out_enabled(&self) -> bool;

    /// Progress line (discovered path, loaded type, attempted method).
    fn print_out(&self, line: &str) {
        if self.is_printing_out_enabled() {
            tracing::info!(target: "super_coverage", "{}", line);
        }
    }

    /// Caught failure or timeout.
    fn print_failure(&self, kind: FailureKind, detail: &str) {
        if self.is_failure_printing_out_enabled() {
            tracing::warn!(target: "super_coverage", kind = kind.short_name(), "{}", detail);
        }
    }
}

/// Stock strategy: depth 15, 500 ms per method, all output enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCoverageStrategy;

impl CoverageStrategy for DefaultCoverageStrategy {
    fn depth_for_constructor_injection(&self) -> usize {
        DEFAULT_INJECTION_DEPTH
    }

    fn depth_to_scan_files_from_folders(&self) -> usize {
        DEFAULT_SCAN_DEPTH
    }

    fn method_timeout(&self) -> Duration {
        Duration::from_millis(DEFAULT_METHOD_TIMEOUT_MS)
    }

    fn is_printing_out_enabled(&self) -> bool {
        true
    }

    fn is_failure_printing_out_enabled(&self) -> bool {
        true
    }
}

/// Plain-data strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    pub injection_depth: usize,
    pub scan_depth: usize,
    pub method_timeout_ms: u64,
    pub print_progress: bool,
    pub print_failures: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            injection_depth: DEFAULT_INJECTION_DEPTH,
            scan_depth: DEFAULT_SCAN_DEPTH,
            method_timeout_ms: DEFAULT_METHOD_TIMEOUT_MS,
            print_progress: true,
            print_failures: true,
        }
    }
}

impl CoverageConfig {
    /// Defaults overridden by `COVERAGE_*` environment variables.
    ///
    /// Unset or unparsable variables keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            injection_depth: env_var_or("COVERAGE_INJECTION_DEPTH", defaults.injection_depth),
            scan_depth: env_var_or("COVERAGE_SCAN_DEPTH", defaults.scan_depth),
            method_timeout_ms: env_var_or("COVERAGE_TIMEOUT_MS", defaults.method_timeout_ms),
            print_progress: env_bool_or("COVERAGE_PRINT", defaults.print_progress),
            print_failures: env_bool_or("COVERAGE_PRINT_FAILURES", defaults.print_failures),
        }
    }

    /// Load from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
    }

    /// Quiet variant for test runs: no progress lines, failures still reported.
    pub fn quiet() -> Self {
        Self {
            print_progress: false,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.method_timeout_ms = duration_ms(timeout);
        self
    }
}

impl CoverageStrategy for CoverageConfig {
    fn depth_for_constructor_injection(&self) -> usize {
        self.injection_depth
    }

    fn depth_to_scan_files_from_folders(&self) -> usize {
        self.scan_depth
    }

    fn method_timeout(&self) -> Duration {
        Duration::from_millis(self.method_timeout_ms)
    }

    fn is_printing_out_enabled(&self) -> bool {
        self.print_progress
    }

    fn is_failure_printing_out_enabled(&self) -> bool {
        self.print_failures
    }
}
