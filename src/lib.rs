//! Super Coverage
//!
//! Drives every described type under a source tree through construction and
//! method invocation, so that coverage tooling sees the code executed:
//!
//! - **Discovery**: walk the tree, map source files to type names, load them
//! - **Synthesis**: a default value for any parameter type, stand-ins for the rest
//! - **Construction**: every constructor, accessibility bypassed, with
//!   single-parameter injection
//! - **Exercising**: every non-synthetic method, each in an isolated unit
//!   bounded by a timeout
//!
//! See [`coverager`] for the entry point and [`strategy`] for the tunables.

#![allow(clippy::type_complexity)]

pub mod args;
pub mod constructor;
pub mod coverager;
pub mod exerciser;
pub mod locator;
pub mod registry;
pub mod report;
pub mod strategy;
pub mod synthesizer;
pub mod utils;

pub use coverager::Coverager;
pub use locator::{SourceLayout, TypeLocator};
pub use registry::{TypeLoader, TypeRegistry};
pub use report::{CoverageReport, CoverageSummary, FailureKind, InvocationStatus};
pub use strategy::{CoverageConfig, CoverageStrategy, DefaultCoverageStrategy};
