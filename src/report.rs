//! Outcome records for a coverage pass.
//!
//! Nothing here asserts anything about the exercised code. The report only
//! records what was attempted and how each attempt ended, so runs can be
//! compared and diagnosed.

use serde::Serialize;
use std::fmt;

/// Failure taxonomy of a pass.
///
/// | Kind | Scope | Recovery |
/// |------|-------|----------|
/// | `Discovery` | one discovered path | entry skipped |
/// | `Construction` | one constructor | other constructors still tried |
/// | `Invocation` | one method | next method proceeds |
/// | `Timeout` | one method | isolation unit abandoned, next method proceeds |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Discovery,
    Construction,
    Invocation,
    Timeout,
}

impl FailureKind {
    pub fn short_name(&self) -> &'static str {
        match self {
            FailureKind::Discovery => "discovery",
            FailureKind::Construction => "construction",
            FailureKind::Invocation => "invocation",
            FailureKind::Timeout => "timeout",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FailureKind::Discovery => "discovered path does not resolve to a loadable type",
            FailureKind::Construction => "constructor or its synthesized arguments faulted",
            FailureKind::Invocation => "method faulted when invoked with synthesized arguments",
            FailureKind::Timeout => "method did not return within the configured deadline",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Terminal state of one method invocation.
///
/// Invocations move `Pending -> Running -> {Completed | Failed | TimedOut}`;
/// synthetic members are `Skipped` without ever running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    Completed,
    Failed,
    TimedOut,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodOutcome {
    pub method: String,
    pub status: InvocationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionStatus {
    /// A real instance came out of the constructor.
    Constructed,
    /// Interface/abstract target, covered through a stand-in.
    StandIn,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstructionReport {
    /// Constructor signature, or the stand-in's class name.
    pub constructor: String,
    pub status: ConstructionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub methods: Vec<MethodOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeReport {
    pub path: String,
    pub type_name: String,
    pub constructions: Vec<ConstructionReport>,
}

impl TypeReport {
    /// Covered through a stand-in rather than its own constructors.
    pub fn is_stand_in(&self) -> bool {
        self.constructions
            .iter()
            .any(|c| c.status == ConstructionStatus::StandIn)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryFailure {
    pub path: String,
    pub type_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageSummary {
    pub types: usize,
    pub discovery_failures: usize,
    pub instances: usize,
    pub construction_failures: usize,
    pub methods_completed: usize,
    pub methods_failed: usize,
    pub methods_timed_out: usize,
    pub methods_skipped: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageReport {
    pub root: String,
    pub types: Vec<TypeReport>,
    pub discovery_failures: Vec<DiscoveryFailure>,
}

impl CoverageReport {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Discovered type names in pass order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.type_name.as_str()).collect()
    }

    /// Every `(type, method)` pair that was attempted, in pass order.
    pub fn attempted_methods(&self) -> Vec<(String, String)> {
        self.types
            .iter()
            .flat_map(|t| {
                t.constructions.iter().flat_map(move |c| {
                    c.methods
                        .iter()
                        .filter(|m| m.status != InvocationStatus::Skipped)
                        .map(move |m| (t.type_name.clone(), m.method.clone()))
                })
            })
            .collect()
    }

    pub fn find_type(&self, type_name: &str) -> Option<&TypeReport> {
        self.types.iter().find(|t| t.type_name == type_name)
    }

    pub fn summary(&self) -> CoverageSummary {
        let mut summary = CoverageSummary {
            types: self.types.len(),
            discovery_failures: self.discovery_failures.len(),
            ..CoverageSummary::default()
        };
        for construction in self.types.iter().flat_map(|t| &t.constructions) {
            match construction.status {
                ConstructionStatus::Constructed | ConstructionStatus::StandIn => {
                    summary.instances += 1
                }
                ConstructionStatus::Failed => summary.construction_failures += 1,
            }
            for method in &construction.methods {
                match method.status {
                    InvocationStatus::Completed => summary.methods_completed += 1,
                    InvocationStatus::Failed => summary.methods_failed += 1,
                    InvocationStatus::TimedOut => summary.methods_timed_out += 1,
                    InvocationStatus::Skipped => summary.methods_skipped += 1,
                }
            }
        }
        summary
    }
}
