//! Assertion helpers over coverage reports.

use super_coverage::report::{CoverageReport, MethodOutcome};
use super_coverage::InvocationStatus;

/// Assert that a result is Ok and return the inner value.
///
/// Provides a better error message than `.unwrap()` by including context.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Every outcome recorded for `method` of `type_name`, across all instances.
#[allow(dead_code)]
pub fn method_outcomes<'r>(
    report: &'r CoverageReport,
    type_name: &str,
    method: &str,
) -> Vec<&'r MethodOutcome> {
    let ty = report
        .find_type(type_name)
        .unwrap_or_else(|| panic!("{} missing from report: {:?}", type_name, report.type_names()));
    ty.constructions
        .iter()
        .flat_map(|c| &c.methods)
        .filter(|m| m.method == method)
        .collect()
}

/// Assert `method` of `type_name` ran exactly once and ended in `expected`.
#[allow(dead_code)]
pub fn assert_method_status(
    report: &CoverageReport,
    type_name: &str,
    method: &str,
    expected: InvocationStatus,
) -> MethodOutcome {
    let outcomes = method_outcomes(report, type_name, method);
    assert_eq!(
        outcomes.len(),
        1,
        "{}.{} should have exactly one outcome, got {:?}",
        type_name,
        method,
        outcomes
    );
    assert_eq!(
        outcomes[0].status, expected,
        "{}.{} ended as {:?} ({:?})",
        type_name, method, outcomes[0].status, outcomes[0].detail
    );
    outcomes[0].clone()
}
