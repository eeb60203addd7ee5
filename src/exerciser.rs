//! Method exerciser: invoke every declared method of an instance, each inside
//! an isolated, time-bounded unit.
//!
//! ## Isolation
//!
//! Each invocation runs on the blocking pool of a runtime owned by the
//! exerciser and is raced against the configured deadline:
//!
//! ```text
//! spawn_blocking(invoke) ──► recv_timeout(deadline) ──┬──► Completed
//!                                                     ├──► Failed    (fault or panic)
//!                                                     └──► TimedOut  (handle aborted, task detached)
//! ```
//!
//! Invocations never overlap: the caller launches one unit, waits at most the
//! deadline, discards it, and only then launches the next. A unit that times
//! out cannot be stopped mid-call; it keeps its blocking thread until the call
//! returns on its own.

use anyhow::{Context, Result};
use coverage_types::{MethodDescriptor, Object, Value};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tokio::runtime::{Builder, Runtime};

use crate::report::{FailureKind, InvocationStatus, MethodOutcome};
use crate::strategy::CoverageStrategy;
use crate::synthesizer::ArgumentSynthesizer;
use crate::utils::{contain, duration_ms};

pub struct MethodExerciser {
    runtime: Option<Runtime>,
    timeout: Duration,
}

impl MethodExerciser {
    pub fn new(timeout: Duration) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("coverage-isolation")
            .build()
            .context("build isolation runtime")?;
        Ok(Self {
            runtime: Some(runtime),
            timeout,
        })
    }

    /// Exercise every method of `instance`, in declaration order.
    ///
    /// Synthetic members are skipped. Failures and timeouts are reported
    /// through `strategy` and never stop the remaining methods.
    pub fn exercise(
        &self,
        instance: &Object,
        methods: &[MethodDescriptor],
        synthesizer: &ArgumentSynthesizer<'_>,
        strategy: &dyn CoverageStrategy,
    ) -> Vec<MethodOutcome> {
        let mut outcomes = Vec::with_capacity(methods.len());
        for method in methods {
            if method.is_synthetic() {
                tracing::trace!(method = %method.qualified_name(), "skipping synthetic member");
                outcomes.push(MethodOutcome {
                    method: method.name().to_string(),
                    status: InvocationStatus::Skipped,
                    detail: None,
                    elapsed_ms: 0,
                });
                continue;
            }

            strategy.print_out(method.name());
            let args = synthesizer.synthesize_all(method.params());
            let outcome = self.invoke_isolated(instance, method, args);
            match outcome.status {
                InvocationStatus::Failed => strategy.print_failure(
                    FailureKind::Invocation,
                    &format!(
                        "{}: {}",
                        method.qualified_name(),
                        outcome.detail.as_deref().unwrap_or("failed")
                    ),
                ),
                InvocationStatus::TimedOut => strategy.print_failure(
                    FailureKind::Timeout,
                    &format!(
                        "{} did not return within {} ms",
                        method.qualified_name(),
                        duration_ms(self.timeout)
                    ),
                ),
                InvocationStatus::Completed | InvocationStatus::Skipped => {}
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Run one invocation in its own isolation unit and wait at most the deadline.
    ///
    /// The caller's thread only waits on a channel, so this is safe to call
    /// from inside another runtime (e.g. a `#[tokio::test]`).
    pub fn invoke_isolated(
        &self,
        instance: &Object,
        method: &MethodDescriptor,
        args: Vec<Value>,
    ) -> MethodOutcome {
        let name = method.name().to_string();
        let Some(runtime) = self.runtime.as_ref() else {
            return MethodOutcome {
                method: name,
                status: InvocationStatus::Failed,
                detail: Some("isolation runtime is shut down".to_string()),
                elapsed_ms: 0,
            };
        };

        let receiver = instance.clone();
        let target = method.clone();
        let (tx, rx) = mpsc::sync_channel(1);
        let started = Instant::now();
        tracing::trace!(method = %method.qualified_name(), "running");

        let unit = runtime.handle().spawn_blocking(move || {
            let result = contain(|| target.invoke_unchecked(&receiver, &args));
            // The receiver is gone once the caller gave up on this unit.
            let _ = tx.send(result);
        });

        let (status, detail) = match rx.recv_timeout(self.timeout) {
            Ok(Ok(_)) => (InvocationStatus::Completed, None),
            Ok(Err(fault)) => (InvocationStatus::Failed, Some(fault.to_string())),
            Err(RecvTimeoutError::Timeout) => {
                // Only effective if the call has not started yet.
                unit.abort();
                (InvocationStatus::TimedOut, None)
            }
            Err(RecvTimeoutError::Disconnected) => (
                InvocationStatus::Failed,
                Some("isolation unit ended without a result".to_string()),
            ),
        };

        MethodOutcome {
            method: name,
            status,
            detail,
            elapsed_ms: duration_ms(started.elapsed()),
        }
    }
}

impl Drop for MethodExerciser {
    fn drop(&mut self) {
        // Timed-out calls may still hold blocking threads; do not wait for them.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
