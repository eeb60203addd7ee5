//! The coverage pass: discover, construct, exercise.
//!
//! ```text
//! TypeLocator ──► for each type (sorted by path)
//!                   └─► InstanceConstructor ──► for each instance
//!                                                 └─► MethodExerciser (one isolation unit per method)
//! ```
//!
//! The pipeline is strictly sequential. Only a fault in the discovery walk
//! aborts the pass; every other fault is recorded at the smallest scope that
//! contains it.

use anyhow::{Context, Result};
use coverage_types::Invokable;
use std::path::PathBuf;

use crate::constructor::InstanceConstructor;
use crate::exerciser::MethodExerciser;
use crate::locator::{SourceLayout, TypeLocator};
use crate::registry::TypeLoader;
use crate::report::{
    ConstructionReport, ConstructionStatus, CoverageReport, DiscoveryFailure, FailureKind,
    TypeReport,
};
use crate::strategy::{CoverageStrategy, DefaultCoverageStrategy};
use crate::synthesizer::ArgumentSynthesizer;

pub struct Coverager {
    strategy: Box<dyn CoverageStrategy>,
    loader: Box<dyn TypeLoader>,
    root: PathBuf,
    layout: SourceLayout,
}

/// Per-pass collaborators, built once and shared by every type.
struct PassContext<'a> {
    strategy: &'a dyn CoverageStrategy,
    synthesizer: &'a ArgumentSynthesizer<'a>,
    constructor: &'a InstanceConstructor<'a>,
    exerciser: &'a MethodExerciser,
}

impl Coverager {
    /// Scan the working directory with the default strategy and layout.
    pub fn new(loader: impl TypeLoader + 'static) -> Self {
        Self {
            strategy: Box::new(DefaultCoverageStrategy),
            loader: Box::new(loader),
            root: PathBuf::from("."),
            layout: SourceLayout::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: impl CoverageStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Entry point for test runs: run the pass and discard the report.
    ///
    /// Fails only when the source tree itself cannot be walked.
    pub fn coverage(&self) -> Result<()> {
        self.run().map(|_| ())
    }

    pub fn run(&self) -> Result<CoverageReport> {
        let strategy = self.strategy.as_ref();
        let loader = self.loader.as_ref();

        let locator = TypeLocator::new(loader, &self.layout, strategy);
        let discovered = locator
            .discover_types(&self.root, strategy.depth_to_scan_files_from_folders())
            .with_context(|| format!("discover types under {}", self.root.display()))?;

        let synthesizer = ArgumentSynthesizer::new(loader);
        let constructor = InstanceConstructor::new(
            loader,
            &synthesizer,
            strategy.depth_for_constructor_injection(),
        );
        let exerciser = MethodExerciser::new(strategy.method_timeout())?;
        let ctx = PassContext {
            strategy,
            synthesizer: &synthesizer,
            constructor: &constructor,
            exerciser: &exerciser,
        };

        let mut report = CoverageReport::new(self.root.display().to_string());
        for entry in discovered {
            let ty = match entry.resolved {
                Ok(ty) => ty,
                Err(err) => {
                    let reason = format!("{:#}", err);
                    strategy.print_failure(FailureKind::Discovery, &reason);
                    report.discovery_failures.push(DiscoveryFailure {
                        path: entry.path,
                        type_name: entry.type_name,
                        reason,
                    });
                    continue;
                }
            };
            strategy.print_out(ty.name());
            report.types.push(cover_type(&ctx, entry.path, ty.as_ref()));
        }

        let summary = report.summary();
        tracing::info!(
            types = summary.types,
            instances = summary.instances,
            completed = summary.methods_completed,
            failed = summary.methods_failed,
            timed_out = summary.methods_timed_out,
            discovery_failures = summary.discovery_failures,
            "coverage pass finished"
        );
        Ok(report)
    }
}

fn cover_type(ctx: &PassContext<'_>, path: String, ty: &dyn Invokable) -> TypeReport {
    let constructions = ctx
        .constructor
        .construct(ty)
        .into_iter()
        .map(|attempt| match attempt.outcome {
            Ok(instance) => {
                let status = if attempt.stand_in {
                    ConstructionStatus::StandIn
                } else {
                    ConstructionStatus::Constructed
                };
                let methods = ctx.exerciser.exercise(
                    &instance,
                    ty.methods(),
                    ctx.synthesizer,
                    ctx.strategy,
                );
                ConstructionReport {
                    constructor: attempt.constructor,
                    status,
                    failure_reason: None,
                    methods,
                }
            }
            Err(fault) => {
                ctx.strategy.print_failure(
                    FailureKind::Construction,
                    &format!("{}: {}", attempt.constructor, fault),
                );
                ConstructionReport {
                    constructor: attempt.constructor,
                    status: ConstructionStatus::Failed,
                    failure_reason: Some(fault.to_string()),
                    methods: Vec::new(),
                }
            }
        })
        .collect();

    TypeReport {
        path,
        type_name: ty.name().to_string(),
        constructions,
    }
}
