#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Loads a submission, evaluates it, lints it and aggregates the result.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::{
    aggregate::{AggregateResult, aggregate},
    criteria::Rubric,
    evaluate::{CheckResult, Evaluator},
    lint::{LinterProfile, LinterRun},
    report::GradeReport,
};
use crate::{
    config::GradingConfig,
    process::run_linters,
    python::{Project, ProjectPaths},
};

/// The outcome of grading one repository.
#[derive(Debug, Clone)]
pub struct GradingRun {
    /// The loaded submission.
    project: Project,
    /// The rubric that was applied.
    rubric:  Rubric,
    /// The policy that was applied.
    config:  GradingConfig,
    /// One result per criterion, in rubric order.
    checks:  Vec<CheckResult>,
    /// One run per linter profile.
    linters: Vec<LinterRun>,
    /// The score sheet.
    result:  AggregateResult,
}

/// JSON shape of an exported run.
#[derive(Serialize)]
struct Export<'a> {
    /// The score sheet.
    result:  &'a AggregateResult,
    /// Per-criterion outcomes.
    checks:  &'a [CheckResult],
    /// Linter runs.
    linters: &'a [LinterRun],
}

impl GradingRun {
    /// Grades the repository at `paths`: loads the scripts, runs the
    /// evaluator and the linters, and aggregates.
    pub async fn run(
        paths: ProjectPaths,
        rubric: Rubric,
        config: GradingConfig,
        profiles: &[LinterProfile],
    ) -> Result<Self> {
        let project = Project::from_paths(paths).context("Failed to load the submission")?;
        let files = project.present_paths();
        let linters = run_linters(
            profiles,
            &files,
            Some(project.paths().root_dir()),
            config.lint_timeout(),
        )
        .await;

        Ok(Self::from_parts(project, rubric, config, linters))
    }

    /// Evaluates an already loaded project against linter runs obtained
    /// elsewhere.
    pub fn from_parts(
        project: Project,
        rubric: Rubric,
        config: GradingConfig,
        linters: Vec<LinterRun>,
    ) -> Self {
        let checks = Evaluator::new().evaluate(&project, &rubric);
        let result = aggregate(&checks, &linters, &config);
        info!(
            achieved = result.achieved(),
            maximum = result.maximum(),
            percentage = result.percentage(),
            verdict = %result.verdict(),
            "graded submission"
        );

        Self {
            project,
            rubric,
            config,
            checks,
            linters,
            result,
        }
    }

    /// Returns the loaded project.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Returns the applied rubric.
    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Returns the applied policy.
    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Returns the per-criterion results.
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// Returns the linter runs.
    pub fn linters(&self) -> &[LinterRun] {
        &self.linters
    }

    /// Returns the score sheet.
    pub fn result(&self) -> &AggregateResult {
        &self.result
    }

    /// A report over this run.
    pub fn report(&self) -> GradeReport<'_> {
        GradeReport::builder()
            .result(&self.result)
            .checks(&self.checks)
            .linters(&self.linters)
            .rubric(&self.rubric)
            .has_dir(self.project.has_dir())
            .problems(self.project.problems())
            .build()
    }

    /// Serializes the score sheet with the results it was computed from.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&Export {
            result:  &self.result,
            checks:  &self.checks,
            linters: &self.linters,
        })
        .context("Failed to serialize grading results")
    }
}
