#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Runs the pattern checkers a criterion requires and records the outcome.

use bon::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    checks::{Check, CheckInput, CheckOutcome, PatternChecker, StaticChecker},
    criteria::{Composition, Criterion, Rubric},
};
use crate::{
    constants::ARTIFACT_ABSENT,
    python::{Project, Submission, TreeView},
};

/// Outcome of evaluating one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into), finish_fn(name = build_unchecked, vis = ""))]
pub struct CheckResult {
    /// Identifier of the criterion this result belongs to.
    #[builder(getter)]
    criterion: String,
    /// Whether every required check passed.
    #[builder(getter)]
    passed:    bool,
    /// Failure reasons in check order; empty iff `passed`.
    #[builder(default)]
    #[builder(getter)]
    reasons:   Vec<String>,
}

impl CheckResult {
    /// A passing result.
    pub fn pass(criterion: impl Into<String>) -> Self {
        Self {
            criterion: criterion.into(),
            passed:    true,
            reasons:   Vec::new(),
        }
    }

    /// A failing result. An empty reason list gets a generic reason so the
    /// "no reasons iff passed" rule holds.
    pub fn fail(criterion: impl Into<String>, mut reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            reasons.push("requirement not met".to_string());
        }
        Self {
            criterion: criterion.into(),
            passed: false,
            reasons,
        }
    }

    /// Returns the criterion identifier.
    pub fn criterion(&self) -> &str {
        &self.criterion
    }

    /// Whether the criterion passed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Returns the failure reasons.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

impl<S> CheckResultBuilder<S>
where
    S: check_result_builder::IsComplete,
{
    /// Builds the result, keeping reasons empty iff it passed.
    pub fn build(self) -> CheckResult {
        let raw = self.build_unchecked();
        if raw.passed {
            CheckResult::pass(raw.criterion)
        } else {
            CheckResult::fail(raw.criterion, raw.reasons)
        }
    }
}

/// Evaluates criteria against submissions with a [`PatternChecker`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator<C = StaticChecker> {
    /// Checker used for every pattern question.
    checker: C,
}

impl Evaluator<StaticChecker> {
    /// An evaluator backed by the regex/tree checkers.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: PatternChecker> Evaluator<C> {
    /// An evaluator backed by a custom checker.
    pub fn with_checker(checker: C) -> Self {
        Self { checker }
    }

    /// Returns the underlying checker.
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Evaluates every applicable criterion against one submission, in the
    /// order given. Criteria that do not reference the submission are
    /// skipped.
    pub fn evaluate_submission<'r>(
        &self,
        submission: &Submission,
        criteria: impl IntoIterator<Item = &'r Criterion>,
    ) -> Vec<CheckResult> {
        criteria
            .into_iter()
            .filter_map(|criterion| {
                let checks = criterion.checks_for(submission.name())?;
                let (passed, reasons) = self.run_target(criterion, submission, checks);
                Some(if passed {
                    CheckResult::pass(criterion.id())
                } else {
                    CheckResult::fail(criterion.id(), reasons)
                })
            })
            .collect()
    }

    /// Evaluates the whole rubric, producing one result per criterion in
    /// rubric order. Criteria spanning several artifacts fail if any target
    /// fails; their reasons are prefixed with the file name.
    pub fn evaluate(&self, project: &Project, rubric: &Rubric) -> Vec<CheckResult> {
        rubric
            .criteria()
            .iter()
            .map(|criterion| {
                let multi = criterion.targets().len() > 1;
                let mut passed = true;
                let mut reasons = Vec::new();

                for target in criterion.targets() {
                    let absent;
                    let submission = match project.identify(&target.artifact) {
                        Ok(found) => found,
                        Err(_) => {
                            absent = Submission::absent(target.artifact.as_str());
                            &absent
                        }
                    };

                    let (ok, target_reasons) =
                        self.run_target(criterion, submission, &target.checks);
                    passed &= ok;

                    reasons.extend(target_reasons.into_iter().map(|reason| {
                        if multi {
                            format!("{}: {reason}", target.artifact)
                        } else {
                            reason
                        }
                    }));
                }

                debug!(criterion = criterion.id(), passed, "criterion evaluated");
                if passed {
                    CheckResult::pass(criterion.id())
                } else {
                    CheckResult::fail(criterion.id(), reasons)
                }
            })
            .collect()
    }

    /// Runs `checks` for one artifact under the criterion's composition rule.
    ///
    /// `AllOf` stops at the first failure, except that a tree check skipped
    /// because the file did not parse lets the text checks after it run.
    fn run_target(
        &self,
        criterion: &Criterion,
        submission: &Submission,
        checks: &[Check],
    ) -> (bool, Vec<String>) {
        let Some(source) = submission.view() else {
            return (false, vec![ARTIFACT_ABSENT.to_string()]);
        };
        let unparsed = matches!(source.tree, TreeView::Failed { .. });

        let mut reasons: Vec<String> = Vec::new();
        for check in checks {
            if let CheckOutcome::Failed(reason) = self.checker.run(*check, &source) {
                if !reasons.contains(&reason) {
                    reasons.push(reason);
                }
                let skipped = unparsed && check.input() == CheckInput::Tree;
                if criterion.composition() == Composition::AllOf && !skipped {
                    break;
                }
            }
        }

        (reasons.is_empty(), reasons)
    }
}
