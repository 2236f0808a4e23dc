#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Weighted totals and the verdict.
pub mod aggregate;
/// Regex and syntax tree pattern checks.
pub mod checks;
/// Criteria and the default rubric.
pub mod criteria;
/// Structured linter findings.
pub mod diagnostics;
/// Runs checks per criterion.
pub mod evaluate;
/// Linter profiles and the score mapper.
pub mod lint;
/// One end-to-end grading pass.
pub mod pipeline;
/// Markdown, terminal and JSON output.
pub mod report;

pub use aggregate::{AggregateResult, ScoreEntry, ScoreSource, Verdict, aggregate};
pub use checks::{Check, CheckOutcome, Engine, PatternChecker, StaticChecker};
pub use criteria::{Composition, Criterion, Rubric, Target};
pub use diagnostics::{DiagnosticSeverity, LintDiagnostic};
pub use evaluate::{CheckResult, Evaluator};
pub use lint::{LinterKind, LinterProfile, LinterRun, map_score};
pub use pipeline::GradingRun;
pub use report::{GradeReport, Status};
