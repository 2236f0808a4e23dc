#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Renders grading results for people and for CI.
//!
//! Rendering only reads the score sheet; it never recomputes a score.

use std::{
    fmt::{Display, Write as _},
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bon::Builder;
use serde_json::{Map, Value, json};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};
use tracing::info;

use super::{
    aggregate::{AggregateResult, ScoreEntry, format_points},
    criteria::Rubric,
    evaluate::CheckResult,
    lint::LinterRun,
};
use crate::{
    constants::{
        LINT_DETAILS_KEPT, LINTER_CEILING, PROJECT_DIR, REPORT_FINDINGS_SHOWN, STEP_SUMMARY_ENV,
    },
    python::{Project, SubmissionError},
};

/// Coarse band an item's score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// At least 90% of the item's points.
    Excellent,
    /// At least 70%.
    Good,
    /// Some points, but less than 70%.
    NeedsWork,
    /// No points.
    NotDone,
}

impl Status {
    /// Band for a share of points in `[0, 1]`.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.9 {
            Status::Excellent
        } else if ratio >= 0.7 {
            Status::Good
        } else if ratio > 0.0 {
            Status::NeedsWork
        } else {
            Status::NotDone
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Status::Excellent => "✅ Excellent",
            Status::Good => "👍 Good",
            Status::NeedsWork => "⚠️ Needs work",
            Status::NotDone => "❌ Not done",
        })
    }
}

/// One row of the per-item table.
#[derive(Tabled)]
struct ItemRow {
    /// Criterion id or tool name.
    #[tabled(rename = "Item")]
    item:    String,
    /// What the item checks.
    #[tabled(rename = "Requirement")]
    details: String,
    /// `achieved / maximum`.
    #[tabled(rename = "Score")]
    score:   String,
    /// Band.
    #[tabled(rename = "Status")]
    status:  Status,
}

/// One row of the totals table.
#[derive(Tabled)]
struct TotalRow {
    /// Label.
    #[tabled(rename = "Metric")]
    metric: &'static str,
    /// Value.
    #[tabled(rename = "Value")]
    value:  String,
}

/// One row of the structure table.
#[derive(Tabled)]
struct PresenceRow {
    /// Path relative to the repository root.
    #[tabled(rename = "File")]
    file:   String,
    /// Found or missing.
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Everything the markdown report is rendered from.
#[derive(Debug, Builder)]
pub struct GradeReport<'a> {
    /// The score sheet.
    result:   &'a AggregateResult,
    /// Per-criterion outcomes, in rubric order.
    checks:   &'a [CheckResult],
    /// Linter runs, in profile order.
    linters:  &'a [LinterRun],
    /// Rubric, for item descriptions.
    rubric:   &'a Rubric,
    /// Whether the project folder exists.
    #[builder(default = true)]
    has_dir:  bool,
    /// Scripts that are absent or do not parse.
    #[builder(default)]
    problems: Vec<SubmissionError>,
}

impl GradeReport<'_> {
    /// Renders the full markdown summary.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let result = self.result;

        let _ = writeln!(out, "# Playwright assignment report\n");
        let _ = writeln!(
            out,
            "## {}\n",
            if result.verdict().passed() {
                "✅ PASSED"
            } else {
                "❌ NOT PASSED"
            }
        );

        let totals = vec![
            TotalRow {
                metric: "Score",
                value:  format!(
                    "{} / {}",
                    format_points(&result.achieved()),
                    format_points(&result.maximum())
                ),
            },
            TotalRow {
                metric: "Percentage",
                value:  format!("{:.1}%", result.percentage()),
            },
            TotalRow {
                metric: "Pass threshold",
                value:  format!("{:.1}%", result.threshold()),
            },
            TotalRow {
                metric: "Verdict",
                value:  result.verdict().to_string(),
            },
        ];
        let _ = writeln!(out, "{}\n", Table::new(totals).with(Style::markdown()));

        let _ = writeln!(out, "## Results by item\n");
        let _ = writeln!(out, "{}\n", Table::new(self.item_rows()).with(Style::markdown()));

        if !self.problems.is_empty() {
            let _ = writeln!(out, "## Scripts that could not be graded\n");
            for problem in &self.problems {
                let _ = writeln!(out, "- {problem}");
            }
            out.push('\n');
        }

        let failures: Vec<&CheckResult> = self.checks.iter().filter(|c| !c.passed()).collect();
        if !failures.is_empty() {
            let _ = writeln!(out, "## What is missing\n");
            for check in failures {
                let _ = writeln!(out, "**{}**", check.criterion());
                for reason in check.reasons() {
                    let _ = writeln!(out, "- {reason}");
                }
                out.push('\n');
            }
        }

        let _ = writeln!(out, "## Linter findings\n");
        for run in self.linters {
            out.push_str(&render_findings(run));
        }

        let _ = writeln!(out, "## Recommendations\n");
        for line in recommendations(result) {
            let _ = writeln!(out, "- {line}");
        }
        out.push('\n');

        if !self.has_dir {
            out.push_str(&folder_hint());
        }

        let _ = writeln!(
            out,
            "---\n_Scripts are checked statically and are never executed. Launch calls and \
             printed values are detected by pattern, so unusual but working code may be \
             missed._"
        );

        out
    }

    /// Rows of the per-item table: criteria, then the combined linter row.
    fn item_rows(&self) -> Vec<ItemRow> {
        let tools: Vec<&str> = self.linters.iter().map(LinterRun::tool).collect();
        self.result
            .table_entries()
            .iter()
            .map(|entry| {
                let name = entry.source().name();
                let details = if entry.source().is_linter() {
                    format!(
                        "{} findings, capped at {}",
                        tools.join(" + "),
                        format_points(&self.result.linter_cap())
                    )
                } else {
                    self.rubric
                        .criteria()
                        .iter()
                        .find(|c| c.id() == name)
                        .map(|c| c.description().to_string())
                        .unwrap_or_default()
                };
                ItemRow {
                    item: name.to_string(),
                    details,
                    score: format!(
                        "{} / {}",
                        format_points(&entry.achieved()),
                        format_points(&entry.maximum())
                    ),
                    status: Status::from_ratio(entry.ratio()),
                }
            })
            .collect()
    }
}

/// Findings section for one linter, truncated to the first
/// `REPORT_FINDINGS_SHOWN` lines.
fn render_findings(run: &LinterRun) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "### {} ({} findings, score {}/{LINTER_CEILING})\n",
        run.tool(),
        run.error_count(),
        run.score()
    );

    if let Some(failure) = run.failure() {
        let _ = writeln!(out, "Could not run {}: {failure}\n", run.tool());
        return out;
    }
    if run.findings().is_empty() {
        let _ = writeln!(out, "No findings.\n");
        return out;
    }

    let diagnostics = run.diagnostics();
    if diagnostics.len() == run.error_count() {
        let shown: Vec<_> = diagnostics.into_iter().take(REPORT_FINDINGS_SHOWN).collect();
        let _ = writeln!(out, "{}", Table::new(shown).with(Style::markdown()));
    } else {
        let _ = writeln!(out, "```");
        for line in run.findings().iter().take(REPORT_FINDINGS_SHOWN) {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out, "```");
    }

    let hidden = run.error_count().saturating_sub(REPORT_FINDINGS_SHOWN);
    if hidden > 0 {
        let _ = writeln!(out, "\n... and {hidden} more");
    }
    out.push('\n');
    out
}

/// Advice derived from the weakest items.
pub fn recommendations(result: &AggregateResult) -> Vec<String> {
    let mut advice = Vec::new();
    let achieved = |name: &str| result.entry(name).map(ScoreEntry::achieved);

    if result.linter_total() < 10.0 {
        advice.push(
            "Fix the style and error findings reported by flake8 and pylint.".to_string(),
        );
    }
    if achieved("task1_imports").is_some_and(|score| score < 15.0) {
        advice.push(
            "Import the entry point with `from playwright.sync_api import sync_playwright` in \
             every run_* script."
                .to_string(),
        );
    }
    if achieved("task2_output").is_some_and(|score| score < 10.0) {
        advice.push(
            "Print the user agent, the viewport size and the page URL in info_headless.py."
                .to_string(),
        );
    }
    if advice.is_empty() {
        advice.push("Everything required is in place.".to_string());
    }
    advice
}

/// Expected layout, shown when the project folder is missing.
pub fn folder_hint() -> String {
    format!(
        "## Expected layout\n\n```\n{PROJECT_DIR}/\n├── run_chromium.py\n├── run_firefox.py\n├── \
         run_webkit.py\n└── info_headless.py\n```\n\n"
    )
}

/// Structure-only report: which required files were found.
pub fn render_structure(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Project structure\n");

    let mut rows = vec![PresenceRow {
        file:   format!("{PROJECT_DIR}/"),
        status: if project.has_dir() { "✅ found" } else { "❌ missing" },
    }];
    rows.extend(project.submissions().iter().map(|s| PresenceRow {
        file:   format!("{PROJECT_DIR}/{}", s.name()),
        status: if s.exists() { "✅ found" } else { "❌ missing" },
    }));
    let _ = writeln!(out, "{}\n", Table::new(rows).with(Style::markdown()));

    if project.all_present() {
        let _ = writeln!(out, "All required files are present.\n");
    } else {
        let missing = project.submissions().iter().filter(|s| !s.exists()).count();
        let _ = writeln!(out, "{missing} required file(s) missing.\n");
        if !project.has_dir() {
            out.push_str(&folder_hint());
        }
    }
    out
}

/// Boxed overview table for the terminal.
pub fn render_terminal(result: &AggregateResult) -> String {
    Table::new(result.table_entries())
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(format!(
            "Total: {} / {} ({:.1}%)",
            format_points(&result.achieved()),
            format_points(&result.maximum()),
            result.percentage()
        )))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(24).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// Combined score of the linter runs, before any cross cap.
pub fn lint_total(linters: &[LinterRun]) -> u32 {
    linters.iter().map(LinterRun::score).sum()
}

/// Body of `linters_result.json`: per tool `<tool>_score`, `<tool>_errors`
/// and the first few `<tool>_details`, plus `total`.
pub fn lint_summary(linters: &[LinterRun]) -> Value {
    let mut map = Map::new();
    for run in linters {
        let tool = run.tool();
        map.insert(format!("{tool}_score"), json!(run.score()));
        map.insert(format!("{tool}_errors"), json!(run.error_count()));
        let details: Vec<&String> = run.findings().iter().take(LINT_DETAILS_KEPT).collect();
        map.insert(format!("{tool}_details"), json!(details));
        if let Some(failure) = run.failure() {
            map.insert(format!("{tool}_failure"), json!(failure));
        }
    }
    map.insert("total".into(), json!(lint_total(linters)));
    Value::Object(map)
}

/// Writes `markdown` to the CI step summary when `GITHUB_STEP_SUMMARY`
/// names an existing file (appending), otherwise to `fallback`.
pub fn publish(markdown: &str, fallback: &Path) -> Result<PathBuf> {
    let step_summary = std::env::var_os(STEP_SUMMARY_ENV)
        .map(PathBuf::from)
        .filter(|path| path.exists());
    publish_to(markdown, step_summary.as_deref(), fallback)
}

/// Appends to `step_summary` if given, else overwrites `fallback`.
pub fn publish_to(markdown: &str, step_summary: Option<&Path>, fallback: &Path) -> Result<PathBuf> {
    match step_summary {
        Some(path) => {
            let mut file = OpenOptions::new()
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(markdown.as_bytes())
                .with_context(|| format!("Failed to append to {}", path.display()))?;
            info!(path = %path.display(), "appended report to step summary");
            Ok(path.to_path_buf())
        }
        None => {
            std::fs::write(fallback, markdown)
                .with_context(|| format!("Failed to write {}", fallback.display()))?;
            info!(path = %fallback.display(), "wrote report");
            Ok(fallback.to_path_buf())
        }
    }
}
