#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Folds criterion outcomes and linter scores into one weighted verdict.
//!
//! Everything here is a pure function of its inputs. The configuration is
//! passed in explicitly; nothing is read from disk or the environment.

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{evaluate::CheckResult, lint::LinterRun};
use crate::{
    config::GradingConfig,
    constants::{LINTER_CEILING, LINTERS_ROW},
};

/// What a score entry was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ScoreSource {
    /// A rubric criterion, by id.
    Criterion(String),
    /// A linter, by tool name.
    Linter(String),
}

impl ScoreSource {
    /// The criterion id or tool name.
    pub fn name(&self) -> &str {
        match self {
            ScoreSource::Criterion(name) | ScoreSource::Linter(name) => name,
        }
    }

    /// Whether this entry came from a linter.
    pub fn is_linter(&self) -> bool {
        matches!(self, ScoreSource::Linter(_))
    }
}

impl Display for ScoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of the score sheet.
#[derive(Debug, Clone, PartialEq, Builder, Tabled, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Criterion or tool this entry is for.
    #[tabled(rename = "Item")]
    source:   ScoreSource,
    /// Points awarded, within `[0, maximum]`.
    #[tabled(rename = "Score", display = "format_points")]
    achieved: f64,
    /// Points available.
    #[tabled(rename = "Out Of", display = "format_points")]
    maximum:  f64,
}

impl ScoreEntry {
    /// Returns the source.
    pub fn source(&self) -> &ScoreSource {
        &self.source
    }

    /// Returns the points awarded.
    pub fn achieved(&self) -> f64 {
        self.achieved
    }

    /// Returns the points available.
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Share of the maximum that was awarded, in `[0, 1]`. An entry worth
    /// nothing counts as fully earned.
    pub fn ratio(&self) -> f64 {
        if self.maximum > 0.0 {
            self.achieved / self.maximum
        } else {
            1.0
        }
    }
}

/// Renders points without a trailing `.0` for whole numbers.
pub fn format_points(points: &f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        format!("{points:.1}")
    }
}

/// Pass or fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The percentage reached the threshold.
    Pass,
    /// The percentage fell short of the threshold.
    Fail,
}

impl Verdict {
    /// Whether this is a pass.
    pub fn passed(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// The final score sheet of a grading run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Criteria first, then linters, each in input order.
    entries:    Vec<ScoreEntry>,
    /// Total points awarded, never above `maximum`.
    achieved:   f64,
    /// The configured maximum total.
    maximum:    f64,
    /// Cap on the combined linter contribution.
    linter_cap: f64,
    /// `achieved / maximum * 100`, one decimal.
    percentage: f64,
    /// Pass threshold in percent.
    threshold:  f64,
    /// Outcome.
    verdict:    Verdict,
}

impl AggregateResult {
    /// Returns the score entries.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Looks up the entry for a criterion id or tool name.
    pub fn entry(&self, name: &str) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.source.name() == name)
    }

    /// Criterion entries only.
    pub fn criterion_entries(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter().filter(|e| !e.source.is_linter())
    }

    /// Linter entries only.
    pub fn linter_entries(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter().filter(|e| e.source.is_linter())
    }

    /// Combined linter contribution after the cross cap.
    pub fn linter_total(&self) -> f64 {
        self.linter_entries().map(ScoreEntry::achieved).sum()
    }

    /// Returns the cap on the combined linter contribution.
    pub fn linter_cap(&self) -> f64 {
        self.linter_cap
    }

    /// Rows for score tables: every criterion, then a single linter row
    /// worth the cap. The row maxima add up to the weights plus the cap.
    pub fn table_entries(&self) -> Vec<ScoreEntry> {
        let mut rows: Vec<ScoreEntry> = self.criterion_entries().cloned().collect();
        rows.push(ScoreEntry {
            source:   ScoreSource::Linter(LINTERS_ROW.to_string()),
            achieved: self.linter_total(),
            maximum:  self.linter_cap,
        });
        rows
    }

    /// Returns the total points awarded.
    pub fn achieved(&self) -> f64 {
        self.achieved
    }

    /// Returns the maximum total.
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Returns the percentage.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Returns the pass threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the verdict.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }
}

/// Rounds to one decimal place, halves away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes the score sheet.
///
/// A passed criterion earns its configured weight, a failed one earns 0.
/// Each linter earns its mapped score, reduced so that the running linter
/// sum never exceeds the configured cap. Every linter entry is out of
/// `LINTER_CEILING`.
pub fn aggregate(
    checks: &[CheckResult],
    linters: &[LinterRun],
    config: &GradingConfig,
) -> AggregateResult {
    let mut entries = Vec::with_capacity(checks.len() + linters.len());

    for check in checks {
        let weight = config.weight(check.criterion());
        entries.push(
            ScoreEntry::builder()
                .source(ScoreSource::Criterion(check.criterion().to_string()))
                .achieved(if check.passed() { weight } else { 0.0 })
                .maximum(weight)
                .build(),
        );
    }

    let linter_cap = config.linter_cap();
    let mut remaining_cap = linter_cap;
    for run in linters {
        let earned = f64::from(run.score()).min(remaining_cap);
        remaining_cap -= earned;
        entries.push(
            ScoreEntry::builder()
                .source(ScoreSource::Linter(run.tool().to_string()))
                .achieved(earned)
                .maximum(f64::from(LINTER_CEILING))
                .build(),
        );
    }

    let maximum = config.max_total_score();
    let achieved = entries
        .iter()
        .map(ScoreEntry::achieved)
        .sum::<f64>()
        .min(maximum);
    let percentage = round_one_decimal(achieved / maximum * 100.0);
    let threshold = config.passing_score();
    let verdict = if percentage >= threshold {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    AggregateResult {
        entries,
        achieved,
        maximum,
        linter_cap,
        percentage,
        threshold,
        verdict,
    }
}
