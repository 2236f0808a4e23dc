#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grading policy: weights, ceilings and thresholds.
//!
//! The policy is loaded once at startup and passed by reference into the
//! scoring code. Nothing in `grade` reads files or the environment.

use std::{collections::BTreeMap, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{constants::DEFAULT_LINT_TIMEOUT_SECS, grade::criteria::Rubric};

/// Default maximum total score.
const DEFAULT_MAX_TOTAL: f64 = 100.0;

/// Default pass threshold, in percent.
const DEFAULT_PASSING_SCORE: f64 = 70.0;

/// Default cap on the combined linter contribution.
const DEFAULT_LINTER_CAP: f64 = 15.0;

/// On-disk shape of the policy file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct RawTasks {
    /// Maximum total score.
    max_total_score:   Option<f64>,
    /// Pass threshold in percent.
    passing_score:     Option<f64>,
    /// Per-criterion weight overrides.
    weights:           Option<BTreeMap<String, f64>>,
    /// Cap on the combined linter contribution.
    linter_cap:        Option<f64>,
    /// Linter timeout in seconds.
    lint_timeout_secs: Option<u64>,
}

/// Resolved grading policy.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingConfig {
    /// Maximum total score; always positive.
    max_total_score: f64,
    /// Pass threshold in percent, within `[0, 100]`.
    passing_score:   f64,
    /// Weight per criterion id; all non-negative.
    weights:         BTreeMap<String, f64>,
    /// Cap on the combined linter contribution; non-negative.
    linter_cap:      f64,
    /// Timeout for each linter invocation.
    lint_timeout:    Duration,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self::for_rubric(&Rubric::default())
    }
}

impl GradingConfig {
    /// Defaults with weights taken from the rubric's declared maxima.
    pub fn for_rubric(rubric: &Rubric) -> Self {
        Self {
            max_total_score: DEFAULT_MAX_TOTAL,
            passing_score:   DEFAULT_PASSING_SCORE,
            weights:         rubric
                .criteria()
                .iter()
                .map(|c| (c.id().to_string(), c.max_score()))
                .collect(),
            linter_cap:      DEFAULT_LINTER_CAP,
            lint_timeout:    Duration::from_secs(DEFAULT_LINT_TIMEOUT_SECS),
        }
    }

    /// Loads the policy file at `path`. A missing or malformed file, or any
    /// missing or out-of-range key, falls back to the defaults for `rubric`.
    pub fn load(path: &Path, rubric: &Rubric) -> Self {
        let defaults = Self::for_rubric(rubric);

        if !path.exists() {
            warn!(path = %path.display(), "grading policy not found, using defaults");
            return defaults;
        }

        match Self::read_raw(path) {
            Ok(raw) => {
                info!(path = %path.display(), "loaded grading policy");
                defaults.merge(raw)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %format!("{err:#}"), "ignoring unreadable grading policy");
                defaults
            }
        }
    }

    /// Parses a policy from a JSON string, falling back to defaults for
    /// anything absent or invalid.
    pub fn from_json(json: &str, rubric: &Rubric) -> Result<Self> {
        let raw: RawTasks = serde_json::from_str(json).context("Failed to parse grading policy")?;
        Ok(Self::for_rubric(rubric).merge(raw))
    }

    /// Reads and deserializes the policy file.
    fn read_raw(path: &Path) -> Result<RawTasks> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Overlays the keys present in `raw` onto `self`.
    fn merge(mut self, raw: RawTasks) -> Self {
        match raw.max_total_score {
            Some(max) if max.is_finite() && max > 0.0 => self.max_total_score = max,
            Some(max) => warn!(max, "max_total_score must be positive, using default"),
            None => {}
        }

        match raw.passing_score {
            Some(pass) if (0.0..=100.0).contains(&pass) => self.passing_score = pass,
            Some(pass) => warn!(pass, "passing_score must be within 0..=100, using default"),
            None => {}
        }

        match raw.linter_cap {
            Some(cap) if cap.is_finite() && cap >= 0.0 => self.linter_cap = cap,
            Some(cap) => warn!(cap, "linter_cap must be non-negative, using default"),
            None => {}
        }

        if let Some(secs) = raw.lint_timeout_secs.filter(|s| *s > 0) {
            self.lint_timeout = Duration::from_secs(secs);
        }

        for (id, weight) in raw.weights.unwrap_or_default() {
            if weight.is_finite() && weight >= 0.0 {
                self.weights.insert(id, weight);
            } else {
                warn!(criterion = %id, weight, "weights must be non-negative, using default");
            }
        }

        let declared = self.weights.values().sum::<f64>() + self.linter_cap;
        if (declared - self.max_total_score).abs() > f64::EPSILON {
            warn!(
                declared,
                max_total_score = self.max_total_score,
                "criterion weights plus linter cap do not add up to the maximum total"
            );
        }

        self
    }

    /// Maximum total score.
    pub fn max_total_score(&self) -> f64 {
        self.max_total_score
    }

    /// Pass threshold in percent.
    pub fn passing_score(&self) -> f64 {
        self.passing_score
    }

    /// Weight for a criterion; unknown criteria weigh nothing.
    pub fn weight(&self, criterion: &str) -> f64 {
        self.weights.get(criterion).copied().unwrap_or(0.0)
    }

    /// All configured weights.
    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    /// Cap on the combined linter contribution.
    pub fn linter_cap(&self) -> f64 {
        self.linter_cap
    }

    /// Timeout for each linter invocation.
    pub fn lint_timeout(&self) -> Duration {
        self.lint_timeout
    }

    /// Returns a copy with a different pass threshold, clamped to `[0, 100]`.
    pub fn with_passing_score(mut self, passing_score: f64) -> Self {
        self.passing_score = passing_score.clamp(0.0, 100.0);
        self
    }

    /// Returns a copy with a different linter cap.
    pub fn with_linter_cap(mut self, cap: f64) -> Self {
        self.linter_cap = cap.max(0.0);
        self
    }
}
