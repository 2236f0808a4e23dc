#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Linter profiles, raw linter findings and the saturating score mapper.

use serde::{Deserialize, Serialize};

use super::diagnostics::LintDiagnostic;
use crate::{constants::LINTER_CEILING, parsers::parser};

/// Maps an error count to `max(0, ceiling - error_count / divisor)`.
///
/// A divisor of 0 is treated as 1.
pub fn map_score(error_count: usize, ceiling: u32, divisor: u32) -> u32 {
    let penalty = error_count / divisor.max(1) as usize;
    (ceiling as usize).saturating_sub(penalty) as u32
}

/// The supported linters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinterKind {
    /// PEP 8 style checker; every output line is a finding.
    Flake8,
    /// Pylint restricted to error and fatal messages.
    Pylint,
}

/// How one linter is invoked and scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterProfile {
    /// Which linter this is.
    kind:    LinterKind,
    /// Executable looked up on `PATH`.
    program: String,
    /// Arguments placed before the file list.
    args:    Vec<String>,
    /// Errors that cost one point.
    divisor: u32,
}

impl LinterProfile {
    /// flake8, one point per two findings.
    pub fn flake8() -> Self {
        Self {
            kind:    LinterKind::Flake8,
            program: "flake8".into(),
            args:    vec!["--exit-zero".into()],
            divisor: 2,
        }
    }

    /// pylint errors only, one point per finding.
    pub fn pylint() -> Self {
        Self {
            kind:    LinterKind::Pylint,
            program: "pylint".into(),
            args:    [
                "--exit-zero",
                "--output-format=text",
                "--score=no",
                "--disable=all",
                "--enable=E,F",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            divisor: 1,
        }
    }

    /// Both profiles, in report order.
    pub fn defaults() -> Vec<Self> {
        vec![Self::flake8(), Self::pylint()]
    }

    /// Replaces the executable name.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Returns the linter kind.
    pub fn kind(&self) -> LinterKind {
        self.kind
    }

    /// Tool name used in reports and score entries.
    pub fn name(&self) -> &'static str {
        match self.kind {
            LinterKind::Flake8 => "flake8",
            LinterKind::Pylint => "pylint",
        }
    }

    /// Returns the executable name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the leading arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the divisor.
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Whether a line of tool output counts as a finding.
    ///
    /// pylint prints `************* Module x` headers between findings; only
    /// lines carrying an `E`/`F` message id (or the legacy `E:`/`F:` prefix)
    /// count.
    pub fn is_finding(&self, line: &str) -> bool {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return false;
        }

        match self.kind {
            LinterKind::Flake8 => true,
            LinterKind::Pylint => {
                if line.starts_with("E:") || line.starts_with("F:") {
                    return true;
                }
                parser::finding(line)
                    .map(|diag| diag.code().starts_with(['E', 'F']))
                    .unwrap_or(false)
            }
        }
    }

    /// Splits raw tool output into the ordered finding lines.
    pub fn findings_from_output(&self, stdout: &str) -> Vec<String> {
        stdout
            .lines()
            .filter(|line| self.is_finding(line))
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

/// One linter's findings against the whole submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterRun {
    /// Tool name.
    tool:     String,
    /// Finding lines in the order the tool printed them.
    findings: Vec<String>,
    /// Errors that cost one point, taken from the profile.
    divisor:  u32,
    /// Set when the tool could not be run; the run then scores 0.
    failure:  Option<String>,
}

impl LinterRun {
    /// A completed run.
    pub fn new(profile: &LinterProfile, findings: Vec<String>) -> Self {
        Self {
            tool: profile.name().to_string(),
            findings,
            divisor: profile.divisor(),
            failure: None,
        }
    }

    /// A run that could not be completed. It has no findings and scores 0.
    pub fn failed(profile: &LinterProfile, reason: impl Into<String>) -> Self {
        Self {
            tool:     profile.name().to_string(),
            findings: Vec::new(),
            divisor:  profile.divisor(),
            failure:  Some(reason.into()),
        }
    }

    /// Returns the tool name.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Returns the finding lines.
    pub fn findings(&self) -> &[String] {
        &self.findings
    }

    /// Number of findings. Duplicates count.
    pub fn error_count(&self) -> usize {
        self.findings.len()
    }

    /// Returns the divisor.
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Why the tool could not be run, if it could not.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Mapped score in `[0, LINTER_CEILING]`.
    pub fn score(&self) -> u32 {
        if self.failure.is_some() {
            0
        } else {
            map_score(self.error_count(), LINTER_CEILING, self.divisor)
        }
    }

    /// Findings that parse as `path:line:col: CODE message`.
    pub fn diagnostics(&self) -> Vec<LintDiagnostic> {
        self.findings
            .iter()
            .filter_map(|line| parser::finding(line).ok())
            .collect()
    }
}
