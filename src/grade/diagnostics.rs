#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Structured view of a single linter finding.

use std::path::Path;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A `path:line:col: CODE message` finding from flake8 or pylint.
#[derive(Tabled, Serialize, Deserialize, Builder, Clone, Debug, PartialEq, Eq)]
#[builder(on(String, into))]
pub struct LintDiagnostic {
    /// Path as printed by the tool.
    #[tabled(rename = "File")]
    path:        String,
    /// File name only.
    #[tabled(skip)]
    file_name:   String,
    /// 1-based line number.
    #[tabled(rename = "Line")]
    line_number: u32,
    /// Column as printed by the tool (flake8 is 1-based, pylint 0-based).
    #[tabled(skip)]
    column:      u32,
    /// Message id, e.g. `E302` or `E0401`.
    #[tabled(rename = "Code")]
    code:        String,
    /// The message text.
    #[tabled(rename = "Message")]
    message:     String,
    /// Severity derived from the message id.
    #[tabled(rename = "Severity")]
    severity:    DiagnosticSeverity,
}

impl LintDiagnostic {
    /// Returns the path as printed by the tool.
    pub fn path(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Returns the file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the line number.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Returns the column.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the message id.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the severity.
    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }
}

impl std::fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} {}",
            self.file_name, self.line_number, self.code, self.message
        )
    }
}

/// Severity of a linter finding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DiagnosticSeverity {
    /// `E`/`F` message ids.
    #[default]
    Error,
    /// `W` message ids.
    Warning,
    /// Convention, refactor and complexity ids.
    Info,
}

impl DiagnosticSeverity {
    /// Classifies a message id by its leading letter.
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('E' | 'F') => DiagnosticSeverity::Error,
            Some('W') => DiagnosticSeverity::Warning,
            _ => DiagnosticSeverity::Info,
        }
    }

    /// Returns the string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "ERROR",
            DiagnosticSeverity::Warning => "WARNING",
            DiagnosticSeverity::Info => "INFO",
        }
    }

    /// Returns true if this is an error.
    pub fn is_error(self) -> bool {
        matches!(self, DiagnosticSeverity::Error)
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
