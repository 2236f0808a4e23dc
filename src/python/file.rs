#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! A required artifact of a submission and its parse state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use super::parser::Parser;

/// Why an artifact could not be turned into a syntax tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The file is not in the project folder.
    #[error("{file_name} is missing")]
    Absent {
        /// Name of the missing file.
        file_name: String,
    },
    /// The file exists but is not valid Python.
    #[error("syntax error in {file_name} at line {line}")]
    Syntax {
        /// Name of the file with the error.
        file_name: String,
        /// 1-based line of the first error node, 0 if the file was unreadable.
        line:      usize,
    },
}

/// The tri-state every artifact is loaded into.
#[derive(Debug, Clone)]
enum SourceState {
    /// No file with the required name exists.
    Absent,
    /// The file exists but did not parse; only its text is available.
    Unparseable {
        /// Raw file contents.
        code: String,
        /// 1-based line of the first syntax error.
        line: usize,
    },
    /// The file parsed cleanly.
    Parsed(Parser),
}

/// What the pattern checkers get to see of a present artifact.
#[derive(Debug, Clone, Copy)]
pub struct SourceView<'a> {
    /// Raw source text.
    pub code: &'a str,
    /// The syntax tree, or the line where parsing failed.
    pub tree: TreeView<'a>,
}

/// Syntax tree access for tree-based checks.
#[derive(Debug, Clone, Copy)]
pub enum TreeView<'a> {
    /// A clean parse.
    Parsed(&'a Parser),
    /// Parsing failed at this 1-based line.
    Failed {
        /// Line of the first syntax error.
        line: usize,
    },
}

/// One required artifact (a named script) of the submission under grading.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Required file name, e.g. `run_chromium.py`.
    name:  String,
    /// Where the file was looked up.
    path:  PathBuf,
    /// What was found there.
    state: SourceState,
}

impl Submission {
    /// Loads the artifact `name` from `dir`. A missing file is not an error;
    /// it yields an absent submission.
    pub fn load(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(name);
        if !path.is_file() {
            debug!(file = name, "artifact absent");
            return Ok(Self {
                name: name.to_string(),
                path,
                state: SourceState::Absent,
            });
        }

        let state = match std::fs::read(&path) {
            Ok(bytes) => Self::state_from_source(String::from_utf8_lossy(&bytes).into_owned())
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Err(err) => {
                warn!(file = name, error = %err, "artifact exists but could not be read");
                SourceState::Unparseable {
                    code: String::new(),
                    line: 0,
                }
            }
        };

        Ok(Self {
            name: name.to_string(),
            path,
            state,
        })
    }

    /// Builds a present submission straight from source text.
    pub fn from_source(name: impl Into<String>, code: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Ok(Self {
            path: PathBuf::from(&name),
            state: Self::state_from_source(code.into())?,
            name,
        })
    }

    /// Builds an absent submission.
    pub fn absent(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            state: SourceState::Absent,
            name,
        }
    }

    /// Parses `code` and classifies it as parsed or unparseable.
    fn state_from_source(code: String) -> Result<SourceState> {
        let parser = Parser::new(code)?;
        Ok(match parser.first_error_line() {
            None => SourceState::Parsed(parser),
            Some(line) => SourceState::Unparseable {
                code: parser.code().to_string(),
                line,
            },
        })
    }

    /// Returns the required file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the path the file was looked up at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file exists.
    pub fn exists(&self) -> bool {
        !matches!(self.state, SourceState::Absent)
    }

    /// Raw source text, if the file exists.
    pub fn code(&self) -> Option<&str> {
        match &self.state {
            SourceState::Absent => None,
            SourceState::Unparseable { code, .. } => Some(code),
            SourceState::Parsed(parser) => Some(parser.code()),
        }
    }

    /// The syntax tree, if the file parsed cleanly.
    pub fn parser(&self) -> Option<&Parser> {
        match &self.state {
            SourceState::Parsed(parser) => Some(parser),
            _ => None,
        }
    }

    /// Returns a view for the pattern checkers, or `None` when absent.
    pub fn view(&self) -> Option<SourceView<'_>> {
        match &self.state {
            SourceState::Absent => None,
            SourceState::Unparseable { code, line } => Some(SourceView {
                code,
                tree: TreeView::Failed { line: *line },
            }),
            SourceState::Parsed(parser) => Some(SourceView {
                code: parser.code(),
                tree: TreeView::Parsed(parser),
            }),
        }
    }

    /// Returns the reason this artifact has no syntax tree, if any.
    pub fn error(&self) -> Option<SubmissionError> {
        match &self.state {
            SourceState::Absent => Some(SubmissionError::Absent {
                file_name: self.name.clone(),
            }),
            SourceState::Unparseable { line, .. } => Some(SubmissionError::Syntax {
                file_name: self.name.clone(),
                line:      *line,
            }),
            SourceState::Parsed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python2_print_is_unparseable() {
        let code = "from playwright.sync_api import sync_playwright\nprint \"hi\"\nexec \"x=1\"\n";
        let submission = Submission::from_source("run_chromium.py", code).expect("load");

        assert!(submission.parser().is_none());
        assert_eq!(
            submission.error(),
            Some(SubmissionError::Syntax {
                file_name: "run_chromium.py".into(),
                line:      2,
            })
        );
    }

    #[test]
    fn classifies_source_into_tri_state() {
        let parsed = Submission::from_source("ok.py", "print('hi')\n").expect("load");
        assert!(parsed.parser().is_some());
        assert!(parsed.error().is_none());

        let broken = Submission::from_source("bad.py", "def f(:\n").expect("load");
        assert!(broken.exists());
        assert!(broken.parser().is_none());
        assert_eq!(broken.code(), Some("def f(:\n"));
        assert_eq!(
            broken.error(),
            Some(SubmissionError::Syntax {
                file_name: "bad.py".into(),
                line:      1,
            })
        );

        let absent = Submission::absent("gone.py");
        assert!(!absent.exists());
        assert!(absent.view().is_none());
    }
}
