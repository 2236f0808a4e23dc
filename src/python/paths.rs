#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Workspace path configuration for a graded repository.

use std::path::{Path, PathBuf};

use bon::builder;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_TASKS_PATH, LINTERS_RESULT_FILE, PROJECT_DIR, SUMMARY_FILE, TASKS_PATH_ENV,
};

/// Represents the paths a grading run reads from and writes to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Root of the student's repository.
    root_dir:     PathBuf,
    /// Folder holding the required scripts.
    project_dir:  PathBuf,
    /// Grading policy file.
    tasks_file:   PathBuf,
    /// Fallback markdown report location.
    summary_file: PathBuf,
    /// Linter results written by the `lint` command.
    lint_file:    PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl ProjectPaths {
    /// Creates the default layout rooted at `root_dir`.
    pub fn new(root_dir: PathBuf) -> Self {
        Self::build_with_defaults(root_dir, None, None)
    }

    /// Construct paths from optional overrides.
    pub fn from_parts(
        root_dir: PathBuf,
        project_dir: Option<PathBuf>,
        tasks_file: Option<PathBuf>,
    ) -> Self {
        Self::build_with_defaults(root_dir, project_dir, tasks_file)
    }

    /// Fills unset paths with defaults. The tasks file honours
    /// `PWGRADE_TASKS` before falling back to `.github/tasks.json`.
    fn build_with_defaults(
        root_dir: PathBuf,
        project_dir: Option<PathBuf>,
        tasks_file: Option<PathBuf>,
    ) -> Self {
        let project_dir = project_dir.unwrap_or_else(|| root_dir.join(PROJECT_DIR));
        let tasks_file = tasks_file
            .or_else(|| std::env::var_os(TASKS_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| root_dir.join(DEFAULT_TASKS_PATH));

        Self {
            summary_file: root_dir.join(SUMMARY_FILE),
            lint_file: root_dir.join(LINTERS_RESULT_FILE),
            root_dir,
            project_dir,
            tasks_file,
        }
    }

    /// Root directory of the repository.
    pub fn root_dir(&self) -> &Path {
        self.root_dir.as_path()
    }

    /// Folder holding the required scripts.
    pub fn project_dir(&self) -> &Path {
        self.project_dir.as_path()
    }

    /// Grading policy file.
    pub fn tasks_file(&self) -> &Path {
        self.tasks_file.as_path()
    }

    /// Fallback markdown report location.
    pub fn summary_file(&self) -> &Path {
        self.summary_file.as_path()
    }

    /// Where `linters_result.json` is written.
    pub fn lint_file(&self) -> &Path {
        self.lint_file.as_path()
    }
}

/// Builder-friendly constructor for `ProjectPaths` with optional overrides.
#[builder(finish_fn = build)]
pub fn project_paths(
    #[builder(into)] root_dir: PathBuf,
    project_dir: Option<PathBuf>,
    tasks_file: Option<PathBuf>,
) -> ProjectPaths {
    ProjectPaths::build_with_defaults(root_dir, project_dir, tasks_file)
}
