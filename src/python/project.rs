#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The set of required artifacts loaded for one grading run.

use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::info;

use super::{
    file::{Submission, SubmissionError},
    paths::ProjectPaths,
};
use crate::constants::REQUIRED_FILES;

/// A student project: the manifest of required scripts and what was found
/// for each of them. Built once per run and never mutated.
#[derive(Debug, Clone)]
pub struct Project {
    /// Workspace paths associated with this project.
    paths:       ProjectPaths,
    /// Whether the project folder itself exists.
    has_dir:     bool,
    /// One entry per manifest name, in manifest order.
    submissions: Vec<Submission>,
}

impl Project {
    /// Loads the default manifest using the given paths.
    pub fn from_paths(paths: ProjectPaths) -> Result<Self> {
        Self::with_manifest(paths, REQUIRED_FILES)
    }

    /// Loads every name in `manifest` from the project folder. A missing
    /// folder makes every artifact absent.
    pub fn with_manifest<I, S>(paths: ProjectPaths, manifest: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dir = paths.project_dir();
        let has_dir = dir.is_dir();

        let submissions = manifest
            .into_iter()
            .map(|name| {
                if has_dir {
                    Submission::load(dir, name.as_ref())
                } else {
                    Ok(Submission::absent(name.as_ref()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            dir = %dir.display(),
            found = submissions.iter().filter(|s| s.exists()).count(),
            required = submissions.len(),
            "loaded submission"
        );

        Ok(Self {
            paths,
            has_dir,
            submissions,
        })
    }

    /// Looks up the submission for a required file name. Accepts the name
    /// with or without the `.py` suffix.
    pub fn identify(&self, name: &str) -> Result<&Submission> {
        if let Some(found) = self.submissions.iter().find(|s| s.name() == name) {
            Ok(found)
        } else if let Some(found) = self
            .submissions
            .iter()
            .find(|s| s.name().trim_end_matches(".py") == name)
        {
            Ok(found)
        } else {
            bail!("{} is not part of the required manifest", name)
        }
    }

    /// Returns the submissions in manifest order.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Why each unusable artifact could not be parsed, in manifest order.
    pub fn problems(&self) -> Vec<SubmissionError> {
        self.submissions.iter().filter_map(Submission::error).collect()
    }

    /// Whether the project folder exists.
    pub fn has_dir(&self) -> bool {
        self.has_dir
    }

    /// Whether every required file exists.
    pub fn all_present(&self) -> bool {
        self.has_dir && self.submissions.iter().all(Submission::exists)
    }

    /// Paths of the files that exist, for handing to linters.
    pub fn present_paths(&self) -> Vec<PathBuf> {
        self.submissions
            .iter()
            .filter(|s| s.exists())
            .map(|s| s.path().to_path_buf())
            .collect()
    }

    /// Returns the workspace paths.
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }
}
