#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Loading and parsing the submitted Python scripts.

/// Required artifacts and their parse state.
pub mod file;
/// Tree-sitter parser wrapper.
pub mod parser;
/// Workspace path configuration.
pub mod paths;
/// The manifest-driven project loader.
pub mod project;

pub use file::{SourceView, Submission, SubmissionError, TreeView};
pub use parser::{FromImport, Parser};
pub use paths::ProjectPaths;
pub use project::Project;
