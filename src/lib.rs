//! # pwgrade
//!
//! A static autograder for Playwright browser-automation homework. Scripts
//! are checked against a rubric of structural patterns, linted with flake8
//! and pylint, and folded into one weighted score and verdict. Submitted code
//! is never executed.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Grading policy loaded from `tasks.json`.
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// For all things related to grading
pub mod grade;
/// For all parsers used
pub mod parsers;
/// Linter process invocation
pub mod process;
/// Discovering and parsing the submitted scripts
pub mod python;
