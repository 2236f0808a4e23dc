#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Folder inside the repository root that holds the student's scripts.
pub const PROJECT_DIR: &str = "you_playwright";

/// Scripts every submission must contain, in manifest order.
pub const REQUIRED_FILES: [&str; 4] = [
    "run_chromium.py",
    "run_firefox.py",
    "run_webkit.py",
    "info_headless.py",
];

/// Default location of the grading policy file, relative to the root.
pub const DEFAULT_TASKS_PATH: &str = ".github/tasks.json";

/// Environment variable that overrides the grading policy file location.
pub const TASKS_PATH_ENV: &str = "PWGRADE_TASKS";

/// Environment variable pointing at the CI step summary file.
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

/// Report written when no step summary is available.
pub const SUMMARY_FILE: &str = "SUMMARY.md";

/// Machine-readable linter results written by the `lint` command.
pub const LINTERS_RESULT_FILE: &str = "linters_result.json";

/// Reason attached to every criterion of a missing artifact.
pub const ARTIFACT_ABSENT: &str = "artifact absent";

/// Module the scripts must import the Playwright entry point from.
pub const SYNC_API_MODULE: &str = "playwright.sync_api";

/// Symbol the scripts must bind from [`SYNC_API_MODULE`].
pub const SYNC_PLAYWRIGHT: &str = "sync_playwright";

/// Points a single linter can award before the cross-tool cap applies.
pub const LINTER_CEILING: u32 = 10;

/// Item name of the combined linter row in score tables.
pub const LINTERS_ROW: &str = "linters";

/// Combined linter score the `lint` command requires for a zero exit status.
pub const LINT_PASS_TOTAL: u32 = 12;

/// Number of findings per tool kept in `linters_result.json`.
pub const LINT_DETAILS_KEPT: usize = 3;

/// Number of findings per tool listed in the markdown report.
pub const REPORT_FINDINGS_SHOWN: usize = 25;

/// Default timeout for a single linter invocation, in seconds.
pub const DEFAULT_LINT_TIMEOUT_SECS: u64 = 30;
