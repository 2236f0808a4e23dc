//! Tests for linter output parsing and the score mapper.

use pwgrade::{
    grade::{DiagnosticSeverity, LinterProfile, LinterRun, map_score},
    parsers::parser,
};

const FLAKE8_OUTPUT: &str = "\
you_playwright/run_chromium.py:1:1: F401 'os' imported but unused
you_playwright/run_chromium.py:4:1: E302 expected 2 blank lines, found 1
you_playwright/run_firefox.py:9:80: E501 line too long (88 > 79 characters)
you_playwright/info_headless.py:12:1: W391 blank line at end of file
you_playwright/info_headless.py:3:5: E111 indentation is not a multiple of 4
you_playwright/info_headless.py:3:5: E111 indentation is not a multiple of 4
you_playwright/run_webkit.py:2:1: E265 block comment should start with '# '
";

#[test]
fn flake8_duplicates_count_and_halve() {
    let profile = LinterProfile::flake8();
    let run = LinterRun::new(&profile, profile.findings_from_output(FLAKE8_OUTPUT));

    assert_eq!(run.error_count(), 7);
    assert_eq!(run.score(), 7);
    assert_eq!(
        run.findings()[0],
        "you_playwright/run_chromium.py:1:1: F401 'os' imported but unused"
    );
}

#[test]
fn pylint_counts_each_error() {
    let output = (1..=25)
        .map(|i| format!("you_playwright/run_chromium.py:{i}:0: E1101: Instance has no member"))
        .collect::<Vec<_>>()
        .join("\n");
    let profile = LinterProfile::pylint();
    let run = LinterRun::new(&profile, profile.findings_from_output(&output));

    assert_eq!(run.error_count(), 25);
    assert_eq!(run.score(), 0);
}

#[test]
fn zero_findings_score_the_ceiling() {
    for profile in LinterProfile::defaults() {
        let run = LinterRun::new(&profile, profile.findings_from_output("\n"));
        assert_eq!(run.score(), 10, "{}", run.tool());
    }
}

#[test]
fn mapper_never_rises_with_more_errors() {
    let scores: Vec<u32> = (0..40).map(|e| map_score(e, 10, 2)).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(scores.last(), Some(&0));
}

#[test]
fn parses_flake8_finding() {
    let diag =
        parser::finding("you_playwright/run_firefox.py:9:80: E501 line too long (88 > 79 characters)")
            .expect("parse flake8 line");

    assert_eq!(diag.file_name(), "run_firefox.py");
    assert_eq!(diag.line_number(), 9);
    assert_eq!(diag.column(), 80);
    assert_eq!(diag.code(), "E501");
    assert_eq!(diag.message(), "line too long (88 > 79 characters)");
    assert_eq!(diag.severity(), DiagnosticSeverity::Error);

    assert_eq!(diag.to_string(), "run_firefox.py:9: E501 line too long (88 > 79 characters)");
}

#[test]
fn parses_pylint_finding() {
    let diag = parser::finding(
        "you_playwright/info_headless.py:1:0: E0401: Unable to import 'playwright.sync_api' \
         (import-error)",
    )
    .expect("parse pylint line");

    assert_eq!(diag.code(), "E0401");
    assert_eq!(diag.column(), 0);
    assert!(diag.message().starts_with("Unable to import"));
}

#[test]
fn warnings_are_not_errors() {
    let diag = parser::finding("a.py:1:1: W391 blank line at end of file").expect("parse");
    assert_eq!(diag.severity(), DiagnosticSeverity::Warning);
    assert!(!diag.severity().is_error());
    assert!(parser::finding("************* Module run_chromium").is_err());
}
