//! Tests for criterion evaluation over whole submissions.

use std::{cell::Cell, path::PathBuf};

use pwgrade::{
    grade::{
        Check, CheckOutcome, CheckResult, Composition, Criterion, Evaluator, PatternChecker,
        Rubric, StaticChecker, Target,
    },
    python::{Project, ProjectPaths, SourceView, Submission},
};

fn fixture_root(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("python")
        .join(name)
}

fn project_for(name: &str) -> Project {
    let root = fixture_root(name);
    let tasks = root.join("tasks.json");
    Project::from_paths(ProjectPaths::from_parts(root, None, Some(tasks))).expect("build project")
}

fn result_for<'a>(results: &'a [CheckResult], id: &str) -> &'a CheckResult {
    results
        .iter()
        .find(|r| r.criterion() == id)
        .unwrap_or_else(|| panic!("no result for {id}"))
}

/// Counts calls and delegates to the real checker.
#[derive(Default)]
struct CountingChecker {
    calls: Cell<usize>,
}

impl PatternChecker for CountingChecker {
    fn run(&self, check: Check, source: &SourceView<'_>) -> CheckOutcome {
        self.calls.set(self.calls.get() + 1);
        StaticChecker.run(check, source)
    }
}

#[test]
fn complete_submission_passes_every_criterion() {
    let results = Evaluator::new().evaluate(&project_for("complete"), &Rubric::default());

    assert_eq!(results.len(), 5);
    for result in &results {
        assert!(result.passed(), "{} failed: {:?}", result.criterion(), result.reasons());
        assert!(result.reasons().is_empty());
    }
}

#[test]
fn absent_artifact_fails_without_invoking_checkers() {
    let evaluator = Evaluator::with_checker(CountingChecker::default());
    let rubric = Rubric::default();
    let absent = Submission::absent("run_chromium.py");

    let results = evaluator.evaluate_submission(&absent, rubric.for_artifact("run_chromium.py"));

    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(!result.passed());
        assert_eq!(result.reasons(), ["artifact absent".to_string()]);
    }
    assert_eq!(evaluator.checker().calls.get(), 0);
}

#[test]
fn missing_title_print_fails_only_the_launch_criterion() {
    let code = "from playwright.sync_api import sync_playwright\n\n\
                with sync_playwright() as p:\n    browser = p.chromium.launch()\n    \
                page = browser.new_page()\n    browser.close()\n";
    let submission = Submission::from_source("run_chromium.py", code).expect("load");
    let rubric = Rubric::default();

    let results = Evaluator::new()
        .evaluate_submission(&submission, rubric.for_artifact("run_chromium.py"));

    let syntax = result_for(&results, "task1_syntax");
    assert!(!syntax.passed());
    assert_eq!(syntax.reasons().len(), 1);
    assert!(syntax.reasons()[0].contains("print("), "{:?}", syntax.reasons());

    assert!(result_for(&results, "task1_imports").passed());
    assert!(result_for(&results, "task1_structure").passed());
}

#[test]
fn partial_submission_reports_per_file_reasons() {
    let results = Evaluator::new().evaluate(&project_for("partial"), &Rubric::default());

    let structure = result_for(&results, "task1_structure");
    assert_eq!(structure.reasons(), ["run_webkit.py: artifact absent".to_string()]);

    let syntax = result_for(&results, "task1_syntax");
    assert_eq!(syntax.reasons().len(), 2);
    assert!(syntax.reasons()[0].starts_with("run_chromium.py: page title"));
    assert_eq!(syntax.reasons()[1], "run_webkit.py: artifact absent");

    // The import check is skipped on the unparseable script, and the
    // headless flag is still checked on its text.
    let headless = result_for(&results, "task2_syntax");
    assert_eq!(headless.reasons().len(), 2);
    assert!(headless.reasons()[0].starts_with("syntax error at line"));
    assert!(headless.reasons()[1].contains("headless=True"));

    // Text checks still run on the unparseable script: the URL is printed,
    // the user agent and viewport are not.
    let output = result_for(&results, "task2_output");
    assert_eq!(output.reasons().len(), 2);
    assert!(output.reasons()[0].contains("User-Agent"));
    assert!(output.reasons()[1].contains("viewport"));
}

#[test]
fn wrong_import_form_and_headless_false_fail() {
    let results = Evaluator::new().evaluate(&project_for("broken"), &Rubric::default());

    assert!(result_for(&results, "task1_structure").passed());
    assert!(result_for(&results, "task1_syntax").passed());

    let imports = result_for(&results, "task1_imports");
    assert_eq!(imports.reasons().len(), 1);
    assert!(imports.reasons()[0].starts_with("run_webkit.py: missing import"));

    let headless = result_for(&results, "task2_syntax");
    assert!(headless.reasons()[0].contains("headless=True"));

    assert_eq!(result_for(&results, "task2_output").reasons().len(), 3);
}

#[test]
fn all_of_stops_at_first_failure_and_independent_does_not() {
    let submission = Submission::from_source("info_headless.py", "print('hello')\n").expect("load");
    let checks = [Check::UserAgentOutput, Check::ViewportOutput, Check::UrlOutput];

    let all_of = Criterion::builder()
        .id("all_of")
        .description("stops early")
        .max_score(1.0)
        .targets(vec![Target::new("info_headless.py", checks)])
        .build();
    let independent = Criterion::builder()
        .id("independent")
        .description("reports everything")
        .max_score(1.0)
        .composition(Composition::Independent)
        .targets(vec![Target::new("info_headless.py", checks)])
        .build();

    let results = Evaluator::new().evaluate_submission(&submission, [&all_of, &independent]);

    assert_eq!(results[0].reasons().len(), 1);
    assert_eq!(results[1].reasons().len(), 3);
}

#[test]
fn all_of_keeps_checking_text_after_a_skipped_tree_check() {
    let code = "def main(:\n    browser = p.chromium.launch(headless=True)\n";
    let submission = Submission::from_source("info_headless.py", code).expect("load");
    let rubric = Rubric::default();
    let evaluator = Evaluator::with_checker(CountingChecker::default());

    let results = evaluator.evaluate_submission(&submission, rubric.for_artifact("info_headless.py"));

    let headless = result_for(&results, "task2_syntax");
    assert_eq!(headless.reasons().len(), 1);
    assert!(headless.reasons()[0].starts_with("syntax error at line 1"));
    // Import plus headless flag for task2_syntax, three outputs for task2_output.
    assert_eq!(evaluator.checker().calls.get(), 5);
}

#[test]
fn missing_folder_fails_everything() {
    let results = Evaluator::new().evaluate(&project_for("no-folder"), &Rubric::default());
    assert!(results.iter().all(|r| !r.passed()));
    assert!(
        results
            .iter()
            .flat_map(|r| r.reasons())
            .all(|reason| reason.ends_with("artifact absent"))
    );
}
