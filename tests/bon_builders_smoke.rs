use pwgrade::grade::{
    Check, CheckResult, Composition, Criterion, DiagnosticSeverity, LintDiagnostic, ScoreEntry,
    ScoreSource, Target,
};

#[test]
fn check_result_builder_defaults_reasons() {
    let result = CheckResult::builder().criterion("task1_imports").passed(true).build();

    assert!(result.passed());
    assert!(result.reasons().is_empty());
    assert_eq!(result, CheckResult::pass("task1_imports"));
}

#[test]
fn check_result_builder_keeps_reasons_consistent() {
    let failed = CheckResult::builder().criterion("task2_output").passed(false).build();
    assert!(!failed.passed());
    assert_eq!(failed.reasons().len(), 1);
    assert_eq!(failed, CheckResult::fail("task2_output", vec![]));

    let passed = CheckResult::builder()
        .criterion("task2_output")
        .passed(true)
        .reasons(vec!["stale reason".to_string()])
        .build();
    assert!(passed.reasons().is_empty());
}

#[test]
fn criterion_builder_defaults_to_all_of() {
    let criterion = Criterion::builder()
        .id("headless")
        .description("headless flag")
        .max_score(5.0)
        .targets(vec![Target::new("info_headless.py", [Check::HeadlessFlag])])
        .build();

    assert_eq!(criterion.composition(), Composition::AllOf);
    assert_eq!(criterion.checks_for("info_headless.py"), Some(&[Check::HeadlessFlag][..]));
    assert_eq!(criterion.checks_for("run_webkit.py"), None);
}

#[test]
fn score_entry_and_diagnostic_builders() {
    let entry = ScoreEntry::builder()
        .source(ScoreSource::Linter("pylint".into()))
        .achieved(5.0)
        .maximum(5.0)
        .build();
    assert_eq!(entry.ratio(), 1.0);
    assert_eq!(entry.source().to_string(), "pylint");

    let diag = LintDiagnostic::builder()
        .path("you_playwright/run_chromium.py")
        .file_name("run_chromium.py")
        .line_number(3)
        .column(1)
        .code("F401")
        .message("'os' imported but unused")
        .severity(DiagnosticSeverity::from_code("F401"))
        .build();
    assert!(diag.severity().is_error());
    assert_eq!(diag.path().file_name().and_then(|n| n.to_str()), Some("run_chromium.py"));
}
