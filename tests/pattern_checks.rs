//! Tests for the individual pattern checks.

use pwgrade::{
    grade::{
        Check, CheckOutcome, Engine, PatternChecker, StaticChecker,
        checks::{has_from_import, required_outputs},
    },
    python::{Parser, Submission},
};

fn run(code: &str, check: Check) -> CheckOutcome {
    let submission = Submission::from_source("script.py", code).expect("load");
    let view = submission.view().expect("present");
    StaticChecker.run(check, &view)
}

#[test]
fn import_check_accepts_plain_and_aliased_forms() {
    let plain = Parser::new("from playwright.sync_api import sync_playwright\n".into())
        .expect("parse");
    let aliased = Parser::new("from playwright.sync_api import Page, sync_playwright as sp\n".into())
        .expect("parse");

    assert!(has_from_import(&plain, "playwright.sync_api", "sync_playwright"));
    assert!(has_from_import(&aliased, "playwright.sync_api", "sync_playwright"));
}

#[test]
fn import_check_rejects_other_forms() {
    for code in [
        "import playwright.sync_api\n",
        "from playwright.async_api import sync_playwright\n",
        "from playwright import sync_api\n",
        "# from playwright.sync_api import sync_playwright\n",
        "x = 'from playwright.sync_api import sync_playwright'\n",
    ] {
        let parser = Parser::new(code.to_string()).expect("parse");
        assert!(
            !has_from_import(&parser, "playwright.sync_api", "sync_playwright"),
            "accepted: {code}"
        );
    }
}

#[test]
fn tree_check_on_unparseable_file_names_the_line() {
    let code = "from playwright.sync_api import sync_playwright\n\nwith sync_playwright() as p\n    \
                p.chromium.launch()\n";
    let outcome = run(code, Check::SyncPlaywrightImport);

    match outcome {
        CheckOutcome::Failed(reason) => {
            assert!(reason.starts_with("syntax error at line"), "{reason}");
        }
        CheckOutcome::Passed => panic!("tree check passed on a broken file"),
    }

    // Text checks still run on the same file.
    assert!(run(code, Check::Launch(Engine::Chromium)).passed());
}

#[test]
fn launch_check_is_per_engine() {
    let code = "with sync_playwright() as p:\n    browser = p.webkit.launch()\n";
    assert!(run(code, Check::Launch(Engine::Webkit)).passed());
    assert_eq!(
        run(code, Check::Launch(Engine::Firefox)),
        CheckOutcome::Failed("browser launch not found: p.firefox.launch()".into())
    );
}

#[test]
fn text_checks_match_inside_comments() {
    let code = "# p.chromium.launch(\n";
    assert!(run(code, Check::Launch(Engine::Chromium)).passed());
}

#[test]
fn output_triple_reports_each_predicate() {
    let code = "print(page.url)\nprint(page.viewport_size)\n";
    let outputs = required_outputs(code);
    assert!(!outputs.user_agent);
    assert!(outputs.viewport);
    assert!(outputs.url);

    let ua = "print(page.evaluate('navigator.userAgent'))\n";
    assert!(required_outputs(ua).user_agent);
    assert!(run(ua, Check::UserAgentOutput).passed());
}

#[test]
fn headless_flag_requires_true() {
    assert!(run("p.chromium.launch(headless=True)", Check::HeadlessFlag).passed());
    assert!(!run("p.chromium.launch(headless=False)", Check::HeadlessFlag).passed());
    assert!(!run("p.chromium.launch()", Check::HeadlessFlag).passed());
}
