#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Pattern checkers: yes/no questions about one submitted script.
//!
//! Imports are answered from the syntax tree. Call shapes and literals are
//! answered with regular expressions over the raw text. The text checks miss
//! renamed receivers and will match inside strings and comments.

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{SYNC_API_MODULE, SYNC_PLAYWRIGHT},
    python::{Parser, SourceView, TreeView},
};

/// `p.<engine>.launch(`; the engine is checked against the capture.
static LAUNCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"p\.(chromium|firefox|webkit)\.launch\(").unwrap());

/// A `print(` whose argument text contains `title()`.
static PRINT_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)print\s*\([^)]*title\(\)").unwrap());

/// `headless=True`, anywhere in the file.
static HEADLESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"headless\s*=\s*True").unwrap());

/// A print or header line mentioning the user agent.
static USER_AGENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(print|User-Agent).*[Uu]ser.?Agent").unwrap());

/// Reading the user agent from the page.
static NAVIGATOR_UA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"navigator\.userAgent").unwrap());

/// Any mention of the viewport or its dimensions.
static VIEWPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(viewport|size|width.*height|height.*width)").unwrap()
});

/// Any mention of the page URL.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(URL|url|page\.url)").unwrap());

/// The three browser engines Playwright ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Chromium.
    Chromium,
    /// Firefox.
    Firefox,
    /// WebKit.
    Webkit,
}

impl Engine {
    /// Attribute name on the Playwright handle.
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Chromium => "chromium",
            Engine::Firefox => "firefox",
            Engine::Webkit => "webkit",
        }
    }
}

impl Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a check reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInput {
    /// The syntax tree; skipped with a diagnostic when parsing failed.
    Tree,
    /// The raw text; always available for a present file.
    Text,
}

/// The pattern checks a criterion can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// `from playwright.sync_api import sync_playwright`.
    SyncPlaywrightImport,
    /// `p.<engine>.launch(`.
    Launch(Engine),
    /// `print(... .title())`.
    PrintTitle,
    /// `headless=True`.
    HeadlessFlag,
    /// User agent appears in the output.
    UserAgentOutput,
    /// Viewport size appears in the output.
    ViewportOutput,
    /// Page URL appears in the output.
    UrlOutput,
}

impl Check {
    /// Whether this check needs the tree or just the text.
    pub fn input(self) -> CheckInput {
        match self {
            Check::SyncPlaywrightImport => CheckInput::Tree,
            _ => CheckInput::Text,
        }
    }

    /// Reason reported when the check fails.
    pub fn failure_message(self) -> String {
        match self {
            Check::SyncPlaywrightImport => {
                format!("missing import of {SYNC_PLAYWRIGHT} from {SYNC_API_MODULE}")
            }
            Check::Launch(engine) => format!("browser launch not found: p.{engine}.launch()"),
            Check::PrintTitle => "page title is not printed via print(... .title())".into(),
            Check::HeadlessFlag => {
                "headless mode not detected (expected headless=True in launch())".into()
            }
            Check::UserAgentOutput => {
                "User-Agent is not printed (use page.evaluate('navigator.userAgent'))".into()
            }
            Check::ViewportOutput => "viewport size (width/height) is not printed".into(),
            Check::UrlOutput => "current page URL is not printed".into(),
        }
    }

    /// Short label for rubric listings.
    pub fn label(self) -> String {
        match self {
            Check::SyncPlaywrightImport => "sync_playwright import".into(),
            Check::Launch(engine) => format!("{engine} launch"),
            Check::PrintTitle => "title print".into(),
            Check::HeadlessFlag => "headless=True".into(),
            Check::UserAgentOutput => "user agent output".into(),
            Check::ViewportOutput => "viewport output".into(),
            Check::UrlOutput => "URL output".into(),
        }
    }
}

/// Result of running one check against one present file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The pattern was found.
    Passed,
    /// The pattern was not found, or the tree was unavailable.
    Failed(String),
}

impl CheckOutcome {
    /// Whether the check passed.
    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }
}

/// Runs pattern checks. The evaluator only talks to this trait so tests can
/// observe which checks were invoked.
pub trait PatternChecker {
    /// Runs `check` against a present file.
    fn run(&self, check: Check, source: &SourceView<'_>) -> CheckOutcome;
}

/// The production checker backed by the functions in this module.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticChecker;

impl PatternChecker for StaticChecker {
    fn run(&self, check: Check, source: &SourceView<'_>) -> CheckOutcome {
        let passed = match (check.input(), source.tree) {
            (CheckInput::Tree, TreeView::Failed { line }) => {
                return CheckOutcome::Failed(parse_failure_message(line));
            }
            (CheckInput::Tree, TreeView::Parsed(parser)) => match check {
                Check::SyncPlaywrightImport => {
                    has_from_import(parser, SYNC_API_MODULE, SYNC_PLAYWRIGHT)
                }
                _ => false,
            },
            (CheckInput::Text, _) => {
                let code = source.code;
                match check {
                    Check::Launch(engine) => has_launch(code, engine),
                    Check::PrintTitle => has_print_title(code),
                    Check::HeadlessFlag => has_headless_flag(code),
                    Check::UserAgentOutput => required_outputs(code).user_agent,
                    Check::ViewportOutput => required_outputs(code).viewport,
                    Check::UrlOutput => required_outputs(code).url,
                    Check::SyncPlaywrightImport => false,
                }
            }
        };

        if passed {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed(check.failure_message())
        }
    }
}

/// Diagnostic shared by every tree-based check of an unparseable file.
pub fn parse_failure_message(line: usize) -> String {
    format!("syntax error at line {line}; structural checks skipped")
}

/// Whether some `from <module> import ...` binds `symbol`. Aliases count,
/// re-exports and `import module` forms do not.
pub fn has_from_import(parser: &Parser, module: &str, symbol: &str) -> bool {
    parser
        .from_imports()
        .iter()
        .any(|import| import.module == module && import.names.iter().any(|n| n == symbol))
}

/// Whether the text contains `p.<engine>.launch(`.
pub fn has_launch(code: &str, engine: Engine) -> bool {
    LAUNCH_RE
        .captures_iter(code)
        .any(|caps| &caps[1] == engine.as_str())
}

/// Whether a `print(` call's argument text contains `title()`.
pub fn has_print_title(code: &str) -> bool {
    PRINT_TITLE_RE.is_match(code)
}

/// Whether `headless=True` appears anywhere.
pub fn has_headless_flag(code: &str) -> bool {
    HEADLESS_RE.is_match(code)
}

/// The three independent output predicates for the headless info script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequiredOutputs {
    /// User agent evidence.
    pub user_agent: bool,
    /// Viewport or size evidence.
    pub viewport:   bool,
    /// URL evidence.
    pub url:        bool,
}

impl RequiredOutputs {
    /// Whether all three hold.
    pub fn all(self) -> bool {
        self.user_agent && self.viewport && self.url
    }
}

/// Evaluates the three output predicates over the raw text.
pub fn required_outputs(code: &str) -> RequiredOutputs {
    RequiredOutputs {
        user_agent: USER_AGENT_RE.is_match(code) || NAVIGATOR_UA_RE.is_match(code),
        viewport:   VIEWPORT_RE.is_match(code),
        url:        URL_RE.is_match(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_requires_matching_engine() {
        let code = "browser = p.firefox.launch(headless=True)";
        assert!(has_launch(code, Engine::Firefox));
        assert!(!has_launch(code, Engine::Chromium));
        assert!(!has_launch("pw.firefox.launch()", Engine::Firefox));
    }

    #[test]
    fn launch_misses_renamed_receiver() {
        assert!(!has_launch("playwright.webkit.launch()", Engine::Webkit));
        assert!(has_launch("with sync_playwright() as p:\n    p.webkit.launch()", Engine::Webkit));
    }

    #[test]
    fn print_title_is_case_insensitive() {
        assert!(has_print_title("print(page.title())"));
        assert!(has_print_title("PRINT(f\"Title: {page.TITLE()}\")"));
        assert!(!has_print_title("title = page.title()\nprint(title)"));
    }

    #[test]
    fn headless_flag_ignores_call_site() {
        assert!(has_headless_flag("opts = dict(headless = True)"));
        assert!(!has_headless_flag("launch(headless=False)"));
    }

    #[test]
    fn required_outputs_reported_independently() {
        let outputs = required_outputs("ua = page.evaluate('navigator.userAgent')\nprint(ua)");
        assert!(outputs.user_agent);
        assert!(!outputs.viewport);
        assert!(!outputs.url);
        assert!(!outputs.all());
    }
}
