#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Criteria and the default Playwright rubric.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::checks::{Check, Engine};

/// How the checks of a criterion combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composition {
    /// Checks run in order and stop at the first failure.
    #[default]
    AllOf,
    /// Every check runs and every failure is reported. All must pass.
    Independent,
}

/// The checks a criterion runs against one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Required file name the checks apply to.
    pub artifact: String,
    /// Checks in declared order. Empty means "the file must exist".
    pub checks:   Vec<Check>,
}

impl Target {
    /// Creates a target for `artifact`.
    pub fn new(artifact: impl Into<String>, checks: impl IntoIterator<Item = Check>) -> Self {
        Self {
            artifact: artifact.into(),
            checks:   checks.into_iter().collect(),
        }
    }
}

/// A named, weighted pass/fail requirement over one or more artifacts.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct Criterion {
    /// Stable identifier, also the key in the weights configuration.
    #[builder(getter)]
    id:          String,
    /// Human-readable description.
    #[builder(getter)]
    description: String,
    /// Default weight when the configuration does not override it.
    #[builder(getter)]
    max_score:   f64,
    /// How the checks combine.
    #[builder(default)]
    #[builder(getter)]
    composition: Composition,
    /// Artifacts and their checks, in manifest order.
    #[builder(getter)]
    targets:     Vec<Target>,
}

impl Criterion {
    /// Returns the identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the default weight.
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// Returns the composition rule.
    pub fn composition(&self) -> Composition {
        self.composition
    }

    /// Returns the targets.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The checks this criterion runs against `artifact`, if it applies.
    pub fn checks_for(&self, artifact: &str) -> Option<&[Check]> {
        self.targets
            .iter()
            .find(|t| t.artifact == artifact)
            .map(|t| t.checks.as_slice())
    }
}

/// An ordered list of criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    /// Criteria in evaluation order.
    criteria: Vec<Criterion>,
}

impl Default for Rubric {
    fn default() -> Self {
        Self::playwright()
    }
}

impl Rubric {
    /// Creates a rubric from criteria in evaluation order.
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// The browser-automation homework rubric.
    ///
    /// Weights: structure 15, launch/title 20, imports 20, headless 15,
    /// headless outputs 15. Together with the 15 point linter cap this makes
    /// 100.
    pub fn playwright() -> Self {
        let scripts = ["run_chromium.py", "run_firefox.py", "run_webkit.py"];
        let all_files = scripts.iter().copied().chain(["info_headless.py"]);

        Self::new(vec![
            Criterion::builder()
                .id("task1_structure")
                .description("Project folder contains every required script")
                .max_score(15.0)
                .targets(all_files.map(|f| Target::new(f, [])).collect())
                .build(),
            Criterion::builder()
                .id("task1_syntax")
                .description("Each script launches its browser; Chromium prints the title")
                .max_score(20.0)
                .targets(vec![
                    Target::new("run_chromium.py", [
                        Check::Launch(Engine::Chromium),
                        Check::PrintTitle,
                    ]),
                    Target::new("run_firefox.py", [Check::Launch(Engine::Firefox)]),
                    Target::new("run_webkit.py", [Check::Launch(Engine::Webkit)]),
                ])
                .build(),
            Criterion::builder()
                .id("task1_imports")
                .description("Browser scripts import sync_playwright from playwright.sync_api")
                .max_score(20.0)
                .targets(
                    scripts
                        .iter()
                        .map(|f| Target::new(*f, [Check::SyncPlaywrightImport]))
                        .collect(),
                )
                .build(),
            Criterion::builder()
                .id("task2_syntax")
                .description("Headless script imports sync_playwright and sets headless=True")
                .max_score(15.0)
                .targets(vec![Target::new("info_headless.py", [
                    Check::SyncPlaywrightImport,
                    Check::HeadlessFlag,
                ])])
                .build(),
            Criterion::builder()
                .id("task2_output")
                .description("Headless script prints user agent, viewport size and URL")
                .max_score(15.0)
                .composition(Composition::Independent)
                .targets(vec![Target::new("info_headless.py", [
                    Check::UserAgentOutput,
                    Check::ViewportOutput,
                    Check::UrlOutput,
                ])])
                .build(),
        ])
    }

    /// Returns the criteria in evaluation order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Criteria that reference `artifact`.
    pub fn for_artifact<'a>(&'a self, artifact: &'a str) -> impl Iterator<Item = &'a Criterion> {
        self.criteria
            .iter()
            .filter(move |c| c.checks_for(artifact).is_some())
    }

    /// Sum of the default weights.
    pub fn declared_total(&self) -> f64 {
        self.criteria.iter().map(Criterion::max_score).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playwright_rubric_weights_leave_room_for_linters() {
        let rubric = Rubric::playwright();
        assert_eq!(rubric.criteria().len(), 5);
        assert_eq!(rubric.declared_total(), 85.0);
    }

    #[test]
    fn chromium_script_belongs_to_three_criteria() {
        let rubric = Rubric::playwright();
        let ids: Vec<_> = rubric
            .for_artifact("run_chromium.py")
            .map(Criterion::id)
            .collect();
        assert_eq!(ids, vec!["task1_structure", "task1_syntax", "task1_imports"]);
    }
}
