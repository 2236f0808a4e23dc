#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # pwgrade
//!
//! Grades a Playwright homework repository without running it.
//!
//! Run `pwgrade grade` from the repository root. The exit status is 0 iff the
//! submission passes, so the command can gate a CI job directly.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use itertools::Itertools;
use pwgrade::{
    config::GradingConfig,
    constants::{LINT_PASS_TOTAL, LINTER_CEILING},
    grade::{
        GradingRun, LinterProfile, Rubric,
        report::{lint_summary, lint_total, publish, render_structure, render_terminal},
    },
    process::run_linters,
    python::{Project, ProjectPaths},
};
use tracing::{Level, info, metadata::LevelFilter, warn};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
struct Common {
    /// Repository root.
    root:  PathBuf,
    /// Grading policy override.
    tasks: Option<PathBuf>,
}

impl Common {
    /// Resolves the workspace paths.
    fn paths(&self) -> ProjectPaths {
        ProjectPaths::from_parts(self.root.clone(), None, self.tasks.clone())
    }
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Full grading run, optionally exporting JSON
    Grade(Common, Option<PathBuf>),
    /// Structure-only check
    Check(Common),
    /// Linters only, writing linters_result.json
    Lint(Common),
    /// Print the rubric with configured weights
    Rubric(Common),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the shared options
    fn common() -> impl Parser<Common> {
        let root = long("root")
            .help("Root of the repository to grade")
            .argument::<PathBuf>("DIR")
            .fallback(PathBuf::from("."));
        let tasks = long("tasks")
            .help("Path to the grading policy JSON (defaults to .github/tasks.json)")
            .argument::<PathBuf>("FILE")
            .optional();
        construct!(Common { root, tasks })
    }

    /// parses the JSON export path
    fn json() -> impl Parser<Option<PathBuf>> {
        long("json")
            .help("Also write the results as JSON to this path")
            .argument::<PathBuf>("FILE")
            .optional()
    }

    let grade = construct!(Cmd::Grade(common(), json()))
        .to_options()
        .command("grade")
        .help("Grade the submission and write the report");

    let check = construct!(Cmd::Check(common()))
        .to_options()
        .command("check")
        .help("Check that the project folder and required scripts exist");

    let lint = construct!(Cmd::Lint(common()))
        .to_options()
        .command("lint")
        .help("Run flake8 and pylint and write linters_result.json");

    let rubric = construct!(Cmd::Rubric(common()))
        .to_options()
        .command("rubric")
        .help("Print the rubric and the configured weights");

    let cmd = construct!([grade, check, lint, rubric]);

    cmd.to_options()
        .descr("Static autograder for Playwright scripts")
        .run()
}

/// Maps a pass/fail outcome to the process exit status.
fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Publishes the markdown report. A report that cannot be written is logged
/// and does not change the outcome of the run.
fn publish_or_warn(markdown: &str, summary_file: &Path) {
    match publish(markdown, summary_file) {
        Ok(written) => info!(path = %written.display(), "report written"),
        Err(err) => warn!(error = %format!("{err:#}"), "could not write the report"),
    }
}

/// Writes `contents` to `path`, logging instead of failing.
fn write_or_warn(path: &Path, contents: Result<String>) {
    let written = contents.and_then(|contents| {
        std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
    });
    if let Err(err) = written {
        warn!(path = %path.display(), error = %format!("{err:#}"), "could not write results");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let rubric = Rubric::default();

    let code = match options() {
        Cmd::Grade(common, json) => {
            let paths = common.paths();
            let config = GradingConfig::load(paths.tasks_file(), &rubric);
            let summary_file = paths.summary_file().to_path_buf();
            let run = GradingRun::run(paths, rubric, config, &LinterProfile::defaults()).await?;

            eprintln!("{}", render_terminal(run.result()));
            publish_or_warn(&run.report().render_markdown(), &summary_file);

            if let Some(path) = json {
                write_or_warn(&path, run.to_json());
            }

            let result = run.result();
            let banner = format!(
                "{}: {:.1}% (threshold {:.1}%)",
                result.verdict(),
                result.percentage(),
                result.threshold()
            );
            if result.verdict().passed() {
                println!("{}", banner.green().bold());
            } else {
                println!("{}", banner.red().bold());
            }
            exit_code(result.verdict().passed())
        }
        Cmd::Check(common) => {
            let project = Project::from_paths(common.paths())?;
            let markdown = render_structure(&project);
            println!("{markdown}");
            publish_or_warn(&markdown, project.paths().summary_file());
            exit_code(project.all_present())
        }
        Cmd::Lint(common) => {
            let paths = common.paths();
            let config = GradingConfig::load(paths.tasks_file(), &rubric);
            let project = Project::from_paths(paths)?;
            let runs = run_linters(
                &LinterProfile::defaults(),
                &project.present_paths(),
                Some(project.paths().root_dir()),
                config.lint_timeout(),
            )
            .await;

            let summary = serde_json::to_string_pretty(&lint_summary(&runs))
                .context("Failed to serialize linter results")?;
            write_or_warn(project.paths().lint_file(), Ok(summary.clone()));
            println!("{summary}");

            let total = lint_total(&runs);
            let out_of = runs.len() as u32 * LINTER_CEILING;
            let line = format!("linters: {total}/{out_of} (need {LINT_PASS_TOTAL})");
            if total >= LINT_PASS_TOTAL {
                println!("{}", line.green());
            } else {
                println!("{}", line.red());
            }
            exit_code(total >= LINT_PASS_TOTAL)
        }
        Cmd::Rubric(common) => {
            let config = GradingConfig::load(common.paths().tasks_file(), &rubric);
            for criterion in rubric.criteria() {
                println!(
                    "{} ({} pts): {}",
                    criterion.id().bold(),
                    config.weight(criterion.id()),
                    criterion.description()
                );
                for target in criterion.targets() {
                    if target.checks.is_empty() {
                        println!("  {}: must exist", target.artifact);
                    } else {
                        let labels = target.checks.iter().map(|c| c.label()).join(", ");
                        println!("  {}: {labels}", target.artifact);
                    }
                }
            }
            println!(
                "linters (cap {} pts): {}",
                config.linter_cap(),
                LinterProfile::defaults().iter().map(LinterProfile::name).join(", ")
            );
            println!(
                "max total {}, pass at {}%",
                config.max_total_score(),
                config.passing_score()
            );
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
