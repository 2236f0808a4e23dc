//! Tests for loading the grading policy.

use std::{fs, path::PathBuf};

use pwgrade::{config::GradingConfig, grade::Rubric};
use uuid::Uuid;

fn tasks_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("python")
        .join("tasks")
        .join(name)
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join(format!("pwgrade-tasks-{}.json", Uuid::new_v4()));
    let config = GradingConfig::load(&path, &Rubric::default());
    assert_eq!(config, GradingConfig::default());
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let config = GradingConfig::load(&tasks_fixture("malformed.json"), &Rubric::default());
    assert_eq!(config, GradingConfig::default());
}

#[test]
fn custom_weights_override_rubric_defaults() {
    let config = GradingConfig::load(&tasks_fixture("custom.json"), &Rubric::default());

    assert_eq!(config.passing_score(), 60.0);
    assert_eq!(config.weight("task1_structure"), 10.0);
    assert_eq!(config.weight("task1_syntax"), 25.0);
    assert_eq!(config.weight("task2_output"), 15.0);
    assert_eq!(config.weight("not_a_criterion"), 0.0);
    assert_eq!(config.linter_cap(), 15.0);
    assert_eq!(config.lint_timeout().as_secs(), 30);
}

#[test]
fn timeout_is_configurable() {
    let dir = std::env::temp_dir().join(format!("pwgrade-tasks-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("tasks.json");
    fs::write(&path, r#"{ "lint_timeout_secs": 5 }"#).expect("write tasks");

    let config = GradingConfig::load(&path, &Rubric::default());
    assert_eq!(config.lint_timeout().as_secs(), 5);
    assert_eq!(config.max_total_score(), 100.0);

    let _ = fs::remove_dir_all(dir);
}
