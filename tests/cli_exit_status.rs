//! Tests that the binary's exit status follows the verdict alone.

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use uuid::Uuid;

/// Copies the `complete` fixture into a fresh temp root.
fn complete_copy() -> PathBuf {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("python")
        .join("complete")
        .join("you_playwright");
    let root = std::env::temp_dir().join(format!("pwgrade-cli-{}", Uuid::new_v4()));
    let dest = root.join("you_playwright");
    fs::create_dir_all(&dest).expect("create temp project");

    for entry in fs::read_dir(&fixture).expect("read fixture") {
        let entry = entry.expect("fixture entry");
        fs::copy(entry.path(), dest.join(entry.file_name())).expect("copy fixture file");
    }
    root
}

fn pwgrade(root: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pwgrade"));
    cmd.args(args)
        .arg("--root")
        .arg(root)
        .env_remove("GITHUB_STEP_SUMMARY")
        .env_remove("PWGRADE_TASKS");
    cmd
}

#[test]
fn unwritable_report_does_not_fail_a_passing_grade() {
    let root = complete_copy();
    fs::create_dir_all(root.join("SUMMARY.md")).expect("block the report path");
    let json = root.join("missing-dir").join("result.json");

    let json_arg = json.to_str().expect("utf-8 temp path");
    let output = pwgrade(&root, &["grade", "--json", json_arg])
        .output()
        .expect("run pwgrade");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("PASS"));
    assert!(!json.exists());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn unwritable_report_does_not_fail_a_complete_structure_check() {
    let root = complete_copy();
    fs::create_dir_all(root.join("SUMMARY.md")).expect("block the report path");

    let status = pwgrade(&root, &["check"]).status().expect("run pwgrade");
    assert!(status.success());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn missing_folder_fails_the_structure_check() {
    let root = std::env::temp_dir().join(format!("pwgrade-cli-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");

    let status = pwgrade(&root, &["check"]).status().expect("run pwgrade");
    assert_eq!(status.code(), Some(1));

    let _ = fs::remove_dir_all(root);
}
