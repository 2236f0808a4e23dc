#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Invokes external linters and turns whatever happens into a `LinterRun`.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use anyhow::Context;
use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, BufReader},
    process::{Child, Command},
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::grade::lint::{LinterProfile, LinterRun};

/// Why a linter produced no usable output.
#[derive(Error, Debug)]
pub enum LintError {
    /// The executable is not on `PATH`.
    #[error("{program} is not installed or not on PATH")]
    NotInstalled {
        /// Executable that was looked up.
        program: String,
    },
    /// There were no files to lint.
    #[error("no scripts to lint")]
    NothingToLint,
    /// The process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Executable that was started.
        program: String,
        /// Underlying I/O error.
        source:  std::io::Error,
    },
    /// The process did not finish in time and was killed.
    #[error("{program} did not finish within {} s", .limit.as_secs())]
    Timeout {
        /// Executable that timed out.
        program: String,
        /// The limit that was exceeded.
        limit:   Duration,
    },
    /// Output could not be collected.
    #[error("failed to collect output of {program}: {detail}")]
    Io {
        /// Executable whose output was lost.
        program: String,
        /// Rendered error chain.
        detail:  String,
    },
}

/// Drop guard that terminates a spawned child process if it is not awaited
/// to completion, e.g. when the timeout fires.
struct ChildDropGuard(Option<Child>);

impl ChildDropGuard {
    /// Wraps the provided child process with the drop guard.
    fn new(child: Child) -> Self {
        Self(Some(child))
    }

    /// Returns a mutable reference to the underlying child process.
    fn child_mut(&mut self) -> anyhow::Result<&mut Child> {
        self.0
            .as_mut()
            .context("child process already taken from guard")
    }

    /// Prevents the guard from killing the process on drop.
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for ChildDropGuard {
    fn drop(&mut self) {
        if let Some(child) = self.0.as_mut() {
            let _ = child.start_kill();
        }
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug)]
pub struct Collected {
    /// Exit status returned by the process.
    pub status: std::process::ExitStatus,
    /// Contents written to stdout.
    pub stdout: Vec<u8>,
    /// Contents written to stderr.
    pub stderr: Vec<u8>,
}

/// Spawns `program` with `args`, collects stdout/stderr and enforces
/// `deadline`. The child is killed if the deadline passes.
pub async fn run_collect(
    program: &Path,
    args: &[OsString],
    cwd: Option<&Path>,
    deadline: Duration,
) -> Result<Collected, LintError> {
    let name = program.display().to_string();
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|source| LintError::Spawn {
        program: name.clone(),
        source,
    })?;
    let mut guard = ChildDropGuard::new(child);

    let io_err = |err: anyhow::Error| LintError::Io {
        program: name.clone(),
        detail:  format!("{err:#}"),
    };

    let stdout = guard
        .child_mut()
        .and_then(|c| c.stdout.take().context("missing stdout pipe"))
        .map_err(io_err)?;
    let stderr = guard
        .child_mut()
        .and_then(|c| c.stderr.take().context("missing stderr pipe"))
        .map_err(io_err)?;

    let out_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        BufReader::new(stdout)
            .read_to_end(&mut buf)
            .await
            .context("failed to read stdout")?;
        Ok::<Vec<u8>, anyhow::Error>(buf)
    });

    let err_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        BufReader::new(stderr)
            .read_to_end(&mut buf)
            .await
            .context("failed to read stderr")?;
        Ok::<Vec<u8>, anyhow::Error>(buf)
    });

    let wait_future = async move {
        let mut guard = guard;
        let status = guard
            .child_mut()?
            .wait()
            .await
            .context("failed to wait on process")?;
        let stdout = out_task.await.context("stdout task join error")??;
        let stderr = err_task.await.context("stderr task join error")??;
        guard.disarm();
        Ok::<Collected, anyhow::Error>(Collected {
            status,
            stdout,
            stderr,
        })
    };

    match timeout(deadline, wait_future).await {
        Ok(collected) => collected.map_err(io_err),
        Err(_) => Err(LintError::Timeout {
            program: name.clone(),
            limit:   deadline,
        }),
    }
}

/// Runs one linter over `files` and returns its findings.
async fn try_run_linter(
    profile: &LinterProfile,
    files: &[PathBuf],
    cwd: Option<&Path>,
    deadline: Duration,
) -> Result<Vec<String>, LintError> {
    if files.is_empty() {
        return Err(LintError::NothingToLint);
    }

    let program = which::which(profile.program()).map_err(|_| LintError::NotInstalled {
        program: profile.program().to_string(),
    })?;

    let args: Vec<OsString> = profile
        .args()
        .iter()
        .map(OsString::from)
        .chain(files.iter().map(|f| f.as_os_str().to_os_string()))
        .collect();

    debug!(tool = profile.name(), program = %program.display(), "running linter");
    let collected = run_collect(&program, &args, cwd, deadline).await?;

    debug!(tool = profile.name(), status = %collected.status, "linter exited");
    let stderr = String::from_utf8_lossy(&collected.stderr);
    if !stderr.trim().is_empty() {
        debug!(tool = profile.name(), stderr = %stderr.trim(), "linter wrote to stderr");
    }

    Ok(profile.findings_from_output(&String::from_utf8_lossy(&collected.stdout)))
}

/// Runs one linter over `files`. Never fails: a missing tool, a crash or a
/// timeout yields a zero-score run carrying the reason.
pub async fn run_linter(
    profile: &LinterProfile,
    files: &[PathBuf],
    cwd: Option<&Path>,
    deadline: Duration,
) -> LinterRun {
    match try_run_linter(profile, files, cwd, deadline).await {
        Ok(findings) => {
            info!(tool = profile.name(), findings = findings.len(), "linter finished");
            LinterRun::new(profile, findings)
        }
        Err(err) => {
            warn!(tool = profile.name(), error = %err, "linter could not be run");
            LinterRun::failed(profile, err.to_string())
        }
    }
}

/// Runs every profile concurrently, returning runs in profile order.
pub async fn run_linters(
    profiles: &[LinterProfile],
    files: &[PathBuf],
    cwd: Option<&Path>,
    deadline: Duration,
) -> Vec<LinterRun> {
    let handles: Vec<_> = profiles
        .iter()
        .cloned()
        .map(|profile| {
            let files = files.to_vec();
            let cwd = cwd.map(Path::to_path_buf);
            tokio::spawn(async move { run_linter(&profile, &files, cwd.as_deref(), deadline).await })
        })
        .collect();

    let mut runs = Vec::with_capacity(handles.len());
    for (profile, handle) in profiles.iter().zip(handles) {
        match handle.await {
            Ok(run) => runs.push(run),
            Err(err) => {
                warn!(tool = profile.name(), error = %err, "linter task failed");
                runs.push(LinterRun::failed(profile, format!("linter task failed: {err}")));
            }
        }
    }
    runs
}
