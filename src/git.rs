//! Source-control capability.
//!
//! Every git invocation goes through `SourceControl::run`, so components can
//! be exercised with `ScriptedScm` instead of a real repository.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Captured result of a finished source-control command.
pub struct ScmOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ScmOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Error)]
pub enum ScmError {
    #[error("cannot run git: {0}")]
    Unavailable(String),
    #[error("git {args} exited with status {status}: {stderr}")]
    Failed {
        args: String,
        status: i32,
        stderr: String,
    },
}

/// Narrow interface over the `git` command line.
pub trait SourceControl {
    /// Run git with `args`, reading stdout and stderr to completion.
    fn run(&self, args: &[&str]) -> Result<ScmOutput, ScmError>;

    /// Like `run`, but a non-zero exit becomes `ScmError::Failed`.
    fn run_ok(&self, args: &[&str]) -> Result<String, ScmError> {
        let out = self.run(args)?;
        if out.success() {
            Ok(out.stdout)
        } else {
            Err(ScmError::Failed {
                args: args.join(" "),
                status: out.status,
                stderr: out.stderr.trim().to_string(),
            })
        }
    }
}

/// The real `git` binary from `PATH`, run inside `repo_root`.
pub struct Git {
    repo_root: PathBuf,
}

impl Git {
    pub fn new(repo_root: &Path) -> Self {
        Git {
            repo_root: repo_root.to_path_buf(),
        }
    }
}

impl SourceControl for Git {
    fn run(&self, args: &[&str]) -> Result<ScmOutput, ScmError> {
        // `output()` waits for the child and drains both pipes.
        let out = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(|e| ScmError::Unavailable(e.to_string()))?;
        Ok(ScmOutput {
            status: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

/// Test double returning canned results in FIFO order and recording calls.
#[derive(Debug, Default)]
pub struct ScriptedScm {
    scripted: RefCell<VecDeque<Result<ScmOutput, String>>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedScm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command that exits with `status` and prints `stdout`.
    pub fn push(self, status: i32, stdout: &str) -> Self {
        self.scripted.borrow_mut().push_back(Ok(ScmOutput {
            status,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));
        self
    }

    /// Queue a spawn failure, as if git were missing.
    pub fn push_unavailable(self, reason: &str) -> Self {
        self.scripted.borrow_mut().push_back(Err(reason.to_string()));
        self
    }

    /// Arguments of every call received so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl SourceControl for ScriptedScm {
    fn run(&self, args: &[&str]) -> Result<ScmOutput, ScmError> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| a.to_string()).collect());
        match self.scripted.borrow_mut().pop_front() {
            Some(Ok(out)) => Ok(out),
            Some(Err(reason)) => Err(ScmError::Unavailable(reason)),
            None => Err(ScmError::Unavailable("no scripted result".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ok_maps_nonzero_exit() {
        let scm = ScriptedScm::new().push(0, "ok\n").push(128, "");
        assert_eq!(scm.run_ok(&["status"]).unwrap(), "ok\n");
        let err = scm.run_ok(&["show", "abc"]).unwrap_err();
        assert!(matches!(err, ScmError::Failed { status: 128, .. }));
        assert_eq!(scm.calls()[1], vec!["show".to_string(), "abc".to_string()]);
    }

    #[test]
    fn test_exhausted_script_is_unavailable() {
        let scm = ScriptedScm::new();
        assert!(matches!(scm.run(&["log"]), Err(ScmError::Unavailable(_))));
    }
}
