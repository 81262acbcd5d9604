//! Post-commit revert sentinel.
//!
//! Inspects a recorded commit through source control. A commit that deletes
//! too many files, or too many top-level `def`/`class` declarations, is
//! destructive and gets reverted with `git revert --no-edit`. Nothing else in
//! the repository is touched.

use crate::config::SentinelRule;
use crate::git::SourceControl;
use std::fmt;

/// Literal markers counted in `git show --stat --summary` output.
pub const DELETION_MARKERS: [&str; 2] = ["deleted:", "delete mode "];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDescriptor {
    pub sha: String,
    pub deleted_file_count: usize,
    /// Zero when the file count alone already decided the outcome.
    pub deleted_symbol_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveReason {
    MassFileDeletion,
    MassSymbolDeletion,
}

impl fmt::Display for DestructiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestructiveReason::MassFileDeletion => write!(f, "mass file deletion"),
            DestructiveReason::MassSymbolDeletion => write!(f, "mass symbol deletion"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelOutcome {
    pub descriptor: CommitDescriptor,
    pub reason: Option<DestructiveReason>,
    /// `None` when no revert was attempted.
    pub reverted: Option<bool>,
    pub notes: Vec<String>,
}

impl SentinelOutcome {
    pub fn exit_code(&self) -> i32 {
        match self.reverted {
            Some(false) => 1,
            _ => 0,
        }
    }
}

/// Count deletion markers in a stat/summary listing.
pub fn count_deleted_files(stat: &str) -> usize {
    DELETION_MARKERS
        .iter()
        .map(|m| stat.matches(m).count())
        .sum()
}

fn is_symbol_line(body: &str) -> bool {
    body.starts_with("def ") || body.starts_with("class ")
}

/// Net top-level `def`/`class` removals in a zero-context unified diff.
pub fn count_deleted_symbols(diff: &str) -> usize {
    let mut removed = 0usize;
    let mut added = 0usize;
    for line in diff.lines() {
        if line.starts_with("---") || line.starts_with("+++") {
            continue;
        }
        if let Some(body) = line.strip_prefix('-') {
            if is_symbol_line(body) {
                removed += 1;
            }
        } else if let Some(body) = line.strip_prefix('+') {
            if is_symbol_line(body) {
                added += 1;
            }
        }
    }
    removed.saturating_sub(added)
}

/// Inspect `sha` and revert it when destructive. With `dry_run`, report only.
pub fn run_sentinel(
    scm: &dyn SourceControl,
    sha: &str,
    limits: &SentinelRule,
    dry_run: bool,
) -> SentinelOutcome {
    let mut outcome = SentinelOutcome {
        descriptor: CommitDescriptor {
            sha: sha.to_string(),
            ..CommitDescriptor::default()
        },
        reason: None,
        reverted: None,
        notes: Vec::new(),
    };

    let stat = match scm.run_ok(&["show", "--stat", "--summary", sha]) {
        Ok(s) => s,
        Err(e) => {
            outcome
                .notes
                .push(format!("cannot inspect commit, nothing to do ({})", e));
            return outcome;
        }
    };
    outcome.descriptor.deleted_file_count = count_deleted_files(&stat);
    if outcome.descriptor.deleted_file_count > limits.max_deleted_files {
        outcome.reason = Some(DestructiveReason::MassFileDeletion);
    } else {
        let parent = format!("{}^", sha);
        match scm.run_ok(&["diff", "-U0", &parent, sha]) {
            Ok(diff) => {
                outcome.descriptor.deleted_symbol_count = count_deleted_symbols(&diff);
                if outcome.descriptor.deleted_symbol_count > limits.max_deleted_symbols {
                    outcome.reason = Some(DestructiveReason::MassSymbolDeletion);
                }
            }
            Err(e) => outcome
                .notes
                .push(format!("cannot diff against parent, symbol check skipped ({})", e)),
        }
    }

    if outcome.reason.is_some() && !dry_run {
        let ok = match scm.run_ok(&["revert", "--no-edit", sha]) {
            Ok(_) => true,
            Err(e) => {
                outcome.notes.push(e.to_string());
                false
            }
        };
        outcome.reverted = Some(ok);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::ScriptedScm;

    fn stat_with(n: usize) -> String {
        (0..n)
            .map(|i| format!("    deleted:    src/mod_{}.py\n", i))
            .collect()
    }

    fn diff_with(removed_defs: usize, added_defs: usize) -> String {
        let mut s = String::from("diff --git a/x.py b/x.py\n--- a/x.py\n+++ b/x.py\n@@ -1,3 +0,0 @@\n");
        for i in 0..removed_defs {
            s.push_str(&format!("-def f{}():\n", i));
        }
        for i in 0..added_defs {
            s.push_str(&format!("+def g{}():\n", i));
        }
        // indented methods are not top-level
        s.push_str("-    def method(self):\n");
        s
    }

    #[test]
    fn test_mass_file_deletion_reverts() {
        let scm = ScriptedScm::new().push(0, &stat_with(12)).push(0, "");
        let out = run_sentinel(&scm, "abc123", &SentinelRule::default(), false);
        assert_eq!(out.descriptor.deleted_file_count, 12);
        assert_eq!(out.reason, Some(DestructiveReason::MassFileDeletion));
        assert_eq!(out.reverted, Some(true));
        assert_eq!(out.exit_code(), 0);
        let calls = scm.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], vec!["revert", "--no-edit", "abc123"]);
    }

    #[test]
    fn test_below_thresholds_is_noop() {
        let scm = ScriptedScm::new()
            .push(0, &stat_with(3))
            .push(0, &diff_with(2, 0));
        let out = run_sentinel(&scm, "abc123", &SentinelRule::default(), false);
        assert_eq!(out.descriptor.deleted_file_count, 3);
        assert_eq!(out.descriptor.deleted_symbol_count, 2);
        assert_eq!(out.reason, None);
        assert_eq!(out.reverted, None);
        assert_eq!(out.exit_code(), 0);
        assert!(!scm.calls().iter().any(|c| c[0] == "revert"));
    }

    #[test]
    fn test_exact_thresholds_do_not_trigger() {
        let scm = ScriptedScm::new()
            .push(0, &stat_with(10))
            .push(0, &diff_with(5, 0));
        let out = run_sentinel(&scm, "c", &SentinelRule::default(), false);
        assert_eq!(out.reason, None);
    }

    #[test]
    fn test_symbol_deletion_and_failed_revert() {
        let scm = ScriptedScm::new()
            .push(0, "")
            .push(0, &diff_with(8, 1))
            .push(1, "");
        let out = run_sentinel(&scm, "c", &SentinelRule::default(), false);
        assert_eq!(out.descriptor.deleted_symbol_count, 7);
        assert_eq!(out.reason, Some(DestructiveReason::MassSymbolDeletion));
        assert_eq!(out.reverted, Some(false));
        assert_eq!(out.exit_code(), 1);
    }

    #[test]
    fn test_dry_run_never_reverts() {
        let scm = ScriptedScm::new().push(0, &stat_with(20));
        let out = run_sentinel(&scm, "c", &SentinelRule::default(), true);
        assert!(out.reason.is_some());
        assert_eq!(out.reverted, None);
        assert_eq!(scm.calls().len(), 1);
    }

    #[test]
    fn test_revert_commit_does_not_retrigger() {
        // A revert of a deleting commit re-adds the lines.
        let scm = ScriptedScm::new().push(0, "").push(0, &diff_with(0, 9));
        let out = run_sentinel(&scm, "r", &SentinelRule::default(), false);
        assert_eq!(out.descriptor.deleted_symbol_count, 0);
        assert_eq!(out.reverted, None);
    }

    #[test]
    fn test_git_unavailable_is_noop_with_note() {
        let scm = ScriptedScm::new().push_unavailable("not found");
        let out = run_sentinel(&scm, "c", &SentinelRule::default(), false);
        assert_eq!(out.exit_code(), 0);
        assert_eq!(out.notes.len(), 1);
    }

    #[test]
    fn test_counts_summary_markers() {
        let stat = " delete mode 100644 a.py\n delete mode 100644 b.py\n 2 files changed\n";
        assert_eq!(count_deleted_files(stat), 2);
    }
}
