//! Staged-file collection.

use crate::git::SourceControl;
use crate::models::Finding;

pub const STAGED_ARGS: [&str; 4] = ["diff", "--cached", "--name-only", "--diff-filter=ACM"];

/// Paths added, copied, or modified in the index, in git's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedSet {
    pub paths: Vec<String>,
    /// Set when git could not be queried; the set is then empty.
    pub diagnostic: Option<Finding>,
}

/// Ask git for the staged set. Never fails: problems become a diagnostic.
pub fn collect_staged(scm: &dyn SourceControl) -> StagedSet {
    match scm.run_ok(&STAGED_ARGS) {
        Ok(stdout) => StagedSet {
            paths: parse_name_list(&stdout),
            diagnostic: None,
        },
        Err(e) => StagedSet {
            paths: Vec::new(),
            diagnostic: Some(Finding::info(format!(
                "Could not list staged files; nothing to check ({})",
                e
            ))),
        },
    }
}

fn parse_name_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::ScriptedScm;

    #[test]
    fn test_trims_and_keeps_order() {
        let scm = ScriptedScm::new().push(0, "src/b.py\n  src/a.py \n\n README.md\n");
        let set = collect_staged(&scm);
        assert_eq!(set.paths, vec!["src/b.py", "src/a.py", "README.md"]);
        assert!(set.diagnostic.is_none());
        assert_eq!(scm.calls()[0], STAGED_ARGS.to_vec());
    }

    #[test]
    fn test_git_failure_is_empty_with_note() {
        let scm = ScriptedScm::new().push(128, "");
        let set = collect_staged(&scm);
        assert!(set.paths.is_empty());
        assert_eq!(
            set.diagnostic.map(|d| d.level),
            Some(crate::models::Level::Info)
        );

        let missing = ScriptedScm::new().push_unavailable("No such file or directory");
        assert!(collect_staged(&missing).paths.is_empty());
    }
}
