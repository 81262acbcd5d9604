//! Allow-list guard for docker-compose files at the repository root.

use glob::{glob, Pattern};
use std::collections::BTreeSet;
use std::path::Path;

/// The only compose file names permitted at the repository root.
pub const ALLOWED_COMPOSE_FILES: [&str; 6] = [
    "docker-compose.yml",
    "docker-compose.override.yml",
    "docker-compose.dev-tools.yml",
    "docker-compose.prod.yml",
    "docker-compose.staging.yml",
    "docker-compose.test.yml",
];

pub const COMPOSE_GLOBS: [&str; 2] = ["docker-compose*.yml", "docker-compose*.yaml"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Sorted file name sets computed by the guard.
pub struct ComposeReport {
    pub present: Vec<String>,
    /// Present but not allow-listed.
    pub unexpected: Vec<String>,
    /// Allow-listed but absent. Advisory only.
    pub missing: Vec<String>,
}

impl ComposeReport {
    pub fn passed(&self) -> bool {
        self.unexpected.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Compare compose files found at `root` against the allow-set.
pub fn run_compose_guard(root: &Path) -> ComposeReport {
    let mut present: BTreeSet<String> = BTreeSet::new();
    for pat in COMPOSE_GLOBS {
        // The root is literal text; only `pat` carries wildcards.
        let pattern = Path::new(&Pattern::escape(&root.to_string_lossy()))
            .join(pat)
            .to_string_lossy()
            .to_string();
        let Ok(entries) = glob(&pattern) else {
            continue;
        };
        for path in entries.flatten() {
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                present.insert(name.to_string());
            }
        }
    }
    let allowed: BTreeSet<String> = ALLOWED_COMPOSE_FILES.iter().map(|s| s.to_string()).collect();
    ComposeReport {
        unexpected: present.difference(&allowed).cloned().collect(),
        missing: allowed.difference(&present).cloned().collect(),
        present: present.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_compose;
    use crate::utils::ASCII_GLYPHS;
    use std::fs;
    use tempfile::tempdir;

    fn seed(root: &Path, names: &[&str]) {
        for n in names {
            fs::write(root.join(n), "services: {}\n").unwrap();
        }
    }

    #[test]
    fn test_exact_allow_set_passes_with_single_line() {
        let tmp = tempdir().unwrap();
        seed(tmp.path(), &ALLOWED_COMPOSE_FILES);
        let rep = run_compose_guard(tmp.path());
        assert!(rep.passed());
        assert!(rep.missing.is_empty());
        let out = render_compose(&rep, &ASCII_GLYPHS);
        assert_eq!(out.lines().count(), 1);
        assert_eq!(out, "ok 6 docker-compose file(s) within the allow-list");
    }

    #[test]
    fn test_unknown_file_fails() {
        let tmp = tempdir().unwrap();
        seed(tmp.path(), &ALLOWED_COMPOSE_FILES);
        seed(tmp.path(), &["docker-compose.dev.yml", "docker-compose.local.yaml"]);
        let rep = run_compose_guard(tmp.path());
        assert_eq!(
            rep.unexpected,
            vec!["docker-compose.dev.yml", "docker-compose.local.yaml"]
        );
        assert_eq!(rep.exit_code(), 1);
    }

    #[test]
    fn test_missing_allowed_file_only_warns() {
        let tmp = tempdir().unwrap();
        let without_test: Vec<&str> = ALLOWED_COMPOSE_FILES
            .iter()
            .copied()
            .filter(|n| *n != "docker-compose.test.yml")
            .collect();
        seed(tmp.path(), &without_test);
        let rep = run_compose_guard(tmp.path());
        assert_eq!(rep.exit_code(), 0);
        assert_eq!(rep.missing, vec!["docker-compose.test.yml"]);
        let out = render_compose(&rep, &ASCII_GLYPHS);
        assert_eq!(
            out.lines().filter(|l| l.starts_with('!')).count(),
            1
        );
    }

    #[test]
    fn test_repeated_runs_render_identically() {
        let tmp = tempdir().unwrap();
        seed(tmp.path(), &["docker-compose.yml", "docker-compose.dev.yml"]);
        let first = render_compose(&run_compose_guard(tmp.path()), &ASCII_GLYPHS);
        let second = render_compose(&run_compose_guard(tmp.path()), &ASCII_GLYPHS);
        assert_eq!(first, second);
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("re[po]*?");
        fs::create_dir_all(&root).unwrap();
        seed(&root, &["docker-compose.yml", "docker-compose.dev.yml"]);
        let rep = run_compose_guard(&root);
        assert_eq!(rep.present, vec!["docker-compose.dev.yml", "docker-compose.yml"]);
        assert_eq!(rep.unexpected, vec!["docker-compose.dev.yml"]);
    }

    #[test]
    fn test_nested_files_ignored() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("deploy")).unwrap();
        seed(&tmp.path().join("deploy"), &["docker-compose.extra.yml"]);
        assert!(run_compose_guard(tmp.path()).present.is_empty());
    }
}
