//! Line scanner for configuration-as-code files (workflows, manifests,
//! shell fragments, build drivers).
//!
//! Each built-in rule is a regex, an optional context substring that must
//! also appear on the line, and a message. Binary or unreadable files are
//! skipped without a finding.

use super::{CheckError, Checker, CheckerId, Payload};
use crate::classify::{is_config_file, ArtifactKind};
use crate::models::{CheckerResult, Finding};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A built-in (regex, context hint, message) rule.
pub struct PatternRule {
    pub regex: &'static str,
    pub context: &'static str,
    pub message: &'static str,
}

pub const BUILTIN_RULES: &[PatternRule] = &[
    PatternRule {
        regex: r"--no-verify\b",
        context: "",
        message: "Bypassing git hooks with --no-verify is not allowed",
    },
    PatternRule {
        regex: r"git\s+push\b.*\s(-f|--force)(\s|$)",
        context: "",
        message: "Force push without lease can destroy remote history",
    },
    PatternRule {
        regex: r"rm\s+-(rf|fr)\s+(/|~|\$HOME)(\s|$)",
        context: "",
        message: "Recursive delete of the root or home directory",
    },
    PatternRule {
        regex: r"curl\b[^|]*\|\s*(sudo\s+)?(ba|z)?sh\b",
        context: "",
        message: "Piping a remote script straight into a shell",
    },
    PatternRule {
        regex: r"chmod\s+(-R\s+)?0?777\b",
        context: "",
        message: "World-writable permissions",
    },
    PatternRule {
        regex: r"continue-on-error:\s*true",
        context: "",
        message: "Workflow step ignores its own failure",
    },
    PatternRule {
        regex: r"\|\|\s*true\b",
        context: "pytest",
        message: "Test failures are swallowed with '|| true'",
    },
    PatternRule {
        regex: r"\bSKIP\s*=",
        context: "pre-commit",
        message: "Pre-commit hooks are skipped",
    },
];

pub struct ContentPatternChecker {
    rules: Vec<(Regex, &'static PatternRule)>,
    repo_root: PathBuf,
}

impl ContentPatternChecker {
    pub fn new(repo_root: &Path) -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .filter_map(|r| Regex::new(r.regex).ok().map(|re| (re, r)))
            .collect();
        ContentPatternChecker {
            rules,
            repo_root: repo_root.to_path_buf(),
        }
    }

    /// Scan one file; `shown` is the path used in findings.
    pub fn scan_file(&self, path: &Path, shown: &str, out: &mut CheckerResult) {
        let Ok(bytes) = fs::read(path) else {
            return;
        };
        if bytes.contains(&0) {
            return;
        }
        let Ok(text) = String::from_utf8(bytes) else {
            return;
        };
        self.scan_text(&text, shown, out);
    }

    pub fn scan_text(&self, text: &str, shown: &str, out: &mut CheckerResult) {
        for (idx, line) in text.lines().enumerate() {
            for (re, rule) in &self.rules {
                if !rule.context.is_empty() && !line.contains(rule.context) {
                    continue;
                }
                if let Some(m) = re.find(line) {
                    out.push(
                        Finding::error(rule.message)
                            .in_file(shown.to_string())
                            .at_line(idx + 1)
                            .with_help(format!("matched: {}", m.as_str().trim())),
                    );
                }
            }
        }
    }
}

impl Checker for ContentPatternChecker {
    fn id(&self) -> CheckerId {
        CheckerId::ContentPattern
    }

    fn accepts(&self) -> &'static [ArtifactKind] {
        // Test- or doc-shaped paths can still be config; `check` filters by extension.
        ArtifactKind::FILES
    }

    fn check(&self, payload: Payload<'_>, out: &mut CheckerResult) -> Result<(), CheckError> {
        if let Payload::Files(files) = payload {
            for f in files.iter().filter(|f| is_config_file(&f.path)) {
                self.scan_file(&self.repo_root.join(&f.path), &f.path, out);
            }
        }
        Ok(())
    }
}
