//! Commit message checks: emptiness, format, length, forbidden patterns.

use super::{compile, CheckError, Checker, CheckerId, Payload};
use crate::classify::ArtifactKind;
use crate::config::{ConfigError, LengthRule, MessageFormat};
use crate::models::{CheckerResult, Finding};
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};

const MAX_EXAMPLES: usize = 3;

pub struct CommitMessageChecker {
    format: Option<(Regex, String)>,
    examples: Vec<String>,
    length: LengthRule,
    forbidden: Vec<(Regex, String)>,
    repo_root: PathBuf,
}

impl CommitMessageChecker {
    pub fn new(
        format: &MessageFormat,
        length: &LengthRule,
        forbidden_patterns: &[String],
        repo_root: &Path,
    ) -> Result<Self, ConfigError> {
        let compiled_format = if format.pattern.is_empty() {
            None
        } else {
            Some((
                compile("message_format.pattern", &format.pattern)?,
                format.pattern.clone(),
            ))
        };
        let mut forbidden = Vec::with_capacity(forbidden_patterns.len());
        for p in forbidden_patterns {
            let re = RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::Regex {
                    field: "forbidden_patterns".into(),
                    message: e.to_string(),
                })?;
            forbidden.push((re, p.clone()));
        }
        Ok(CommitMessageChecker {
            format: compiled_format,
            examples: format.examples.clone(),
            length: length.clone(),
            forbidden,
            repo_root: repo_root.to_path_buf(),
        })
    }

    /// Run every check against one message.
    pub fn check_message(&self, raw: &str, out: &mut CheckerResult) {
        let text = raw.trim();
        if text.is_empty() {
            out.push(Finding::error("Commit message is empty"));
            return;
        }

        if let Some((re, pattern)) = self.format.as_ref() {
            let subject = text.lines().next().unwrap_or(text);
            if !matches_at_start(re, subject) {
                let mut help = format!("expected format: {}", pattern);
                let examples: Vec<&str> = self
                    .examples
                    .iter()
                    .take(MAX_EXAMPLES)
                    .map(String::as_str)
                    .collect();
                if !examples.is_empty() {
                    help.push_str(&format!("; examples: {}", examples.join(" | ")));
                }
                out.push(
                    Finding::error("Commit message does not follow the required format")
                        .with_help(help),
                );
            }
        }

        let len = text.chars().count();
        if self.length.min > 0 && len < self.length.min {
            out.push(Finding::error(format!(
                "Commit message is too short ({} < {} characters)",
                len, self.length.min
            )));
        }
        if self.length.max > 0 && len > self.length.max {
            out.push(Finding::warning(format!(
                "Commit message is long ({} > {} characters)",
                len, self.length.max
            )));
        }

        for (re, pattern) in &self.forbidden {
            if matches_at_start(re, text) {
                out.push(Finding::error(format!(
                    "Commit message matches forbidden pattern '{}'",
                    pattern
                )));
            }
        }
    }
}

/// Match anchored at the first byte, without requiring `^` in the pattern.
fn matches_at_start(re: &Regex, text: &str) -> bool {
    // Leftmost-first search reports a start-0 match whenever one exists.
    re.find(text).map(|m| m.start() == 0).unwrap_or(false)
}

impl Checker for CommitMessageChecker {
    fn id(&self) -> CheckerId {
        CheckerId::CommitMessage
    }

    fn accepts(&self) -> &'static [ArtifactKind] {
        &[ArtifactKind::CommitMessage]
    }

    fn check(&self, payload: Payload<'_>, out: &mut CheckerResult) -> Result<(), CheckError> {
        match payload {
            Payload::CommitMessage(text) => self.check_message(text, out),
            Payload::Files(files) => {
                // COMMIT_EDITMSG staged as a file: read it from disk.
                for f in files {
                    let text = std::fs::read_to_string(self.repo_root.join(&f.path))
                        .map_err(|source| CheckError::Io {
                            path: f.path.clone(),
                            source,
                        })?;
                    self.check_message(&text, out);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONVENTIONAL: &str = r"^(feat|fix|docs|chore)(\([^)]+\))?: .+$";

    fn checker(min: usize, max: usize, forbidden: &[&str]) -> CommitMessageChecker {
        let fmt = MessageFormat {
            pattern: CONVENTIONAL.into(),
            examples: vec![
                "feat: add login".into(),
                "fix(api): handle 404".into(),
                "docs: update readme".into(),
                "chore: bump deps".into(),
            ],
        };
        let forbidden: Vec<String> = forbidden.iter().map(|s| s.to_string()).collect();
        CommitMessageChecker::new(&fmt, &LengthRule { min, max }, &forbidden, Path::new("."))
            .unwrap()
    }

    fn run(c: &CommitMessageChecker, text: &str) -> CheckerResult {
        let mut out = CheckerResult::new("commit_message");
        c.check(Payload::CommitMessage(text), &mut out).unwrap();
        out
    }

    #[test]
    fn test_wip_fails_format_and_min_length() {
        let r = run(&checker(10, 72, &[]), "wip");
        assert_eq!(r.errors.len(), 2);
        let help = r.errors[0].help.as_deref().unwrap();
        assert!(help.contains(CONVENTIONAL));
        assert!(help.contains("feat: add login | fix(api): handle 404 | docs: update readme"));
        assert!(!help.contains("chore: bump deps"));
        assert!(r.errors[1].message.contains("3 < 10"));
        assert!(!r.passed());
    }

    #[test]
    fn test_empty_message_stops_early() {
        let r = run(&checker(10, 72, &["^wip"]), "  \n\t ");
        assert_eq!(r.errors.len(), 1);
        assert_eq!(r.errors[0].message, "Commit message is empty");
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn test_length_boundaries() {
        let c = checker(10, 20, &[]);
        // "feat: abcd" is exactly 10 characters
        assert!(run(&c, "feat: abcd").passed());
        let at_max = "feat: abcdefghijklmn";
        assert_eq!(at_max.len(), 20);
        let r = run(&c, at_max);
        assert!(r.passed());
        assert!(r.warnings.is_empty());
        let over = "feat: abcdefghijklmno";
        let r = run(&c, over);
        assert!(r.passed());
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn test_forbidden_patterns_case_insensitive_from_start() {
        let c = checker(0, 0, &["wip", "fixup!"]);
        let r = run(&c, "WIP: feat: things");
        assert_eq!(
            r.errors
                .iter()
                .filter(|f| f.message.contains("forbidden pattern 'wip'"))
                .count(),
            1
        );
        // only matched from the start of the message
        let r = run(&c, "feat: remove wip flag");
        assert!(r.passed());
    }

    #[test]
    fn test_format_checks_subject_line_only() {
        let c = checker(0, 0, &[]);
        let r = run(&c, "feat(core): add engine\n\nLonger body text.");
        assert!(r.passed());
    }

    #[test]
    fn test_no_pattern_skips_format() {
        let c = CommitMessageChecker::new(
            &MessageFormat::default(),
            &LengthRule::default(),
            &[],
            Path::new("."),
        )
        .unwrap();
        assert!(run(&c, "anything goes").passed());
    }
}
