//! Checker contract and registry.
//!
//! Registered checkers, in run order:
//! - commit_message: format, length, and forbidden patterns of the message
//! - task0: refuses source changes while the bootstrap task is open
//! - naming: identifier spelling in Python sources
//! - content_pattern: risky lines in configuration-as-code files
//! - prd: placeholder for product-requirement documents
//! - test_coverage: placeholder for test files

pub mod commit_message;
pub mod content_pattern;
pub mod naming;
pub mod stub;
pub mod task0;

use crate::classify::ArtifactKind;
use crate::config::{ConfigError, RuleSet};
use crate::models::CheckerResult;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Closed set of checker ids, declared in registration order.
pub enum CheckerId {
    CommitMessage,
    Task0,
    Naming,
    ContentPattern,
    Prd,
    TestCoverage,
}

impl CheckerId {
    pub const ALL: [CheckerId; 6] = [
        CheckerId::CommitMessage,
        CheckerId::Task0,
        CheckerId::Naming,
        CheckerId::ContentPattern,
        CheckerId::Prd,
        CheckerId::TestCoverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckerId::CommitMessage => "commit_message",
            CheckerId::Task0 => "task0",
            CheckerId::Naming => "naming",
            CheckerId::ContentPattern => "content_pattern",
            CheckerId::Prd => "prd",
            CheckerId::TestCoverage => "test_coverage",
        }
    }
}

/// One staged file handed to a checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: String,
    pub kind: ArtifactKind,
}

/// Input given to a checker: a commit message or its slice of staged files.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    CommitMessage(&'a str),
    Files(&'a [StagedFile]),
}

#[derive(Debug, Error)]
/// Failure inside a checker; the engine turns it into an error finding.
pub enum CheckError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Contract shared by every checker.
pub trait Checker {
    fn id(&self) -> CheckerId;

    /// Artifact kinds this checker wants to see.
    fn accepts(&self) -> &'static [ArtifactKind];

    /// Inspect `payload`, appending findings to `out`. Must not write anything.
    fn check(&self, payload: Payload<'_>, out: &mut CheckerResult) -> Result<(), CheckError>;
}

/// Instantiate every checker with its rule slice, in registration order.
pub fn build_registry(
    rules: &RuleSet,
    repo_root: &Path,
) -> Result<Vec<Box<dyn Checker>>, ConfigError> {
    let r = rules.rules();
    let mut registry: Vec<Box<dyn Checker>> = Vec::new();
    for id in CheckerId::ALL {
        let checker: Box<dyn Checker> = match id {
            CheckerId::CommitMessage => Box::new(commit_message::CommitMessageChecker::new(
                &r.message_format,
                &r.length,
                &r.forbidden_patterns,
                repo_root,
            )?),
            CheckerId::Task0 => Box::new(task0::Task0Checker::new(&r.task0, repo_root)),
            CheckerId::Naming => Box::new(naming::NamingChecker::new(&r.naming, repo_root)?),
            CheckerId::ContentPattern => {
                Box::new(content_pattern::ContentPatternChecker::new(repo_root))
            }
            CheckerId::Prd => Box::new(stub::StubChecker::new(
                CheckerId::Prd,
                &[ArtifactKind::Documentation],
            )),
            CheckerId::TestCoverage => Box::new(stub::StubChecker::new(
                CheckerId::TestCoverage,
                &[ArtifactKind::Test],
            )),
        };
        registry.push(checker);
    }
    Ok(registry)
}

/// Compile a rule expression, naming the config field on failure.
pub(crate) fn compile(field: &str, pattern: &str) -> Result<regex::Regex, ConfigError> {
    regex::Regex::new(pattern).map_err(|e| ConfigError::Regex {
        field: field.to_string(),
        message: e.to_string(),
    })
}
