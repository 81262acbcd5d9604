//! Shared data models for checker output and engine reports.
//!
//! - `Finding`: one severity-tagged diagnostic with optional location/help.
//! - `CheckerResult`: findings of a single checker, split by severity.
//! - `EngineReport`: all checker results plus a summary.

pub mod tasks;

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a finding.
pub enum Level {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single diagnostic with optional location and help text.
pub struct Finding {
    pub level: Level,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Finding {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Finding {
            level,
            message: message.into(),
            file: None,
            line: None,
            help: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// `file:line`, `file`, or nothing, for printers.
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(f), Some(l)) => Some(format!("{}:{}", f, l)),
            (Some(f), None) => Some(f.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Findings produced by one checker. `passed()` holds iff there are no errors.
pub struct CheckerResult {
    pub checker_id: String,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl CheckerResult {
    pub fn new(checker_id: impl Into<String>) -> Self {
        CheckerResult {
            checker_id: checker_id.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Route a finding into its severity bucket. Info findings are dropped;
    /// checker results only carry errors and warnings.
    pub fn push(&mut self, finding: Finding) {
        match finding.level {
            Level::Error => self.errors.push(finding),
            Level::Warning => self.warnings.push(finding),
            Level::Info => {}
        }
    }

    pub fn extend(&mut self, other: CheckerResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Aggregated counts over checker results.
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Default)]
/// Engine output: per-checker results keyed by id plus engine-level notes.
pub struct EngineReport {
    pub per_checker: BTreeMap<String, CheckerResult>,
    pub notes: Vec<Finding>,
    pub summary: Summary,
}

impl EngineReport {
    pub fn from_results(results: Vec<CheckerResult>, notes: Vec<Finding>) -> Self {
        let mut per_checker: BTreeMap<String, CheckerResult> = BTreeMap::new();
        for r in results {
            match per_checker.get_mut(&r.checker_id) {
                Some(existing) => existing.extend(r),
                None => {
                    per_checker.insert(r.checker_id.clone(), r);
                }
            }
        }
        let summary = summarize(&per_checker);
        EngineReport {
            per_checker,
            notes,
            summary,
        }
    }
}

/// Compute the summary for a set of checker results.
pub fn summarize(per_checker: &BTreeMap<String, CheckerResult>) -> Summary {
    let failed = per_checker.values().filter(|c| !c.passed()).count();
    Summary {
        passed: per_checker.len() - failed,
        failed,
        warnings: per_checker.values().map(|c| c.warnings.len()).sum(),
    }
}
