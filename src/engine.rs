//! Dispatcher and aggregator.
//!
//! Routes staged files (or a commit message) to the checkers that accept
//! their artifact kind, runs checkers sequentially in registration order,
//! and turns checker failures into error findings. The accept/reject
//! decision is `decide`, a pure function of the report.

use crate::checks::{Checker, Payload, StagedFile};
use crate::classify::{classify, ArtifactKind};
use crate::models::{CheckerResult, EngineReport, Finding};
use serde::Serialize;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Classify staged paths, keeping their order.
pub fn classify_all(paths: &[String]) -> Vec<StagedFile> {
    paths
        .iter()
        .map(|p| StagedFile {
            path: p.clone(),
            kind: classify(p),
        })
        .collect()
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run one checker, containing errors and panics as a single error finding.
fn run_contained(checker: &dyn Checker, payload: Payload<'_>) -> CheckerResult {
    let id = checker.id().as_str();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut out = CheckerResult::new(id);
        checker.check(payload, &mut out).map(|_| out)
    }));
    let failure = match outcome {
        Ok(Ok(result)) => return result,
        Ok(Err(e)) => format!("Checker '{}' failed: {}", id, e),
        Err(p) => format!("Checker '{}' crashed: {}", id, panic_text(p.as_ref())),
    };
    // Partial findings from a failed run are discarded.
    let mut out = CheckerResult::new(id);
    out.push(Finding::error(failure));
    out
}

/// Dispatch a staged set. Checkers with no matching files are not invoked
/// and do not appear in the report.
pub fn run_staged(
    registry: &[Box<dyn Checker>],
    files: &[StagedFile],
    notes: Vec<Finding>,
) -> EngineReport {
    let mut results = Vec::new();
    for checker in registry {
        let accepts = checker.accepts();
        let slice: Vec<StagedFile> = files
            .iter()
            .filter(|f| accepts.contains(&f.kind))
            .cloned()
            .collect();
        if slice.is_empty() {
            continue;
        }
        results.push(run_contained(checker.as_ref(), Payload::Files(&slice)));
    }
    EngineReport::from_results(results, notes)
}

/// Dispatch a commit message to every checker accepting it.
pub fn run_message(registry: &[Box<dyn Checker>], message: &str) -> EngineReport {
    let results = registry
        .iter()
        .filter(|c| c.accepts().contains(&ArtifactKind::CommitMessage))
        .map(|c| run_contained(c.as_ref(), Payload::CommitMessage(message)))
        .collect();
    EngineReport::from_results(results, Vec::new())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Outcome of the strict-mode policy.
pub enum Verdict {
    Accept,
    AcceptWithNote,
    Reject,
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Reject => 1,
            Verdict::Accept | Verdict::AcceptWithNote => 0,
        }
    }

    /// Single-sentence verdict printed as the report's last line.
    pub fn sentence(&self, failed: usize) -> String {
        match self {
            Verdict::Accept => "All compliance checks passed.".to_string(),
            Verdict::AcceptWithNote => format!(
                "{} checker(s) failed, but strict mode is off so the commit is allowed.",
                failed
            ),
            Verdict::Reject => format!("{} checker(s) failed; commit rejected.", failed),
        }
    }
}

/// Accept/reject decision from the summary and the engine strict flag.
pub fn decide(report: &EngineReport, strict: bool) -> Verdict {
    match (report.summary.failed, strict) {
        (0, _) => Verdict::Accept,
        (_, true) => Verdict::Reject,
        (_, false) => Verdict::AcceptWithNote,
    }
}
