//! Report rendering for the engine, the compose guard, and the sentinel.
//!
//! Supports `human` (default, written to stderr) and `json` (stdout). The
//! human report groups findings by checker id, errors before warnings, and
//! ends with a one-sentence verdict.

use crate::compose::ComposeReport;
use crate::engine::Verdict;
use crate::models::{EngineReport, Finding, Level};
use crate::sentinel::SentinelOutcome;
use crate::utils::{self, Glyphs};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn paint_level(level: Level, color: bool, g: &Glyphs) -> String {
    let (icon, label) = match level {
        Level::Error => (g.error, "error"),
        Level::Warning => (g.warning, "warn"),
        Level::Info => (g.info, "info"),
    };
    let text = format!("{} {}", icon, label);
    if !color {
        return text;
    }
    match level {
        Level::Error => text.red().bold().to_string(),
        Level::Warning => text.yellow().bold().to_string(),
        Level::Info => text.blue().bold().to_string(),
    }
}

fn render_finding(f: &Finding, color: bool, g: &Glyphs) -> String {
    let mut line = format!("  {} {}", paint_level(f.level, color, g), f.message);
    if let Some(loc) = f.location() {
        line.push_str(&format!(" ({})", loc));
    }
    if let Some(help) = f.help.as_ref() {
        line.push_str(&format!("\n      help: {}", help));
    }
    line
}

/// Human-readable engine report, one line per entry, verdict last.
pub fn render_report(report: &EngineReport, verdict: Verdict, color: bool, g: &Glyphs) -> String {
    let mut lines: Vec<String> = Vec::new();
    for n in &report.notes {
        lines.push(render_finding(n, color, g));
    }
    for (id, res) in &report.per_checker {
        if res.errors.is_empty() && res.warnings.is_empty() {
            continue;
        }
        let header = format!("[{}]", id);
        lines.push(if color {
            header.bold().to_string()
        } else {
            header
        });
        for f in res.errors.iter().chain(res.warnings.iter()) {
            lines.push(render_finding(f, color, g));
        }
    }
    let s = &report.summary;
    lines.push(format!(
        "{} Summary {} passed={} failed={} warnings={}",
        g.dash, g.dash, s.passed, s.failed, s.warnings
    ));
    let sentence = verdict.sentence(s.failed);
    lines.push(if !color {
        sentence
    } else if verdict == Verdict::Reject {
        sentence.red().bold().to_string()
    } else {
        sentence.green().bold().to_string()
    });
    lines.join("\n")
}

/// Compose the engine report JSON object (pure) for printing and tests.
pub fn compose_report_json(report: &EngineReport, verdict: Verdict) -> JsonVal {
    let checkers: serde_json::Map<String, JsonVal> = report
        .per_checker
        .iter()
        .map(|(id, r)| {
            (
                id.clone(),
                json!({
                    "passed": r.passed(),
                    "errors": r.errors,
                    "warnings": r.warnings,
                }),
            )
        })
        .collect();
    json!({
        "checkers": checkers,
        "notes": report.notes,
        "summary": report.summary,
        "verdict": verdict,
        "exit_code": verdict.exit_code(),
    })
}

fn print_json(v: &JsonVal) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", utils::error_prefix(), e),
    }
}

/// Print an engine report in the requested format.
pub fn print_report(report: &EngineReport, verdict: Verdict, output: &str) {
    match output {
        "json" => print_json(&compose_report_json(report, verdict)),
        _ => eprintln!(
            "{}",
            render_report(report, verdict, utils::use_colors(), &utils::glyphs())
        ),
    }
}

/// Human-readable compose guard result. Deterministic for a given report.
pub fn render_compose(report: &ComposeReport, g: &Glyphs) -> String {
    let mut lines = Vec::new();
    if !report.unexpected.is_empty() {
        lines.push(format!(
            "{} {} unexpected docker-compose file(s) at repository root: {}",
            g.error,
            report.unexpected.len(),
            report.unexpected.join(", ")
        ));
        lines.push(format!(
            "  allowed: {}",
            crate::compose::ALLOWED_COMPOSE_FILES.join(", ")
        ));
    }
    if !report.missing.is_empty() {
        lines.push(format!(
            "{} allow-listed file(s) not present: {}",
            g.warning,
            report.missing.join(", ")
        ));
    }
    if report.unexpected.is_empty() {
        lines.push(format!(
            "{} {} docker-compose file(s) within the allow-list",
            g.ok,
            report.present.len()
        ));
    }
    lines.join("\n")
}

pub fn print_compose(report: &ComposeReport, output: &str) {
    match output {
        "json" => print_json(&json!({
            "present": report.present,
            "unexpected": report.unexpected,
            "missing": report.missing,
            "passed": report.passed(),
        })),
        _ => eprintln!("{}", render_compose(report, &utils::glyphs())),
    }
}

/// Human-readable sentinel outcome.
pub fn render_sentinel(outcome: &SentinelOutcome, g: &Glyphs) -> String {
    let mut lines = Vec::new();
    for n in &outcome.notes {
        lines.push(format!("{} {}", g.info, n));
    }
    let d = &outcome.descriptor;
    lines.push(format!(
        "commit {}: deleted files={} deleted symbols={}",
        d.sha, d.deleted_file_count, d.deleted_symbol_count
    ));
    match (&outcome.reason, outcome.reverted) {
        (None, _) => lines.push(format!("{} no destructive changes detected", g.ok)),
        (Some(reason), None) => lines.push(format!(
            "{} destructive commit ({}); revert skipped (dry run)",
            g.warning, reason
        )),
        (Some(reason), Some(true)) => lines.push(format!(
            "{} destructive commit ({}); reverted {}",
            g.ok, reason, d.sha
        )),
        (Some(reason), Some(false)) => lines.push(format!(
            "{} destructive commit ({}); revert of {} failed",
            g.error, reason, d.sha
        )),
    }
    lines.join("\n")
}

pub fn print_sentinel(outcome: &SentinelOutcome, output: &str) {
    match output {
        "json" => print_json(&json!({
            "sha": outcome.descriptor.sha,
            "deleted_file_count": outcome.descriptor.deleted_file_count,
            "deleted_symbol_count": outcome.descriptor.deleted_symbol_count,
            "destructive": outcome.reason.is_some(),
            "reason": outcome.reason.map(|r| r.to_string()),
            "reverted": outcome.reverted,
            "notes": outcome.notes,
        })),
        _ => eprintln!("{}", render_sentinel(outcome, &utils::glyphs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckerResult;
    use crate::utils::ASCII_GLYPHS;

    fn sample() -> EngineReport {
        let mut a = CheckerResult::new("task0");
        a.push(Finding::warning("later warning"));
        a.push(Finding::error("first error").in_file("src/app.py").at_line(3));
        let mut b = CheckerResult::new("commit_message");
        b.push(Finding::error("bad format").with_help("expected format: x"));
        EngineReport::from_results(vec![a, b], vec![Finding::info("note")])
    }

    #[test]
    fn test_human_report_ordering_and_verdict_last() {
        let rep = sample();
        let out = render_report(&rep, Verdict::Reject, false, &ASCII_GLYPHS);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  * info note");
        assert_eq!(lines[1], "[commit_message]");
        assert_eq!(lines[2], "  x error bad format");
        assert_eq!(lines[3], "      help: expected format: x");
        assert_eq!(lines[4], "[task0]");
        assert_eq!(lines[5], "  x error first error (src/app.py:3)");
        assert_eq!(lines[6], "  ! warn later warning");
        assert_eq!(
            *lines.last().unwrap(),
            "2 checker(s) failed; commit rejected."
        );
    }

    #[test]
    fn test_compose_report_json_shape() {
        let rep = sample();
        let v = compose_report_json(&rep, Verdict::AcceptWithNote);
        assert_eq!(v["summary"]["failed"], 2);
        assert_eq!(v["verdict"], "accept-with-note");
        assert_eq!(v["exit_code"], 0);
        assert_eq!(v["checkers"]["task0"]["passed"], false);
        assert_eq!(v["checkers"]["task0"]["errors"][0]["line"], 3);
        assert_eq!(v["notes"][0]["level"], "info");
    }
}
