//! Stagegate CLI binary entry point.
//! Delegates to the library for each hook and maps results to exit codes:
//! 0 accepted, 1 policy failure, 2 infrastructure failure.

use clap::Parser;
use stagegate::checks::content_pattern::ContentPatternChecker;
use stagegate::checks::{self, Checker, CheckerId};
use stagegate::cli::{Cli, Commands, CommonOpts};
use stagegate::config::{self, ConfigError, Effective, RuleSet, SentinelRule};
use stagegate::engine;
use stagegate::git::Git;
use stagegate::models::{CheckerResult, EngineReport, Finding};
use stagegate::{compose, output, sentinel, staged, utils};
use std::fs;
use std::path::Path;
use std::process::exit;

fn effective(common: &CommonOpts) -> Effective {
    config::resolve_effective(
        common.repo_root.as_deref(),
        common.config.as_deref(),
        common.output.as_deref(),
    )
}

fn fail_config(e: ConfigError) -> ! {
    eprintln!("{} {}", utils::error_prefix(), e);
    exit(2);
}

/// Rules plus the checker registry, or exit 2.
fn load_registry(eff: &Effective) -> (RuleSet, Vec<Box<dyn Checker>>) {
    let rules = config::load_effective(eff).unwrap_or_else(|e| fail_config(e));
    if eff.output != "json" {
        eprintln!(
            "{} using rules from {}",
            utils::info_prefix(),
            utils::rel_to_wd(rules.source())
        );
    }
    let registry =
        checks::build_registry(&rules, &eff.repo_root).unwrap_or_else(|e| fail_config(e));
    (rules, registry)
}

fn pre_commit(common: &CommonOpts) -> i32 {
    let eff = effective(common);
    let (rules, registry) = load_registry(&eff);
    let set = staged::collect_staged(&Git::new(&eff.repo_root));
    let notes: Vec<Finding> = set.diagnostic.into_iter().collect();
    let files = engine::classify_all(&set.paths);
    let report = engine::run_staged(&registry, &files, notes);
    let verdict = engine::decide(&report, rules.rules().engine.strict_mode);
    output::print_report(&report, verdict, &eff.output);
    verdict.exit_code()
}

fn commit_msg(common: &CommonOpts, file: &str) -> i32 {
    let eff = effective(common);
    let (rules, registry) = load_registry(&eff);
    let message = match fs::read_to_string(file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!(
                "{} cannot read commit message {}: {}",
                utils::error_prefix(),
                file,
                e
            );
            return 2;
        }
    };
    let report = engine::run_message(&registry, &message);
    let verdict = engine::decide(&report, rules.rules().engine.strict_mode);
    output::print_report(&report, verdict, &eff.output);
    verdict.exit_code()
}

fn compose_guard(common: &CommonOpts) -> i32 {
    let eff = effective(common);
    let report = compose::run_compose_guard(&eff.repo_root);
    output::print_compose(&report, &eff.output);
    report.exit_code()
}

/// Sentinel thresholds. A missing or broken config falls back to defaults.
fn sentinel_limits(eff: &Effective) -> SentinelRule {
    if eff.config_path.is_none() {
        if eff.output != "json" {
            eprintln!(
                "{} no stagegate config found; using default thresholds",
                utils::note_prefix()
            );
        }
        return SentinelRule::default();
    }
    match config::load_effective(eff) {
        Ok(rules) => rules.rules().sentinel,
        Err(e) => {
            eprintln!(
                "{} {}; using default thresholds",
                utils::warn_prefix(),
                e
            );
            SentinelRule::default()
        }
    }
}

fn post_commit(common: &CommonOpts, sha: &str, dry_run: bool) -> i32 {
    let eff = effective(common);
    let limits = sentinel_limits(&eff);
    let outcome = sentinel::run_sentinel(&Git::new(&eff.repo_root), sha, &limits, dry_run);
    output::print_sentinel(&outcome, &eff.output);
    outcome.exit_code()
}

fn scan(common: &CommonOpts, paths: &[String]) -> i32 {
    let eff = effective(common);
    let guard = ContentPatternChecker::new(&eff.repo_root);
    let mut result = CheckerResult::new(CheckerId::ContentPattern.as_str());
    let mut notes = Vec::new();
    for p in paths {
        let path = Path::new(p);
        if !path.is_file() {
            notes.push(Finding::info(format!("skipped {}: not a file", p)));
            continue;
        }
        guard.scan_file(path, &utils::rel_to_wd(path), &mut result);
    }
    let report = EngineReport::from_results(vec![result], notes);
    let verdict = engine::decide(&report, true);
    output::print_report(&report, verdict, &eff.output);
    verdict.exit_code()
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            0
        }
        Commands::PreCommit { common } => pre_commit(&common),
        Commands::CommitMsg { common, file } => commit_msg(&common, &file),
        Commands::ComposeGuard { common } => compose_guard(&common),
        Commands::PostCommit {
            common,
            sha,
            dry_run,
        } => post_commit(&common, &sha, dry_run),
        Commands::Scan { common, paths } => scan(&common, &paths),
    };
    exit(code);
}
