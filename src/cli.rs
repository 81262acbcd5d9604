//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stagegate",
    version,
    about = "Pre-commit compliance engine",
    long_about = "Stagegate inspects staged changes before they are recorded and accepts or rejects them.\n\nConfiguration precedence: CLI > stagegate.toml > defaults.",
    after_help = "Examples:\n  stagegate pre-commit\n  stagegate commit-msg .git/COMMIT_EDITMSG\n  stagegate post-commit $(git rev-parse HEAD) --dry-run\n  stagegate scan .github/workflows/ci.yml Makefile",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Clone, Default)]
/// Flags shared by every hook command.
pub struct CommonOpts {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Path to the rule configuration (default: stagegate.toml|yaml|yml)")]
    pub config: Option<String>,
    #[arg(long, value_parser = ["human", "json"], help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
/// Hook entry points and standalone tools.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current stagegate version.")]
    Version,
    /// Check the staged set
    #[command(
        about = "Run the pre-commit checks",
        long_about = "Collect staged files, dispatch them to the registered checkers, and exit non-zero when strict mode rejects the change. Exit 2 on configuration problems.",
        after_help = "Examples:\n  stagegate pre-commit\n  stagegate pre-commit --output json"
    )]
    PreCommit {
        #[command(flatten)]
        common: CommonOpts,
    },
    /// Check a commit message file
    #[command(
        about = "Validate a commit message",
        long_about = "Run the commit-message checker over the message file git passes to the commit-msg hook."
    )]
    CommitMsg {
        #[command(flatten)]
        common: CommonOpts,
        #[arg(help = "Path to the commit message file")]
        file: String,
    },
    /// Enforce the docker-compose allow-list
    #[command(
        about = "Check docker-compose files",
        long_about = "Compare docker-compose*.yml|yaml files at the repository root against the allow-list. Unknown files fail; missing allowed files only warn."
    )]
    ComposeGuard {
        #[command(flatten)]
        common: CommonOpts,
    },
    /// Revert destructive commits
    #[command(
        about = "Inspect a recorded commit",
        long_about = "Count deleted files and top-level def/class declarations in a commit and revert it when a threshold is exceeded.",
        after_help = "Examples:\n  stagegate post-commit HEAD\n  stagegate post-commit 1a2b3c4 --dry-run"
    )]
    PostCommit {
        #[command(flatten)]
        common: CommonOpts,
        #[arg(help = "Commit to inspect")]
        sha: String,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Report without reverting")]
        dry_run: bool,
    },
    /// Scan files for risky patterns
    #[command(
        about = "Scan files for risky patterns",
        long_about = "Run the staging-pattern guard over the given files, whatever their kind."
    )]
    Scan {
        #[command(flatten)]
        common: CommonOpts,
        #[arg(required = true, help = "Files to scan")]
        paths: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_commit_flags() {
        let cli = Cli::try_parse_from([
            "stagegate",
            "post-commit",
            "abc123",
            "--dry-run",
            "--output",
            "json",
        ])
        .unwrap();
        match cli.cmd {
            Commands::PostCommit {
                common,
                sha,
                dry_run,
            } => {
                assert_eq!(sha, "abc123");
                assert!(dry_run);
                assert_eq!(common.output.as_deref(), Some("json"));
            }
            _ => panic!("expected post-commit"),
        }
    }

    #[test]
    fn test_rejects_unknown_output_mode() {
        assert!(Cli::try_parse_from(["stagegate", "pre-commit", "--output", "xml"]).is_err());
    }

    #[test]
    fn test_scan_requires_paths() {
        assert!(Cli::try_parse_from(["stagegate", "scan"]).is_err());
    }
}
