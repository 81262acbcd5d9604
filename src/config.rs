//! Rule configuration discovery, loading, and effective settings resolution.
//!
//! Stagegate reads `stagegate.toml|yaml|yml` from the repository root (or the
//! closest ancestor) unless `--config` points elsewhere. The document is a
//! tree of sections keyed by checker id. Defaults:
//! - `length.min`: 0, `length.max`: 200
//! - `naming.*`: PEP 8 style expressions
//! - `task0.strict_mode`: false, `task0.tasks_file_path`: `.taskmaster/tasks/tasks.json`
//! - `engine.strict_mode`: true
//! - `sentinel.max_deleted_files`: 10, `sentinel.max_deleted_symbols`: 5
//!
//! Unknown keys are rejected. Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAMES: [&str; 3] = ["stagegate.toml", "stagegate.yaml", "stagegate.yml"];

#[derive(Debug, Error)]
/// Fatal configuration problems. Entry points map these to exit code 2.
pub enum ConfigError {
    #[error("rule configuration not found (looked for {0})")]
    NotFound(String),
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid TOML: {message}")]
    Toml { path: String, message: String },
    #[error("{path} is not valid YAML: {message}")]
    Yaml { path: String, message: String },
    #[error("{path}: {message}")]
    Shape { path: String, message: String },
    #[error("invalid regular expression for {field}: {message}")]
    Regex { field: String, message: String },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
/// `[message_format]`
pub struct MessageFormat {
    pub pattern: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
/// `[length]`
pub struct LengthRule {
    pub min: usize,
    pub max: usize,
}

impl Default for LengthRule {
    fn default() -> Self {
        LengthRule { min: 0, max: 200 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
/// `[naming]` expressions per identifier kind. Empty disables a kind.
pub struct NamingRule {
    pub class: String,
    pub function: String,
    pub variable: String,
    pub constant: String,
    pub parameter: String,
}

impl Default for NamingRule {
    fn default() -> Self {
        NamingRule {
            class: "^[A-Z][A-Za-z0-9]*$".into(),
            function: "^[a-z_][a-z0-9_]*$".into(),
            variable: "^[a-z_][a-z0-9_]*$".into(),
            constant: "^[A-Z_][A-Z0-9_]*$".into(),
            parameter: "^[a-z_][a-z0-9_]*$".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
/// `[task0]`
pub struct Task0Rule {
    pub strict_mode: bool,
    pub tasks_file_path: String,
}

impl Default for Task0Rule {
    fn default() -> Self {
        Task0Rule {
            strict_mode: false,
            tasks_file_path: ".taskmaster/tasks/tasks.json".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
/// `[engine]`
pub struct EngineRule {
    pub strict_mode: bool,
}

impl Default for EngineRule {
    fn default() -> Self {
        EngineRule { strict_mode: true }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
/// `[sentinel]` deletion thresholds for the post-commit revert.
pub struct SentinelRule {
    pub max_deleted_files: usize,
    pub max_deleted_symbols: usize,
}

impl Default for SentinelRule {
    fn default() -> Self {
        SentinelRule {
            max_deleted_files: 10,
            max_deleted_symbols: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
/// Typed view over the whole rule document.
pub struct Rules {
    pub message_format: MessageFormat,
    pub length: LengthRule,
    pub forbidden_patterns: Vec<String>,
    pub naming: NamingRule,
    pub task0: Task0Rule,
    pub engine: EngineRule,
    pub sentinel: SentinelRule,
}

#[derive(Debug, Clone)]
/// Loaded rule document: the raw tree plus its typed view.
pub struct RuleSet {
    raw: Map<String, Json>,
    rules: Rules,
    source: PathBuf,
}

impl RuleSet {
    /// Build directly from typed rules (no backing file).
    pub fn from_rules(rules: Rules) -> Self {
        RuleSet {
            raw: Map::new(),
            rules,
            source: PathBuf::new(),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Raw mapping for a checker id; empty when the section is absent.
    pub fn section(&self, id: &str) -> Map<String, Json> {
        match self.raw.get(id) {
            Some(Json::Object(m)) => m.clone(),
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub output: String,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `stagegate.toml|yaml|yml` or a `.git` entry is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILE_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// First existing config file under `root`.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|n| root.join(n))
        .find(|p| p.is_file())
}

/// Load and validate the rule document at `path`.
pub fn load_rules(path: &Path) -> Result<RuleSet, ConfigError> {
    let shown = path.to_string_lossy().to_string();
    if !path.is_file() {
        return Err(ConfigError::NotFound(shown));
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: shown.clone(),
        source,
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let raw: Json = if is_yaml {
        serde_yaml::from_str::<Json>(&text).map_err(|e| ConfigError::Yaml {
            path: shown.clone(),
            message: e.to_string(),
        })?
    } else {
        let value: toml::Value = toml::from_str(&text).map_err(|e| ConfigError::Toml {
            path: shown.clone(),
            message: e.to_string(),
        })?;
        serde_json::to_value(value).map_err(|e| ConfigError::Shape {
            path: shown.clone(),
            message: e.to_string(),
        })?
    };
    let raw = match raw {
        Json::Object(m) => m,
        // An empty YAML document parses as null; treat it as no sections.
        Json::Null => Map::new(),
        _ => {
            return Err(ConfigError::Shape {
                path: shown,
                message: "top level must be a mapping of sections".into(),
            })
        }
    };
    let rules: Rules =
        serde_json::from_value(Json::Object(raw.clone())).map_err(|e| ConfigError::Shape {
            path: shown,
            message: e.to_string(),
        })?;
    Ok(RuleSet {
        raw,
        rules,
        source: path.to_path_buf(),
    })
}

/// Load the rule document for an effective configuration, failing when absent.
pub fn load_effective(eff: &Effective) -> Result<RuleSet, ConfigError> {
    match eff.config_path.as_ref() {
        Some(p) => load_rules(p),
        None => Err(ConfigError::NotFound(
            CONFIG_FILE_NAMES
                .iter()
                .map(|n| eff.repo_root.join(n).to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )),
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_config: Option<&str>,
    cli_output: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let config_path = match cli_config {
        Some(c) => {
            let p = PathBuf::from(c);
            Some(if p.is_absolute() { p } else { repo_root.join(p) })
        }
        None => find_config(&repo_root),
    };
    let output = cli_output
        .map(|s| s.to_string())
        .unwrap_or_else(|| "human".to_string());
    Effective {
        repo_root,
        config_path,
        output,
    }
}
