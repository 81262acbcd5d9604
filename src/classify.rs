//! Artifact classification by path prefix, file name, and extension.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of staged artifact; checkers declare which kinds they accept.
pub enum ArtifactKind {
    Source,
    CommitMessage,
    Config,
    Documentation,
    Test,
    Other,
}

impl ArtifactKind {
    pub const FILES: &'static [ArtifactKind] = &[
        ArtifactKind::Source,
        ArtifactKind::Config,
        ArtifactKind::Documentation,
        ArtifactKind::Test,
        ArtifactKind::Other,
    ];
}

/// Extensions treated as real source code.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "js", "jsx", "ts", "tsx", "mjs", "cjs", "go", "rs", "java", "kt", "rb", "php", "c", "h",
    "cc", "cpp", "hpp", "cs", "swift", "scala", "vue", "svelte",
];

/// Directories whose content never counts as source: documentation, tests,
/// hidden tooling, virtual environments, and build output.
pub const EXCLUDED_PREFIXES: &[&str] = &[
    "docs/",
    "doc/",
    "tests/",
    "test/",
    ".github/",
    ".taskmaster/",
    ".claude/",
    ".cursor/",
    ".vscode/",
    ".idea/",
    ".venv/",
    "venv/",
    "env/",
    "node_modules/",
    "build/",
    "dist/",
    "target/",
    "__pycache__/",
];

/// Configuration-as-code extensions scanned by the pattern guard.
pub const CONFIG_EXTENSIONS: &[&str] = &[
    "yml", "yaml", "json", "toml", "sh", "bash", "zsh", "mk", "cfg", "ini",
];

/// Extension-less configuration files scanned by the pattern guard.
pub const CONFIG_FILE_NAMES: &[&str] = &["Makefile", "Dockerfile", "Justfile"];

const DOC_EXTENSIONS: &[&str] = &["md", "rst", "txt", "adoc"];

fn normalized(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// True when `path` sits under one of the excluded prefixes.
pub fn under_excluded_prefix(path: &str) -> bool {
    let p = normalized(path);
    EXCLUDED_PREFIXES.iter().any(|pre| p.starts_with(pre))
}

/// Source-like file: declared extension and not under an excluded prefix.
pub fn is_source_file(path: &str) -> bool {
    let has_ext = extension(path)
        .map(|e| SOURCE_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false);
    has_ext && !under_excluded_prefix(path)
}

/// File the pattern guard should scan.
pub fn is_config_file(path: &str) -> bool {
    let p = normalized(path);
    if CONFIG_FILE_NAMES.contains(&file_name(&p)) {
        return true;
    }
    extension(&p)
        .map(|e| CONFIG_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or(false)
}

fn is_test_file(p: &str) -> bool {
    if p.starts_with("tests/") || p.starts_with("test/") || p.contains("/tests/") {
        return true;
    }
    let name = file_name(p);
    let stem = name.split('.').next().unwrap_or(name);
    name.starts_with("test_")
        || stem.ends_with("_test")
        || name.contains(".test.")
        || name.contains(".spec.")
}

fn is_doc_file(p: &str) -> bool {
    p.starts_with("docs/")
        || p.starts_with("doc/")
        || extension(p)
            .map(|e| DOC_EXTENSIONS.contains(&e.as_str()))
            .unwrap_or(false)
}

/// Classify a repo-relative path.
pub fn classify(path: &str) -> ArtifactKind {
    let p = normalized(path);
    if file_name(&p) == "COMMIT_EDITMSG" {
        return ArtifactKind::CommitMessage;
    }
    if is_test_file(&p) {
        return ArtifactKind::Test;
    }
    if is_doc_file(&p) {
        return ArtifactKind::Documentation;
    }
    if is_config_file(&p) {
        return ArtifactKind::Config;
    }
    if is_source_file(&p) {
        return ArtifactKind::Source;
    }
    ArtifactKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_kinds() {
        assert_eq!(classify("src/app.py"), ArtifactKind::Source);
        assert_eq!(classify("./src/app.py"), ArtifactKind::Source);
        assert_eq!(classify("README.md"), ArtifactKind::Documentation);
        assert_eq!(classify("docs/intro.md"), ArtifactKind::Documentation);
        assert_eq!(classify("tests/test_app.py"), ArtifactKind::Test);
        assert_eq!(classify("src/app_test.go"), ArtifactKind::Test);
        assert_eq!(classify("web/button.spec.ts"), ArtifactKind::Test);
        assert_eq!(classify(".github/workflows/ci.yml"), ArtifactKind::Config);
        assert_eq!(classify("Makefile"), ArtifactKind::Config);
        assert_eq!(classify("package.json"), ArtifactKind::Config);
        assert_eq!(classify(".git/COMMIT_EDITMSG"), ArtifactKind::CommitMessage);
        assert_eq!(classify("assets/logo.png"), ArtifactKind::Other);
        // source extension under a build prefix is not source
        assert_eq!(classify("dist/bundle.js"), ArtifactKind::Other);
    }

    #[test]
    fn test_source_filter() {
        assert!(is_source_file("src/app.py"));
        assert!(is_source_file("lib/Main.JAVA"));
        assert!(!is_source_file("venv/lib/site.py"));
        assert!(!is_source_file(".taskmaster/scripts/x.js"));
        assert!(!is_source_file("notes.md"));
    }
}
