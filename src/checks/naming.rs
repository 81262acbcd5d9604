//! Identifier naming checks for Python sources.
//!
//! Declarations are extracted with the tree-sitter Python grammar:
//! classes, functions, methods (functions directly inside a class body),
//! parameters, and simple assignment targets. Module- and class-level
//! targets spelled in upper case are constants, everything else assigned is
//! a variable. Methods use the `function` expression.

use super::{compile, CheckError, Checker, CheckerId, Payload};
use crate::classify::ArtifactKind;
use crate::config::{ConfigError, NamingRule};
use crate::models::{CheckerResult, Finding};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentKind {
    Class,
    Function,
    Method,
    Variable,
    Parameter,
    Constant,
}

impl IdentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentKind::Class => "class",
            IdentKind::Function => "function",
            IdentKind::Method => "method",
            IdentKind::Variable => "variable",
            IdentKind::Parameter => "parameter",
            IdentKind::Constant => "constant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A declared identifier with its 1-based line.
pub struct Declaration {
    pub kind: IdentKind,
    pub name: String,
    pub line: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    Class,
    Function,
}

pub struct NamingChecker {
    class: Option<(Regex, String)>,
    function: Option<(Regex, String)>,
    variable: Option<(Regex, String)>,
    constant: Option<(Regex, String)>,
    parameter: Option<(Regex, String)>,
    repo_root: PathBuf,
}

fn optional(field: &str, pattern: &str) -> Result<Option<(Regex, String)>, ConfigError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Ok(Some((compile(field, pattern)?, pattern.to_string())))
}

impl NamingChecker {
    pub fn new(rule: &NamingRule, repo_root: &Path) -> Result<Self, ConfigError> {
        Ok(NamingChecker {
            class: optional("naming.class", &rule.class)?,
            function: optional("naming.function", &rule.function)?,
            variable: optional("naming.variable", &rule.variable)?,
            constant: optional("naming.constant", &rule.constant)?,
            parameter: optional("naming.parameter", &rule.parameter)?,
            repo_root: repo_root.to_path_buf(),
        })
    }

    fn rule_for(&self, kind: IdentKind) -> Option<&(Regex, String)> {
        match kind {
            IdentKind::Class => self.class.as_ref(),
            IdentKind::Function | IdentKind::Method => self.function.as_ref(),
            IdentKind::Variable => self.variable.as_ref(),
            IdentKind::Constant => self.constant.as_ref(),
            IdentKind::Parameter => self.parameter.as_ref(),
        }
    }

    /// Check the declarations of one Python source text.
    pub fn check_source(&self, source: &str, shown: &str, out: &mut CheckerResult) {
        for decl in extract_declarations(source) {
            let Some((re, pattern)) = self.rule_for(decl.kind) else {
                continue;
            };
            let bare = decl.name.trim_start_matches('_');
            if bare.is_empty() || re.is_match(bare) {
                continue;
            }
            out.push(
                Finding::error(format!(
                    "{} '{}' does not match the naming convention",
                    capitalize(decl.kind.as_str()),
                    decl.name
                ))
                .in_file(shown.to_string())
                .at_line(decl.line)
                .with_help(format!("expected {}", pattern)),
            );
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
        None => String::new(),
    }
}

/// Parse Python source and list declared identifiers in source order.
/// Returns nothing when the grammar cannot be loaded or parsing fails.
pub fn extract_declarations(source: &str) -> Vec<Declaration> {
    let mut parser = Parser::new();
    if parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .is_err()
    {
        return Vec::new();
    }
    let Some(tree) = parser.parse(source, None) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    visit(tree.root_node(), source.as_bytes(), &mut out);
    out
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

fn looks_constant(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_alphabetic()) && !name.chars().any(|c| c.is_lowercase())
}

fn record(out: &mut Vec<Declaration>, kind: IdentKind, node: Node, src: &[u8]) {
    let Ok(name) = node.utf8_text(src) else {
        return;
    };
    if is_dunder(name) || name == "_" {
        return;
    }
    out.push(Declaration {
        kind,
        name: name.to_string(),
        line: node.start_position().row + 1,
    });
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Depth-first walk over an explicit stack; source nesting never grows the
/// thread stack. Children are pushed in reverse to keep source order.
fn visit(root: Node, src: &[u8], out: &mut Vec<Declaration>) {
    let mut stack = vec![(root, Scope::Module)];
    while let Some((node, scope)) = stack.pop() {
        match node.kind() {
            "class_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    record(out, IdentKind::Class, name, src);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    stack.push((body, Scope::Class));
                }
            }
            "function_definition" => {
                let kind = if scope == Scope::Class {
                    IdentKind::Method
                } else {
                    IdentKind::Function
                };
                if let Some(name) = node.child_by_field_name("name") {
                    record(out, kind, name, src);
                }
                if let Some(params) = node.child_by_field_name("parameters") {
                    visit_parameters(params, src, out);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    stack.push((body, Scope::Function));
                }
            }
            "assignment" => {
                if let Some(left) = node.child_by_field_name("left") {
                    visit_targets(left, scope, src, out);
                }
                // `a = b = 1` nests the second target on the right.
                if let Some(right) = node.child_by_field_name("right") {
                    if right.kind() == "assignment" {
                        stack.push((right, scope));
                    }
                }
            }
            _ => {
                for child in children(node).into_iter().rev() {
                    stack.push((child, scope));
                }
            }
        }
    }
}

fn visit_targets(target: Node, scope: Scope, src: &[u8], out: &mut Vec<Declaration>) {
    let mut stack = vec![target];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "identifier" => {
                let constant = scope != Scope::Function
                    && node
                        .utf8_text(src)
                        .map(looks_constant)
                        .unwrap_or(false);
                let kind = if constant {
                    IdentKind::Constant
                } else {
                    IdentKind::Variable
                };
                record(out, kind, node, src);
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                stack.extend(children(node).into_iter().rev());
            }
            // attribute and subscript targets declare nothing new
            _ => {}
        }
    }
}

fn visit_parameters(params: Node, src: &[u8], out: &mut Vec<Declaration>) {
    for p in children(params) {
        let ident = match p.kind() {
            "identifier" => Some(p),
            "default_parameter" | "typed_default_parameter" => p.child_by_field_name("name"),
            "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                children(p).into_iter().find(|c| c.kind() == "identifier")
            }
            _ => None,
        };
        if let Some(id) = ident {
            if matches!(id.utf8_text(src), Ok("self") | Ok("cls")) {
                continue;
            }
            record(out, IdentKind::Parameter, id, src);
        }
    }
}

impl Checker for NamingChecker {
    fn id(&self) -> CheckerId {
        CheckerId::Naming
    }

    fn accepts(&self) -> &'static [ArtifactKind] {
        &[ArtifactKind::Source]
    }

    fn check(&self, payload: Payload<'_>, out: &mut CheckerResult) -> Result<(), CheckError> {
        let Payload::Files(files) = payload else {
            return Ok(());
        };
        for f in files.iter().filter(|f| f.path.ends_with(".py")) {
            let Ok(source) = fs::read_to_string(self.repo_root.join(&f.path)) else {
                continue;
            };
            self.check_source(&source, &f.path, out);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
MAX_RETRIES = 3
default_timeout = 10

class user_profile:
    KIND = "user"

    def __init__(self, userName, age=0):
        self.name = userName

    def getName(self):
        return self.name

def load_all(path, *args, **kwargs):
    total, Count = 0, 1
    return total

class Loader:
    pass
"#;

    fn decls() -> Vec<(IdentKind, String, usize)> {
        extract_declarations(SAMPLE)
            .into_iter()
            .map(|d| (d.kind, d.name, d.line))
            .collect()
    }

    #[test]
    fn test_extracts_kinds_in_order() {
        let d = decls();
        assert!(d.contains(&(IdentKind::Constant, "MAX_RETRIES".into(), 2)));
        assert!(d.contains(&(IdentKind::Variable, "default_timeout".into(), 3)));
        assert!(d.contains(&(IdentKind::Class, "user_profile".into(), 5)));
        assert!(d.contains(&(IdentKind::Constant, "KIND".into(), 6)));
        assert!(d.contains(&(IdentKind::Parameter, "userName".into(), 8)));
        assert!(d.contains(&(IdentKind::Parameter, "age".into(), 8)));
        assert!(d.contains(&(IdentKind::Method, "getName".into(), 11)));
        assert!(d.contains(&(IdentKind::Function, "load_all".into(), 14)));
        assert!(d.contains(&(IdentKind::Parameter, "args".into(), 14)));
        assert!(d.contains(&(IdentKind::Parameter, "kwargs".into(), 14)));
        assert!(d.contains(&(IdentKind::Variable, "Count".into(), 15)));
        // dunder methods and self are skipped
        assert!(!d.iter().any(|(_, n, _)| n == "__init__" || n == "self"));
    }

    #[test]
    fn test_mismatches_become_errors() {
        let c = NamingChecker::new(&NamingRule::default(), Path::new(".")).unwrap();
        let mut out = CheckerResult::new("naming");
        c.check_source(SAMPLE, "src/app.py", &mut out);
        let named: Vec<&str> = out
            .errors
            .iter()
            .map(|f| f.message.split('\'').nth(1).unwrap_or(""))
            .collect();
        assert_eq!(named, vec!["user_profile", "userName", "getName", "Count"]);
        let first = &out.errors[0];
        assert_eq!(first.file.as_deref(), Some("src/app.py"));
        assert_eq!(first.line, Some(5));
        assert_eq!(first.help.as_deref(), Some("expected ^[A-Z][A-Za-z0-9]*$"));
    }

    #[test]
    fn test_chained_assignment_checks_every_target() {
        let d = extract_declarations("a = badName = 1\n");
        let names: Vec<&str> = d.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "badName"]);
        assert!(d.iter().all(|d| d.kind == IdentKind::Variable));

        let c = NamingChecker::new(&NamingRule::default(), Path::new(".")).unwrap();
        let mut out = CheckerResult::new("naming");
        c.check_source("a = badName = 1\n", "a.py", &mut out);
        assert_eq!(out.errors.len(), 1);
        assert!(out.errors[0].message.contains("badName"));
    }

    #[test]
    fn test_deeply_nested_source_does_not_exhaust_stack() {
        let depth = 20_000;
        let source = format!(
            "{}1{}\nbadName = 1\n",
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let d = extract_declarations(&source);
        assert!(d
            .iter()
            .any(|d| d.name == "badName" && d.kind == IdentKind::Variable));
    }

    #[test]
    fn test_empty_pattern_disables_kind() {
        let rule = NamingRule {
            parameter: String::new(),
            ..NamingRule::default()
        };
        let c = NamingChecker::new(&rule, Path::new(".")).unwrap();
        let mut out = CheckerResult::new("naming");
        c.check_source("def f(camelCase):\n    pass\n", "a.py", &mut out);
        assert!(out.passed());
    }

    #[test]
    fn test_leading_underscores_stripped() {
        let c = NamingChecker::new(&NamingRule::default(), Path::new(".")).unwrap();
        let mut out = CheckerResult::new("naming");
        c.check_source("_CACHE = {}\ndef _helper():\n    pass\n", "a.py", &mut out);
        assert!(out.passed());
    }
}
