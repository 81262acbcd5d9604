//! Task-0 gate: no real source changes while the bootstrap task is open.

use super::{CheckError, Checker, CheckerId, Payload};
use crate::classify::{is_source_file, ArtifactKind};
use crate::config::Task0Rule;
use crate::models::tasks::TaskFile;
use crate::models::{CheckerResult, Finding, Level};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct Task0Checker {
    strict_mode: bool,
    tasks_file: PathBuf,
    shown_path: String,
}

impl Task0Checker {
    pub fn new(rule: &Task0Rule, repo_root: &Path) -> Self {
        Task0Checker {
            strict_mode: rule.strict_mode,
            tasks_file: repo_root.join(&rule.tasks_file_path),
            shown_path: rule.tasks_file_path.clone(),
        }
    }

    /// Gate the given staged paths against the task file.
    pub fn check_paths<'a, I>(&self, paths: I, out: &mut CheckerResult)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let sources: Vec<&str> = paths.into_iter().filter(|p| is_source_file(p)).collect();
        if sources.is_empty() {
            return;
        }

        // Whole-file read: the handle is closed before parsing starts.
        let text = match fs::read_to_string(&self.tasks_file) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                out.push(
                    Finding::warning(format!(
                        "Task file {} not found; Task-0 gate skipped",
                        self.shown_path
                    ))
                    .in_file(self.shown_path.clone()),
                );
                return;
            }
            Err(e) => {
                out.push(
                    Finding::error(format!("Cannot read task file: {}", e))
                        .in_file(self.shown_path.clone()),
                );
                return;
            }
        };
        let tasks: TaskFile = match serde_json::from_str(&text) {
            Ok(t) => t,
            Err(e) => {
                out.push(
                    Finding::error(format!("Task file is not valid JSON: {}", e))
                        .in_file(self.shown_path.clone()),
                );
                return;
            }
        };

        let tag = tasks.current_tag();
        let Some(tag_tasks) = tasks.tags.get(tag) else {
            out.push(
                Finding::warning(format!("Tag '{}' not found in task file", tag))
                    .in_file(self.shown_path.clone()),
            );
            return;
        };
        let Some(task0) = tag_tasks.tasks.iter().find(|t| t.is_bootstrap()) else {
            out.push(
                Finding::warning(format!("No Task-0 found in tag '{}'", tag))
                    .in_file(self.shown_path.clone())
                    .with_help("create a bootstrap task with id 0 to enable the gate"),
            );
            return;
        };

        let status = task0.status.trim().to_lowercase();
        if status != "done" {
            let level = if self.strict_mode {
                Level::Error
            } else {
                Level::Warning
            };
            let preview: Vec<&str> = sources.iter().take(5).copied().collect();
            out.push(
                Finding::new(
                    level,
                    format!(
                        "Task-0 '{}' has status '{}'; finish it before changing source files",
                        task0.title, task0.status
                    ),
                )
                .with_help(format!(
                    "{} source file(s) staged: {}",
                    sources.len(),
                    preview.join(", ")
                )),
            );
        }
    }
}

impl Checker for Task0Checker {
    fn id(&self) -> CheckerId {
        CheckerId::Task0
    }

    fn accepts(&self) -> &'static [ArtifactKind] {
        ArtifactKind::FILES
    }

    fn check(&self, payload: Payload<'_>, out: &mut CheckerResult) -> Result<(), CheckError> {
        if let Payload::Files(files) = payload {
            self.check_paths(files.iter().map(|f| f.path.as_str()), out);
        }
        Ok(())
    }
}
