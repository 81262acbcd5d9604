//! Task file schema (read-only view of `.taskmaster/tasks/tasks.json`).

use serde::Deserialize;
use serde_json::Value as Json;
use std::collections::HashMap;

#[derive(Deserialize, Debug, Default)]
/// Top-level task state document.
pub struct TaskFile {
    #[serde(default)]
    pub state: TaskState,
    #[serde(default)]
    pub tags: HashMap<String, TagTasks>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TaskState {
    #[serde(rename = "currentTag", default)]
    pub current_tag: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct TagTasks {
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
}

#[derive(Deserialize, Debug)]
/// A single task. `id` may be written as a string or a number.
pub struct TaskEntry {
    pub id: Json,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

impl TaskFile {
    /// Tag named by `state.currentTag`, defaulting to `master`.
    pub fn current_tag(&self) -> &str {
        self.state.current_tag.as_deref().unwrap_or("master")
    }
}

impl TaskEntry {
    pub fn id_str(&self) -> String {
        match &self.id {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Bootstrap task: id `0` or `task-0` (case-insensitive).
    pub fn is_bootstrap(&self) -> bool {
        let id = self.id_str();
        let id = id.trim();
        id == "0" || id.eq_ignore_ascii_case("task-0")
    }
}
