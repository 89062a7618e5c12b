use std::collections::HashSet;

use serde_json::Value;

use crate::model::task::Task;

/// Error decoding a persisted blob
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of tasks")]
    NotAnArray,
}

/// Serialize the task list for the `todos` key
pub fn serialize_tasks(tasks: &[Task]) -> String {
    // Vec<Task> of plain strings/bools/timestamps cannot fail to encode
    serde_json::to_string(tasks).unwrap_or_else(|_| "[]".to_string())
}

/// Parse the `todos` blob.
///
/// Entries that do not decode as a task, have blank text, or repeat an
/// earlier ID are dropped; their raw JSON is returned alongside the tasks so
/// the caller can keep a copy.
pub fn parse_tasks(blob: &str) -> Result<(Vec<Task>, Vec<String>), DecodeError> {
    let value: Value = serde_json::from_str(blob)?;
    let Value::Array(entries) = value else {
        return Err(DecodeError::NotAnArray);
    };

    let mut tasks = Vec::with_capacity(entries.len());
    let mut dropped = Vec::new();
    let mut seen = HashSet::new();
    for entry in entries {
        match serde_json::from_value::<Task>(entry.clone()) {
            Ok(mut task) if !task.text.trim().is_empty() && seen.insert(task.id.clone()) => {
                task.text = task.text.trim().to_string();
                tasks.push(task);
            }
            _ => dropped.push(entry.to_string()),
        }
    }
    Ok((tasks, dropped))
}

/// Serialize the theme flag for the `darkMode` key
pub fn serialize_theme(dark: bool) -> String {
    dark.to_string()
}

/// Parse the `darkMode` blob
pub fn parse_theme(blob: &str) -> Result<bool, DecodeError> {
    Ok(serde_json::from_str(blob.trim())?)
}
