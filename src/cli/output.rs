use serde::Serialize;

use crate::model::task::Task;
use crate::ops::task_ops::Progress;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub percent: u8,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub dark: bool,
}

#[derive(Serialize)]
pub struct ClearedJson {
    pub removed: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        created_at: task.created_at.to_rfc3339(),
    }
}

pub fn stats_to_json(progress: Progress) -> StatsJson {
    StatsJson {
        total: progress.total,
        completed: progress.completed,
        active: progress.total - progress.completed,
        percent: progress.percent(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    format!("{} {}  {}", task.checkbox(), task.id, task.text)
}

/// "2 of 5 done (40%)"
pub fn format_stats(progress: Progress) -> String {
    format!(
        "{} of {} done ({}%)",
        progress.completed,
        progress.total,
        progress.percent()
    )
}

pub fn theme_name(dark: bool) -> &'static str {
    if dark { "dark" } else { "light" }
}
