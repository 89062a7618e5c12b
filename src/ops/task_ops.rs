use chrono::{DateTime, Utc};

use crate::model::filter::Filter;
use crate::model::task::Task;

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task text cannot be empty")]
    EmptyText,
}

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

/// Pick the next task ID.
///
/// IDs are millisecond timestamps rendered as decimal strings. If the clock
/// has not advanced past the highest ID already handed out (`last_issued`) or
/// present in the list, the next integer is used instead, so IDs stay unique
/// and strictly increasing.
///
/// Once the highest ID is `u64::MAX` there is no larger integer; the first
/// ID at or after the clock that no task holds is used instead.
pub fn next_id(tasks: &[Task], last_issued: u64, now: DateTime<Utc>) -> u64 {
    let candidate = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let floor = tasks
        .iter()
        .filter_map(|t| t.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        .max(last_issued);
    if candidate > floor {
        return candidate;
    }
    match floor.checked_add(1) {
        Some(next) => next,
        None => (candidate..=u64::MAX)
            .chain(0..candidate)
            .find(|n| find_task(tasks, &n.to_string()).is_none())
            .unwrap_or(candidate),
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Trim `text`, rejecting empty or whitespace-only input
fn clean_text(text: &str) -> Result<String, TaskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Prepend a new task. Returns the ID assigned to it.
pub fn add_task(
    tasks: &mut Vec<Task>,
    text: &str,
    id: u64,
    now: DateTime<Utc>,
) -> Result<String, TaskError> {
    let text = clean_text(text)?;
    let id = id.to_string();
    tasks.insert(0, Task::new(id.clone(), text, now));
    Ok(id)
}

/// Find a task by ID
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task, TaskError> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))
}

/// Flip a task's completed flag. Returns the new value.
pub fn toggle_task(tasks: &mut [Task], id: &str) -> Result<bool, TaskError> {
    let task = find_task_mut(tasks, id)?;
    task.completed = !task.completed;
    Ok(task.completed)
}

/// Remove a task, returning it
pub fn delete_task(tasks: &mut Vec<Task>, id: &str) -> Result<Task, TaskError> {
    let pos = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
    Ok(tasks.remove(pos))
}

/// Replace a task's text with the trimmed `text`.
/// Empty text is rejected and the task is left as it was.
pub fn set_text(tasks: &mut [Task], id: &str, text: &str) -> Result<(), TaskError> {
    let text = clean_text(text)?;
    let task = find_task_mut(tasks, id)?;
    task.text = text;
    Ok(())
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Tasks passing `filter`, in list order
pub fn visible_tasks(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

/// Completion counts for the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed share in `0.0..=1.0`; zero for an empty list
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// Completed share as a whole percentage, rounded down so that 100
    /// means every task is done
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u8
    }
}

/// Count completed and total tasks
pub fn progress(tasks: &[Task]) -> Progress {
    Progress {
        completed: tasks.iter().filter(|t| t.completed).count(),
        total: tasks.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn sample_tasks() -> Vec<Task> {
        let mut tasks = Vec::new();
        add_task(&mut tasks, "Write report", 100, at(100)).unwrap();
        add_task(&mut tasks, "Buy milk", 200, at(200)).unwrap();
        add_task(&mut tasks, "Call mom", 300, at(300)).unwrap();
        toggle_task(&mut tasks, "200").unwrap();
        tasks
    }

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.text.clone()).collect()
    }

    // --- IDs ---

    #[test]
    fn test_next_id_uses_clock() {
        assert_eq!(next_id(&[], 0, at(1_700_000_000_000)), 1_700_000_000_000);
    }

    #[test]
    fn test_next_id_never_repeats_within_same_millisecond() {
        let mut tasks = Vec::new();
        let now = at(5_000);
        let mut last = 0;
        for _ in 0..5 {
            let id = next_id(&tasks, last, now);
            add_task(&mut tasks, "same instant", id, now).unwrap();
            last = id;
        }
        let mut ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_next_id_skips_past_deleted_ids() {
        let mut tasks = Vec::new();
        add_task(&mut tasks, "gone soon", 9_000, at(9_000)).unwrap();
        delete_task(&mut tasks, "9000").unwrap();
        // Clock went backwards but 9000 was already handed out
        assert_eq!(next_id(&tasks, 9_000, at(8_000)), 9_001);
    }

    #[test]
    fn test_next_id_at_u64_max_picks_unused_id() {
        let mut tasks = Vec::new();
        add_task(&mut tasks, "huge", u64::MAX, at(1)).unwrap();
        assert_eq!(next_id(&tasks, 0, at(500)), 500);

        add_task(&mut tasks, "taken", 500, at(500)).unwrap();
        assert_eq!(next_id(&tasks, u64::MAX, at(500)), 501);
    }

    // --- Add ---

    #[test]
    fn test_add_prepends_trimmed_text() {
        let mut tasks = Vec::new();
        add_task(&mut tasks, "first", 1, at(1)).unwrap();
        let id = add_task(&mut tasks, "  second  ", 2, at(2)).unwrap();
        assert_eq!(id, "2");
        assert_eq!(tasks[0].text, "second");
        assert_eq!(tasks[1].text, "first");
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].created_at, at(2));
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        assert_eq!(add_task(&mut tasks, "", 9, at(9)), Err(TaskError::EmptyText));
        assert_eq!(add_task(&mut tasks, " \t\n ", 9, at(9)), Err(TaskError::EmptyText));
        assert_eq!(tasks, before);
    }

    // --- Toggle / delete ---

    #[test]
    fn test_toggle_twice_restores() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        assert_eq!(toggle_task(&mut tasks, "300"), Ok(true));
        assert_eq!(toggle_task(&mut tasks, "300"), Ok(false));
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        assert_eq!(
            toggle_task(&mut tasks, "nope"),
            Err(TaskError::NotFound("nope".into()))
        );
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_delete_removes_only_match() {
        let mut tasks = sample_tasks();
        let removed = delete_task(&mut tasks, "200").unwrap();
        assert_eq!(removed.text, "Buy milk");
        assert_eq!(tasks.len(), 2);
        assert!(find_task(&tasks, "200").is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_harmless() {
        let mut tasks = sample_tasks();
        let before = tasks.clone();
        assert!(delete_task(&mut tasks, "404").is_err());
        assert!(delete_task(&mut tasks, "404").is_err());
        assert_eq!(tasks, before);
    }

    // --- Text ---

    #[test]
    fn test_set_text_trims() {
        let mut tasks = sample_tasks();
        set_text(&mut tasks, "100", "  Finish report ").unwrap();
        assert_eq!(find_task(&tasks, "100").unwrap().text, "Finish report");
    }

    #[test]
    fn test_set_text_empty_keeps_original() {
        let mut tasks = sample_tasks();
        assert_eq!(set_text(&mut tasks, "100", "   "), Err(TaskError::EmptyText));
        assert_eq!(find_task(&tasks, "100").unwrap().text, "Write report");
    }

    // --- Views ---

    #[test]
    fn test_visible_tasks_per_filter() {
        let tasks = sample_tasks();
        assert_eq!(
            texts(&visible_tasks(&tasks, Filter::All)),
            vec!["Call mom", "Buy milk", "Write report"]
        );
        assert_eq!(
            texts(&visible_tasks(&tasks, Filter::Active)),
            vec!["Call mom", "Write report"]
        );
        assert_eq!(
            texts(&visible_tasks(&tasks, Filter::Completed)),
            vec!["Buy milk"]
        );
    }

    #[test]
    fn test_progress() {
        assert_eq!(progress(&[]).fraction(), 0.0);
        assert_eq!(progress(&[]).percent(), 0);

        let mut tasks = sample_tasks();
        let p = progress(&tasks);
        assert_eq!(p, Progress { completed: 1, total: 3 });
        assert_eq!(p.percent(), 33);

        toggle_task(&mut tasks, "100").unwrap();
        toggle_task(&mut tasks, "300").unwrap();
        assert_eq!(progress(&tasks).fraction(), 1.0);
        assert_eq!(progress(&tasks).percent(), 100);
    }

    #[test]
    fn test_percent_reaches_100_only_when_all_done() {
        let almost = Progress {
            completed: 199,
            total: 200,
        };
        assert_eq!(almost.percent(), 99);
        let two_thirds = Progress {
            completed: 2,
            total: 3,
        };
        assert_eq!(two_thirds.percent(), 66);
    }
}
