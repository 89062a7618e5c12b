use chrono::{DateTime, Utc};

use crate::io::store::{KeyValueStore, TASKS_KEY, THEME_KEY};
use crate::model::{EditSession, Filter, Task};
use crate::ops::task_ops::{self, Progress, TaskError};
use crate::parse::{parse_tasks, parse_theme, serialize_tasks, serialize_theme};

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug)]
pub struct TaskListView<'a> {
    pub visible: Vec<&'a Task>,
    pub progress: Progress,
    pub filter: Filter,
    pub dark: bool,
    pub edit: Option<&'a EditSession>,
}

/// Owns the task list, the filter, the edit session, and the theme flag.
///
/// Task and theme changes are written to the store right away. Writes are
/// best-effort: a failed save leaves the in-memory state as it is.
pub struct TaskListController<S: KeyValueStore> {
    tasks: Vec<Task>,
    filter: Filter,
    edit: Option<EditSession>,
    dark: bool,
    last_issued: u64,
    store: S,
}

impl<S: KeyValueStore> TaskListController<S> {
    /// Load persisted state, falling back to an empty list and the light theme.
    pub fn load(store: S) -> Self {
        let tasks = read_tasks(&store);
        let dark = read_theme(&store);
        TaskListController {
            tasks,
            filter: Filter::default(),
            edit: None,
            dark,
            last_issued: 0,
            store,
        }
    }

    /// Re-read tasks and theme from the store (after an external write).
    /// The filter is kept; an edit session whose task is gone is dropped.
    pub fn reload(&mut self) {
        self.tasks = read_tasks(&self.store);
        self.dark = read_theme(&self.store);
        if let Some(session) = &self.edit
            && task_ops::find_task(&self.tasks, &session.task_id).is_none()
        {
            self.edit = None;
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    // -----------------------------------------------------------------------
    // Task mutations
    // -----------------------------------------------------------------------

    /// Add a task at the top of the list. Returns its ID.
    pub fn add(&mut self, text: &str) -> Result<String, TaskError> {
        self.add_at(text, Utc::now())
    }

    /// Add with an explicit creation time
    pub fn add_at(&mut self, text: &str, now: DateTime<Utc>) -> Result<String, TaskError> {
        let id = task_ops::next_id(&self.tasks, self.last_issued, now);
        let assigned = task_ops::add_task(&mut self.tasks, text, id, now)?;
        self.last_issued = id;
        self.persist();
        Ok(assigned)
    }

    /// Flip a task's completed flag. Returns the new value.
    pub fn toggle(&mut self, id: &str) -> Result<bool, TaskError> {
        let completed = task_ops::toggle_task(&mut self.tasks, id)?;
        self.persist();
        Ok(completed)
    }

    /// Delete a task. An edit session on it is dropped.
    pub fn delete(&mut self, id: &str) -> Result<Task, TaskError> {
        let removed = task_ops::delete_task(&mut self.tasks, id)?;
        if self.edit.as_ref().is_some_and(|s| s.task_id == id) {
            self.edit = None;
        }
        self.store.report_deleted(&removed);
        self.persist();
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Edit session
    // -----------------------------------------------------------------------

    /// Start editing `id` with `current_text` as the draft, replacing any
    /// session already in progress.
    pub fn begin_edit(&mut self, id: &str, current_text: &str) -> Result<(), TaskError> {
        if task_ops::find_task(&self.tasks, id).is_none() {
            return Err(TaskError::NotFound(id.to_string()));
        }
        self.edit = Some(EditSession {
            task_id: id.to_string(),
            draft: current_text.to_string(),
        });
        Ok(())
    }

    /// Replace the draft text of the current session
    pub fn update_draft(&mut self, text: &str) {
        if let Some(session) = &mut self.edit {
            session.draft = text.to_string();
        }
    }

    /// Apply the draft to its task and end the session.
    ///
    /// Returns `Ok(false)` when no session was open. A blank draft is
    /// rejected with `EmptyText`: the task keeps its text and the session
    /// stays open.
    pub fn commit_edit(&mut self) -> Result<bool, TaskError> {
        let Some(session) = self.edit.take() else {
            return Ok(false);
        };
        if let Err(e) = task_ops::set_text(&mut self.tasks, &session.task_id, &session.draft) {
            if e == TaskError::EmptyText {
                self.edit = Some(session);
            }
            return Err(e);
        }
        self.persist();
        Ok(true)
    }

    /// End the session without touching any task
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // -----------------------------------------------------------------------
    // View state
    // -----------------------------------------------------------------------

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Flip the theme flag. Returns the new value.
    pub fn toggle_theme(&mut self) -> bool {
        self.set_theme(!self.dark);
        self.dark
    }

    pub fn set_theme(&mut self, dark: bool) {
        self.dark = dark;
        self.persist();
    }

    // -----------------------------------------------------------------------
    // Derived queries
    // -----------------------------------------------------------------------

    /// Tasks passing the current filter, in list order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        task_ops::visible_tasks(&self.tasks, self.filter)
    }

    pub fn progress(&self) -> Progress {
        task_ops::progress(&self.tasks)
    }

    /// Snapshot for rendering
    pub fn view(&self) -> TaskListView<'_> {
        TaskListView {
            visible: self.visible_tasks(),
            progress: self.progress(),
            filter: self.filter,
            dark: self.dark,
            edit: self.edit.as_ref(),
        }
    }

    fn persist(&mut self) {
        let _ = self.store.save(TASKS_KEY, &serialize_tasks(&self.tasks));
        let _ = self.store.save(THEME_KEY, &serialize_theme(self.dark));
    }
}

fn read_tasks<S: KeyValueStore>(store: &S) -> Vec<Task> {
    let Some(blob) = store.load(TASKS_KEY) else {
        return Vec::new();
    };
    match parse_tasks(&blob) {
        Ok((tasks, dropped)) => {
            if !dropped.is_empty() {
                store.report_unreadable(
                    TASKS_KEY,
                    &dropped.join("\n"),
                    &format!("dropped {} invalid task entries", dropped.len()),
                );
            }
            tasks
        }
        Err(e) => {
            store.report_unreadable(TASKS_KEY, &blob, &e.to_string());
            Vec::new()
        }
    }
}

fn read_theme<S: KeyValueStore>(store: &S) -> bool {
    let Some(blob) = store.load(THEME_KEY) else {
        return false;
    };
    parse_theme(&blob).unwrap_or_else(|e| {
        store.report_unreadable(THEME_KEY, &blob, &e.to_string());
        false
    })
}
