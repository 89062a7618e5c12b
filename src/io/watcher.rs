use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::store::{TASKS_KEY, THEME_KEY};

/// Events sent from the watcher to the TUI event loop.
#[derive(Debug)]
pub enum StoreEvent {
    /// One or more store files changed on disk.
    Changed(Vec<PathBuf>),
}

/// Watches a data directory for store files written by another process.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

/// Whether a path is one of the store's key files
pub fn is_store_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    [TASKS_KEY, THEME_KEY]
        .iter()
        .any(|key| name.strip_suffix(".json") == Some(*key))
}

impl StoreWatcher {
    /// Start watching `data_dir`. Call `poll()` each tick.
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }

                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| is_store_file(p))
                    .collect();
                if !relevant.is_empty() {
                    let _ = tx.send(StoreEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain queued events without blocking.
    pub fn poll(&self) -> Vec<StoreEvent> {
        self.rx.try_iter().collect()
    }
}
