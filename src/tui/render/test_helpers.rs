use chrono::{TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::controller::TaskListController;
use crate::io::store::{KeyValueStore, MemoryStore};
use crate::model::Config;
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 16;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Build an App over an in-memory store holding `tasks`, listed top to
/// bottom as `(text, completed)`.
pub fn app_with_tasks(tasks: &[(&str, bool)]) -> App {
    let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    let mut controller = TaskListController::load(store);
    for (i, (text, _)) in tasks.iter().enumerate().rev() {
        let created = Utc.timestamp_millis_opt(1_700_000_000_000 + i as i64).unwrap();
        controller.add_at(text, created).unwrap();
    }
    let ids: Vec<(String, bool)> = controller
        .tasks()
        .iter()
        .zip(tasks)
        .map(|(t, (_, done))| (t.id.clone(), *done))
        .collect();
    for (id, done) in ids {
        if done {
            controller.toggle(&id).unwrap();
        }
    }
    App::new(controller, Config::default())
}
