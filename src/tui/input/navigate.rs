use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Filter;
use crate::tui::app::{App, LineInput, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('c') {
            app.should_quit = true;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Movement
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor = app.visible_len().saturating_sub(1);
        }

        // Task actions
        KeyCode::Char('a') | KeyCode::Char('n') => {
            app.input.clear();
            app.mode = Mode::Add;
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => toggle_cursor_task(app),
        KeyCode::Char('d') | KeyCode::Delete => delete_cursor_task(app),
        KeyCode::Char('e') | KeyCode::Enter => begin_edit_cursor_task(app),

        // Filters
        KeyCode::Char('1') => app.set_filter(Filter::All),
        KeyCode::Char('2') => app.set_filter(Filter::Active),
        KeyCode::Char('3') => app.set_filter(Filter::Completed),
        KeyCode::Tab => app.set_filter(app.controller.filter().next()),
        KeyCode::BackTab => app.set_filter(app.controller.filter().prev()),

        KeyCode::Char('t') => {
            app.controller.toggle_theme();
            app.sync_theme();
        }
        _ => {}
    }
}

fn cursor_task_id(app: &App) -> Option<String> {
    app.cursor_task().map(|t| t.id.clone())
}

fn toggle_cursor_task(app: &mut App) {
    let Some(id) = cursor_task_id(app) else {
        return;
    };
    let _ = app.controller.toggle(&id);
    // Under Active/Completed the task may have left the view
    app.clamp_cursor();
}

fn delete_cursor_task(app: &mut App) {
    let Some(id) = cursor_task_id(app) else {
        return;
    };
    let _ = app.controller.delete(&id);
    app.clamp_cursor();
}

fn begin_edit_cursor_task(app: &mut App) {
    let Some((id, text)) = app.cursor_task().map(|t| (t.id.clone(), t.text.clone())) else {
        return;
    };
    if app.controller.begin_edit(&id, &text).is_ok() {
        app.input = LineInput::with_text(&text);
        app.mode = Mode::Edit;
    }
}
