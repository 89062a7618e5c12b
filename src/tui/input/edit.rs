use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::task_ops::TaskError;
use crate::tui::app::{App, Mode};

/// Line editing for Add and Edit modes. Enter submits, Esc leaves.
pub(super) fn handle_text_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            submit(app);
            return;
        }
        KeyCode::Esc => {
            leave(app);
            return;
        }
        _ => {}
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let changed = match key.code {
        KeyCode::Char('a') if ctrl => {
            app.input.home();
            false
        }
        KeyCode::Char('e') if ctrl => {
            app.input.end();
            false
        }
        KeyCode::Char('u') if ctrl => {
            app.input.kill_to_start();
            true
        }
        KeyCode::Char(_) if ctrl => false,
        KeyCode::Char(c) => {
            app.input.insert(c);
            true
        }
        KeyCode::Backspace => {
            app.input.backspace();
            true
        }
        KeyCode::Delete => {
            app.input.delete_forward();
            true
        }
        KeyCode::Left => {
            app.input.left();
            false
        }
        KeyCode::Right => {
            app.input.right();
            false
        }
        KeyCode::Home => {
            app.input.home();
            false
        }
        KeyCode::End => {
            app.input.end();
            false
        }
        _ => false,
    };

    if changed && app.mode == Mode::Edit {
        app.controller.update_draft(&app.input.text);
    }
}

fn submit(app: &mut App) {
    match app.mode {
        Mode::Add => {
            if app.controller.add(&app.input.text).is_ok() {
                app.input.clear();
                app.cursor = 0;
                app.clamp_cursor();
            }
        }
        Mode::Edit => {
            // A blank draft is rejected and the edit stays open
            if app.controller.commit_edit() != Err(TaskError::EmptyText) {
                app.input.clear();
                app.mode = Mode::Navigate;
            }
        }
        Mode::Navigate => {}
    }
}

fn leave(app: &mut App) {
    if app.mode == Mode::Edit {
        app.controller.cancel_edit();
    }
    app.input.clear();
    app.mode = Mode::Navigate;
}
