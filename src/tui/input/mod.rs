mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

use edit::handle_text_input;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Add | Mode::Edit => handle_text_input(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Filter;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn texts(app: &App) -> Vec<String> {
        app.controller
            .visible_tasks()
            .iter()
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn add_mode_adds_and_stays_open() {
        let mut app = app_with_tasks(&[]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Add);

        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "Call mom");
        press(&mut app, KeyCode::Enter);

        assert_eq!(texts(&app), vec!["Call mom", "Buy milk"]);
        assert_eq!(app.mode, Mode::Add);
        assert!(app.input.text.is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn add_blank_is_ignored() {
        let mut app = app_with_tasks(&[]);
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);
        assert!(app.controller.tasks().is_empty());
        assert_eq!(app.input.text, "   ");
    }

    #[test]
    fn navigate_and_toggle() {
        let mut app = app_with_tasks(&[("First", false), ("Second", false)]);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor, 1);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.cursor, 1);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.controller.tasks()[1].completed);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.controller.tasks()[1].completed);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.cursor, 1);
    }

    #[test]
    fn edit_commit_and_cancel() {
        let mut app = app_with_tasks(&[("Buy milk", false)]);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.controller.edit_session().unwrap().draft, "Buy milk");

        type_str(&mut app, " today");
        assert_eq!(
            app.controller.edit_session().unwrap().draft,
            "Buy milk today"
        );
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(texts(&app), vec!["Buy milk today"]);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Edit);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.controller.edit_session().is_none());
        assert_eq!(texts(&app), vec!["Buy milk today"]);
    }

    #[test]
    fn edit_to_blank_keeps_text() {
        let mut app = app_with_tasks(&[("Keep", false)]);
        press(&mut app, KeyCode::Char('e'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(texts(&app), vec!["Keep"]);
        assert_eq!(app.controller.edit_session().unwrap().draft, "");

        type_str(&mut app, "Kept");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(texts(&app), vec!["Kept"]);
        assert!(app.controller.edit_session().is_none());
    }

    #[test]
    fn delete_clamps_cursor() {
        let mut app = app_with_tasks(&[("A", false), ("B", false)]);
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(texts(&app), vec!["A"]);
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Delete);
        assert!(app.controller.tasks().is_empty());
        // Nothing left to delete
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn filter_keys() {
        let mut app = app_with_tasks(&[("Open", false), ("Done", true)]);
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.controller.filter(), Filter::Active);
        assert_eq!(texts(&app), vec!["Open"]);
        assert_eq!(app.cursor, 0);

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(texts(&app), vec!["Done"]);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.controller.filter(), Filter::All);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.controller.filter(), Filter::Completed);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.controller.filter(), Filter::All);
    }

    #[test]
    fn theme_toggle_updates_palette() {
        let mut app = app_with_tasks(&[]);
        let light_bg = app.theme.background;
        press(&mut app, KeyCode::Char('t'));
        assert!(app.controller.is_dark());
        assert_ne!(app.theme.background, light_bg);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = app_with_tasks(&[("A", false)]);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.controller.tasks().len(), 1);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn quit_keys() {
        let mut app = app_with_tasks(&[]);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = app_with_tasks(&[]);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
