use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::controller::TaskListController;
use crate::io::config_io::{read_config, resolve_data_dir};
use crate::io::store::{FileStore, KeyValueStore};
use crate::io::watcher::StoreWatcher;
use crate::model::{Config, Filter, Task};
use crate::util::unicode;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task in the status row
    Add,
    /// Editing the task under the cursor in place
    Edit,
}

/// A single-line text input with a grapheme-aware cursor (byte offset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    pub text: String,
    pub cursor: usize,
}

impl LineInput {
    /// Input pre-filled with `text`, cursor at the end
    pub fn with_text(text: &str) -> Self {
        LineInput {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Delete everything before the cursor
    pub fn kill_to_start(&mut self) {
        self.text.replace_range(..self.cursor, "");
        self.cursor = 0;
    }

    /// Text before and after the cursor
    pub fn split(&self) -> (&str, &str) {
        self.text.split_at(self.cursor)
    }
}

/// Main application state
pub struct App {
    pub controller: TaskListController<Box<dyn KeyValueStore>>,
    pub config: Config,
    pub theme: Theme,
    pub mode: Mode,
    /// Index into the visible (filtered) list
    pub cursor: usize,
    /// First visible row of the list
    pub scroll_offset: usize,
    /// New-task text in Add mode, the draft in Edit mode
    pub input: LineInput,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: TaskListController<Box<dyn KeyValueStore>>, config: Config) -> Self {
        let theme = Theme::for_flag(controller.is_dark(), &config.ui);
        App {
            controller,
            config,
            theme,
            mode: Mode::Navigate,
            cursor: 0,
            scroll_offset: 0,
            input: LineInput::default(),
            show_help: false,
            should_quit: false,
        }
    }

    /// Number of tasks passing the current filter
    pub fn visible_len(&self) -> usize {
        self.controller.visible_tasks().len()
    }

    /// The task under the cursor
    pub fn cursor_task(&self) -> Option<&Task> {
        self.controller.visible_tasks().get(self.cursor).copied()
    }

    /// Keep the cursor on a visible row
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.visible_len().saturating_sub(1));
    }

    /// Move the cursor by `delta` rows, stopping at either end
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.controller.set_filter(filter);
        self.clamp_cursor();
    }

    /// Rebuild the palette after the theme flag changed
    pub fn sync_theme(&mut self) {
        self.theme = Theme::for_flag(self.controller.is_dark(), &self.config.ui);
    }

    /// Pick up writes made by another process
    pub fn reload(&mut self) {
        self.controller.reload();
        if self.mode == Mode::Edit && self.controller.edit_session().is_none() {
            self.mode = Mode::Navigate;
            self.input.clear();
        }
        self.clamp_cursor();
        self.sync_theme();
    }
}

/// Run the TUI against the data directory (flag, `$TICK_DIR`, or platform default)
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = read_config(&data_dir)?;
    let store = FileStore::open(&data_dir)?;
    let controller = TaskListController::load(Box::new(store) as Box<dyn KeyValueStore>);
    let mut app = App::new(controller, config);

    // Reloading on external writes is a nicety; run without it if the
    // platform watcher is unavailable
    let watcher = StoreWatcher::start(&data_dir).ok();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if let Some(w) = watcher
            && !w.poll().is_empty()
        {
            app.reload();
        }

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_input_editing() {
        let mut input = LineInput::default();
        for c in "milk".chars() {
            input.insert(c);
        }
        input.home();
        for c in "oat ".chars() {
            input.insert(c);
        }
        assert_eq!(input.text, "oat milk");
        assert_eq!(input.split(), ("oat ", "milk"));

        input.end();
        input.backspace();
        assert_eq!(input.text, "oat mil");

        input.left();
        input.left();
        input.delete_forward();
        assert_eq!(input.text, "oat ml");

        input.kill_to_start();
        assert_eq!(input.text, "ml");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn line_input_respects_graphemes() {
        let mut input = LineInput::with_text("cafe\u{301}");
        input.backspace();
        assert_eq!(input.text, "caf");
        input.left();
        input.right();
        input.right();
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn line_input_edges_are_noops() {
        let mut input = LineInput::default();
        input.backspace();
        input.delete_forward();
        input.left();
        input.right();
        assert_eq!(input, LineInput::default());
    }
}
