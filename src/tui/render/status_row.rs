use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

const NAVIGATE_HINT: &str = "a add  x toggle  e edit  d delete  ? help";
const ADD_HINT: &str = "Enter add  Esc done";
const EDIT_HINT: &str = "Enter save  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let hint = app.config.ui.show_key_hints.then_some(NAVIGATE_HINT);
            (Vec::new(), hint)
        }
        Mode::Add => {
            // Prompt: add: text▌
            let (before, after) = app.input.split();
            let spans = vec![
                Span::styled("add: ", Style::default().fg(app.theme.dim).bg(bg)),
                Span::styled(
                    before.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
                Span::styled(
                    after.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
            ];
            (spans, Some(ADD_HINT))
        }
        Mode::Edit => (Vec::new(), Some(EDIT_HINT)),
    };

    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
        let hint_width = unicode::display_width(hint) + 1;
        if content_width + hint_width <= width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
