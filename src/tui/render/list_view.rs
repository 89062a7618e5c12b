use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{Filter, Task};
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Columns taken by the cursor marker and checkbox: "▸ [x] "
const PREFIX_WIDTH: usize = 6;

/// Message shown when the filtered list is empty
fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => " No tasks yet. Press a to add one.",
        Filter::Active => " Nothing left to do.",
        Filter::Completed => " Nothing completed yet.",
    }
}

/// Render the task list content area
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let visible_height = area.height as usize;
    let len = app.visible_len();

    if len == 0 {
        let empty = Paragraph::new(empty_message(app.controller.filter()))
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, area);
        return;
    }

    // Keep the cursor row on screen
    app.clamp_cursor();
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }
    app.scroll_offset = app.scroll_offset.min(len.saturating_sub(visible_height));

    let app = &*app;
    let tasks = app.controller.visible_tasks();
    let editing_id = match (app.mode, app.controller.edit_session()) {
        (Mode::Edit, Some(session)) => Some(session.task_id.as_str()),
        _ => None,
    };
    let end = len.min(app.scroll_offset + visible_height);

    let lines: Vec<Line> = tasks[app.scroll_offset..end]
        .iter()
        .zip(app.scroll_offset..end)
        .map(|(task, row)| {
            let is_editing = editing_id == Some(task.id.as_str());
            task_line(app, task, row == app.cursor, is_editing, area.width as usize)
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

fn task_line<'a>(
    app: &App,
    task: &Task,
    is_cursor: bool,
    is_editing: bool,
    width: usize,
) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let base = Style::default().bg(bg);

    let marker = if is_cursor { "\u{25B8} " } else { "  " };
    let check_style = if task.completed {
        base.fg(app.theme.green)
    } else {
        base.fg(app.theme.dim)
    };

    let mut spans = vec![
        Span::styled(marker, base.fg(app.theme.highlight)),
        Span::styled(task.checkbox(), check_style),
        Span::styled(" ", base),
    ];
    let text_width = width.saturating_sub(PREFIX_WIDTH);

    if is_editing {
        let (before, after) = app.input.split();
        spans.push(Span::styled(before.to_string(), base.fg(app.theme.text_bright)));
        spans.push(Span::styled("\u{258C}", base.fg(app.theme.highlight)));
        spans.push(Span::styled(after.to_string(), base.fg(app.theme.text_bright)));
    } else {
        let text_style = if task.completed {
            base.fg(app.theme.dim).add_modifier(Modifier::CROSSED_OUT)
        } else if is_cursor {
            base.fg(app.theme.text_bright)
        } else {
            base.fg(app.theme.text)
        };
        spans.push(Span::styled(
            unicode::truncate_to_width(&task.text, text_width),
            text_style,
        ));
    }

    // Fill the rest of the row so the selection background spans the width
    let used: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}
