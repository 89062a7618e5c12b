use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Filter;
use crate::ops::task_ops::Progress;
use crate::tui::app::App;

/// Widest the progress bar gets
const MAX_BAR_WIDTH: usize = 30;

/// Render the header: title row, progress row, and filter tabs
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, app, rows[0]);
    render_progress(frame, app, rows[1]);
    render_tabs(frame, app, rows[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let title = " tick";
    let theme_label = if app.controller.is_dark() {
        "dark "
    } else {
        "light "
    };

    let mut spans = vec![Span::styled(
        title,
        Style::default()
            .fg(app.theme.purple)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    let used = title.chars().count() + theme_label.chars().count();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(Span::styled(
            theme_label,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Filled cells of a bar `width` cells wide. Rounded down, so the bar is
/// only full when every task is done.
fn filled_cells(progress: Progress, width: usize) -> usize {
    if progress.total == 0 {
        return 0;
    }
    (progress.completed * width / progress.total).min(width)
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let progress = app.controller.progress();
    let summary = format!(
        " {} of {} done  {}%",
        progress.completed,
        progress.total,
        progress.percent()
    );
    let bar_width = (area.width as usize)
        .saturating_sub(summary.len() + 1)
        .min(MAX_BAR_WIDTH);
    let filled = filled_cells(progress, bar_width);

    let line = Line::from(vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            "\u{2588}".repeat(filled),
            Style::default().fg(app.theme.progress_fill).bg(bg),
        ),
        Span::styled(
            "\u{2591}".repeat(bar_width - filled),
            Style::default().fg(app.theme.progress_empty).bg(bg),
        ),
        Span::styled(summary, Style::default().fg(app.theme.text).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let progress = app.controller.progress();
    let current = app.controller.filter();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for (i, filter) in Filter::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(sep.clone());
        }
        let count = match filter {
            Filter::All => progress.total,
            Filter::Active => progress.total - progress.completed,
            Filter::Completed => progress.completed,
        };
        let style = if filter == current {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(
            format!(" {} {} ", filter.label(), count),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
