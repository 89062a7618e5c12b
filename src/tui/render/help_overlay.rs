use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

const KEY_WIDTH: usize = 14;

/// Render the help overlay (toggled with ?)
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let overlay_area = centered_rect(70, 90, area);
    frame.render_widget(Clear, overlay_area);

    let bg = app.theme.background;
    let key_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(app.theme.text).bg(bg);
    let header_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let styles = (header_style, key_style, desc_style);

    add_section(
        &mut lines,
        styles,
        " Tasks",
        &[
            ("a/n", "Add tasks"),
            ("Space/x", "Toggle done"),
            ("e/Enter", "Edit text"),
            ("d/Del", "Delete"),
        ],
    );
    add_section(
        &mut lines,
        styles,
        " Navigation",
        &[
            ("\u{2191}\u{2193}/jk", "Move cursor"),
            ("g/G", "Jump to top/bottom"),
            ("1/2/3", "All / Active / Completed"),
            ("Tab", "Next filter"),
        ],
    );
    add_section(
        &mut lines,
        styles,
        " Global",
        &[
            ("t", "Switch light/dark"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    );

    let block = Block::default()
        .title(" Keys ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, overlay_area);
}

/// Push a titled block of key bindings followed by a blank line
fn add_section(
    lines: &mut Vec<Line<'static>>,
    (header_style, key_style, desc_style): (Style, Style, Style),
    title: &'static str,
    bindings: &[(&'static str, &'static str)],
) {
    lines.push(Line::from(Span::styled(title, header_style)));
    for (key, desc) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<width$}", key, width = KEY_WIDTH), key_style),
            Span::styled(*desc, desc_style),
        ]));
    }
    lines.push(Line::from(""));
}

/// Create a centered rectangle of the given percentage of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
