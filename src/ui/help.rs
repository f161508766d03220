//! Help overlay rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the help overlay
pub fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let overlay_width = (area.width as f32 * 0.7).min(60.0) as u16;
    let overlay_height = (area.height as f32 * 0.8).min(26.0) as u16;

    let overlay_area = centered_rect(overlay_width, overlay_height, area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Keyboard & Mouse ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let widget = Paragraph::new(create_help_text()).style(Style::default().fg(Color::White));
    frame.render_widget(widget, inner);
}

fn entry(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Green)),
        Span::styled(desc, Style::default().fg(Color::White)),
    ])
}

/// Create help text content
fn create_help_text() -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    vec![
        Line::from(Span::styled("Gradient", section_style)),
        entry("Space, R", "New gradient (keeps the second color)"),
        entry("1, 2", "Copy first / second hex code"),
        entry("B, S", "Bookmark current gradient"),
        entry("E", "Export PNG"),
        Line::from(""),
        Line::from(Span::styled("Saved list", section_style)),
        entry("Tab", "Switch focus swatch / saved"),
        entry("← → ↑ ↓", "Select saved gradient"),
        entry("Enter", "Recall selected"),
        entry("D, Del", "Delete selected"),
        entry("Esc", "Back to swatch"),
        Line::from(""),
        Line::from(Span::styled("Mouse", section_style)),
        entry("Click swatch", "New gradient"),
        entry("Click code", "Copy hex code"),
        entry("Click card", "Recall; ✕ deletes"),
        Line::from(""),
        Line::from(Span::styled("Global", section_style)),
        entry("?", "Toggle help overlay"),
        entry("Q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "       [Press ? or Esc to close]",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal_padding = area.width.saturating_sub(width) / 2;
    let vertical_padding = area.height.saturating_sub(height) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(vertical_padding),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(horizontal_padding),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}
