//! UI module
//!
//! Contains all UI rendering components using Ratatui.

mod help;
pub mod layout;
pub mod widgets;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::color_space::hex_to_hsl;
use crate::state::{AppState, FocusedWidget};
use layout::{AppLayout, MIN_HEIGHT, MIN_WIDTH};

/// Main render function - draws the entire UI
pub fn render(frame: &mut Frame, state: &AppState) {
    let size = frame.area();

    if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
        render_size_warning(frame, size);
        return;
    }

    let layout = AppLayout::compute(size, state);

    render_title_bar(frame, layout.title, state);
    widgets::render_swatch(frame, layout.swatch, state);
    widgets::render_labels(frame, &layout, state);
    widgets::render_saved(frame, &layout, state);
    render_status_bar(frame, layout.status, state);

    if state.show_help {
        help::render_help_overlay(frame, size);
    }
}

/// Render warning when terminal is too small
fn render_size_warning(frame: &mut Frame, area: Rect) {
    let warning = Paragraph::new(format!(
        "Terminal too small!\nMinimum: {}x{}",
        MIN_WIDTH, MIN_HEIGHT
    ))
    .style(Style::default().fg(Color::Red))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(warning, area);
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let focus_name = match state.focus {
        FocusedWidget::Swatch => "Swatch",
        FocusedWidget::Saved => "Saved",
    };
    let right = "[?] Help  [Q] Quit ";
    let left_width = " gradbox ".width() + "v1.0".width() + " │ ".width() + focus_name.width();
    let padding = (area.width as usize)
        .saturating_sub(left_width)
        .saturating_sub(right.width());

    let title = Line::from(vec![
        Span::styled(
            " gradbox ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("v1.0", Style::default().fg(Color::DarkGray)),
        Span::raw(" │ "),
        Span::styled(focus_name, Style::default().fg(Color::Yellow)),
        Span::raw(" ".repeat(padding)),
        Span::styled("[?]", Style::default().fg(Color::Green)),
        Span::raw(" Help  "),
        Span::styled("[Q]", Style::default().fg(Color::Red)),
        Span::raw(" Quit "),
    ]);

    let title_widget =
        Paragraph::new(title).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(title_widget, area);
}

/// `hsl(...) → hsl(...)` for the current pair
pub fn hsl_summary(state: &AppState) -> String {
    let current = state.gradient().current();
    format!(
        "{} → {}",
        hex_to_hsl(&current.from.to_hex()),
        hex_to_hsl(&current.to.to_hex())
    )
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let status_color = if state.status_is_error {
        Color::Red
    } else {
        Color::White
    };

    let info = hsl_summary(state);
    let spacing = (area.width as usize)
        .saturating_sub(state.status_message.width())
        .saturating_sub(info.width())
        .saturating_sub(2);

    let status = Line::from(vec![
        Span::raw(" "),
        Span::styled(&state.status_message, Style::default().fg(status_color)),
        Span::raw(" ".repeat(spacing)),
        Span::styled(&info, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
    ]);

    let widget =
        Paragraph::new(status).style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(widget, area);
}
