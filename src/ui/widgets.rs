//! Gradient widgets: the main swatch, hex labels and saved cards

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

use crate::color_space::{contrast_text, quantize_to_ansi16, quantize_to_ansi256, Rgb};
use crate::export::{sample, DEFAULT_ANGLE_DEG};
use crate::gradient::{Gradient, Slot};
use crate::state::{AppState, FocusedWidget};
use crate::terminal_capabilities::ColorSupport;
use crate::ui::layout::{delete_marker, AppLayout};

/// Map an RGB color onto what the terminal can show
pub fn to_term_color(rgb: Rgb, support: ColorSupport) -> Color {
    match support {
        ColorSupport::NoColor => Color::Reset,
        ColorSupport::Color16 => Color::Indexed(quantize_to_ansi16(rgb)),
        ColorSupport::Color256 => Color::Indexed(quantize_to_ansi256(rgb)),
        ColorSupport::TrueColor => Color::Rgb(rgb.r, rgb.g, rgb.b),
    }
}

/// Diagonal gradient drawn with upper half blocks, two samples per cell
pub struct GradientSwatch {
    gradient: Gradient,
    support: ColorSupport,
}

impl GradientSwatch {
    pub fn new(gradient: Gradient, support: ColorSupport) -> Self {
        Self { gradient, support }
    }
}

impl Widget for GradientSwatch {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as u32;
        let height = area.height as u32 * 2;

        for row in 0..area.height {
            for col in 0..area.width {
                let y = row as u32 * 2;
                let top = sample(&self.gradient, col as u32, y, width, height, DEFAULT_ANGLE_DEG);
                let bottom =
                    sample(&self.gradient, col as u32, y + 1, width, height, DEFAULT_ANGLE_DEG);
                let style = Style::default()
                    .fg(to_term_color(top, self.support))
                    .bg(to_term_color(bottom, self.support));
                buf.set_string(area.x + col, area.y + row, "▀", style);
            }
        }
    }
}

/// Render the current gradient inside a rounded frame
pub fn render_swatch(frame: &mut Frame, area: Rect, state: &AppState) {
    let border_style = if state.focus == FocusedWidget::Swatch {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(
            " Gradient ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title(Span::styled(" [B] Save ", Style::default().fg(Color::Green)));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        GradientSwatch::new(state.gradient().current(), state.capabilities.color_support),
        inner,
    );
}

/// Render the two hex codes and their copy confirmations
pub fn render_labels(frame: &mut Frame, layout: &AppLayout, state: &AppState) {
    let current = state.gradient().current();

    for slot in Slot::ALL {
        let label = Paragraph::new(Span::styled(
            current.color(slot).to_hex(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
        frame.render_widget(label, layout.labels[slot.index()]);

        if state.gradient().is_confirmed(slot) {
            let badge = Paragraph::new(Span::styled(
                "Copied!",
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ));
            frame.render_widget(badge, layout.badges[slot.index()]);
        }
    }

    let first = layout.labels[0];
    let arrow = Rect::new(
        first.x + first.width,
        first.y,
        layout.labels[1].x.saturating_sub(first.x + first.width),
        1,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            crate::ui::layout::LABEL_SEPARATOR,
            Style::default().fg(Color::DarkGray),
        )),
        arrow,
    );
}

/// Render the saved gradients as a grid of small cards
pub fn render_saved(frame: &mut Frame, layout: &AppLayout, state: &AppState) {
    let saved = state.gradient().saved();
    let is_focused = state.focus == FocusedWidget::Saved;

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            format!(" ALL ({}) ", saved.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(layout.saved_panel);
    frame.render_widget(block, layout.saved_panel);

    if saved.is_empty() {
        let hint = Paragraph::new(Line::from(vec![
            Span::styled("No saved gradients - press ", Style::default().fg(Color::DarkGray)),
            Span::styled("[B]", Style::default().fg(Color::Green)),
            Span::styled(" to bookmark", Style::default().fg(Color::DarkGray)),
        ]));
        frame.render_widget(hint, inner);
        return;
    }

    let support = state.capabilities.color_support;
    for &(index, rect) in &layout.cards {
        let gradient = saved[index].gradient();
        frame.render_widget(GradientSwatch::new(gradient, support), rect);

        if layout.hovered == Some(index) {
            let (x, y) = delete_marker(rect);
            let ink = contrast_text(gradient.from);
            let marker = Paragraph::new(Span::styled(
                "✕",
                Style::default()
                    .fg(to_term_color(ink, support))
                    .add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(marker, Rect::new(x, y, 1, 1));

            let caption = Paragraph::new(Span::styled(
                "▸",
                Style::default().fg(to_term_color(ink, support)),
            ));
            frame.render_widget(caption, Rect::new(rect.x, rect.y, 1, 1));
        }
    }
}
