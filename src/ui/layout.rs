//! Screen layout
//!
//! Computes where every interactive element sits so rendering and mouse
//! hit-testing agree on the same rectangles.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthStr;

use crate::gradient::Slot;
use crate::state::AppState;

pub const CARD_WIDTH: u16 = 12;
pub const CARD_HEIGHT: u16 = 4;
pub const CARD_GAP: u16 = 1;
pub const MAX_SAVED_ROWS: u16 = 3;

/// Text between the two hex labels
pub const LABEL_SEPARATOR: &str = "  →  ";
const HEX_WIDTH: u16 = 7;

/// Smallest terminal the layout supports
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 15;

/// What a screen position points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Swatch,
    Label(Slot),
    /// Saved card by index into the saved list
    Card(usize),
    /// Delete marker of the hovered card
    DeleteCard(usize),
}

/// Resolved rectangles for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    pub title: Rect,
    pub swatch: Rect,
    pub labels: [Rect; 2],
    pub badges: [Rect; 2],
    pub saved_panel: Rect,
    /// Visible cards as (saved index, rect)
    pub cards: Vec<(usize, Rect)>,
    pub status: Rect,
    /// Index of the hovered card, if visible
    pub hovered: Option<usize>,
}

/// Cards per row inside a saved panel of outer width `width`
pub fn saved_columns(width: u16) -> usize {
    let inner = width.saturating_sub(2);
    (((inner + CARD_GAP) / (CARD_WIDTH + CARD_GAP)) as usize).max(1)
}

fn rows_height(rows: u16) -> u16 {
    rows * CARD_HEIGHT + rows.saturating_sub(1) * CARD_GAP
}

/// Position of the delete marker inside a card
pub fn delete_marker(card: Rect) -> (u16, u16) {
    (card.x + card.width.saturating_sub(2), card.y)
}

impl AppLayout {
    pub fn compute(area: Rect, state: &AppState) -> Self {
        let saved = state.gradient().saved();
        let columns = saved_columns(area.width);
        let rows_needed = saved.len().div_ceil(columns).max(1) as u16;

        // Leave the title, a minimal swatch, labels and status their rows
        let spare = area.height.saturating_sub(1 + 6 + 2 + 1 + 2);
        let max_rows = ((spare + CARD_GAP) / (CARD_HEIGHT + CARD_GAP)).clamp(1, MAX_SAVED_ROWS);
        let visible_rows = rows_needed.min(max_rows);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                             // Title bar
                Constraint::Min(4),                                // Swatch
                Constraint::Length(2),                             // Hex labels + badges
                Constraint::Length(rows_height(visible_rows) + 2), // Saved panel
                Constraint::Length(1),                             // Status bar
            ])
            .split(area);

        let (labels, badges) = label_rects(chunks[2]);

        let hovered = state.selected_index();
        let cards = card_rects(chunks[3], saved.len(), columns, visible_rows, hovered);

        Self {
            title: chunks[0],
            swatch: chunks[1],
            labels,
            badges,
            saved_panel: chunks[3],
            cards,
            status: chunks[4],
            hovered,
        }
    }

    /// Find the element under `(x, y)`
    pub fn hit_test(&self, x: u16, y: u16) -> Option<Hit> {
        for &(index, rect) in &self.cards {
            if contains(rect, x, y) {
                if self.hovered == Some(index) && delete_marker(rect) == (x, y) {
                    return Some(Hit::DeleteCard(index));
                }
                return Some(Hit::Card(index));
            }
        }

        for slot in Slot::ALL {
            if contains(self.labels[slot.index()], x, y) {
                return Some(Hit::Label(slot));
            }
        }

        if contains(self.swatch, x, y) {
            return Some(Hit::Swatch);
        }

        None
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Centered `#AAAAAA  →  #BBBBBB` row with a badge row beneath
fn label_rects(area: Rect) -> ([Rect; 2], [Rect; 2]) {
    let separator = LABEL_SEPARATOR.width() as u16;
    let total = HEX_WIDTH * 2 + separator;
    let x0 = area.x + area.width.saturating_sub(total) / 2;
    let second_x = x0 + HEX_WIDTH + separator;
    let badge_y = area.y + area.height.saturating_sub(1);

    (
        [
            Rect::new(x0, area.y, HEX_WIDTH, 1),
            Rect::new(second_x, area.y, HEX_WIDTH, 1),
        ],
        [
            Rect::new(x0, badge_y, HEX_WIDTH, 1),
            Rect::new(second_x, badge_y, HEX_WIDTH, 1),
        ],
    )
}

/// Lay out the saved cards, scrolling by rows so `hovered` stays visible
fn card_rects(
    panel: Rect,
    count: usize,
    columns: usize,
    visible_rows: u16,
    hovered: Option<usize>,
) -> Vec<(usize, Rect)> {
    let inner = Rect::new(
        panel.x + 1,
        panel.y + 1,
        panel.width.saturating_sub(2),
        panel.height.saturating_sub(2),
    );

    let visible_rows = visible_rows as usize;
    let first_row = match hovered {
        Some(index) if index / columns >= visible_rows => index / columns + 1 - visible_rows,
        _ => 0,
    };

    let start = first_row * columns;
    let end = count.min(start + visible_rows * columns);

    (start..end)
        .map(|index| {
            let row = (index / columns - first_row) as u16;
            let col = (index % columns) as u16;
            let rect = Rect::new(
                inner.x + col * (CARD_WIDTH + CARD_GAP),
                inner.y + row * (CARD_HEIGHT + CARD_GAP),
                CARD_WIDTH,
                CARD_HEIGHT,
            );
            (index, rect)
        })
        .collect()
}
