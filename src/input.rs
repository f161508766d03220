//! Input handling
//!
//! Maps keyboard and mouse events to state transitions with
//! context-sensitive bindings.

use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::gradient::Slot;
use crate::state::{AppState, FocusedWidget};
use crate::ui::layout::{saved_columns, AppLayout, Hit, MIN_HEIGHT, MIN_WIDTH};

/// Handle an input event
pub fn handle_event(event: Event, state: &mut AppState) -> Result<()> {
    match event {
        Event::Key(key_event) => handle_key_event(key_event, state),
        Event::Mouse(mouse_event) => handle_mouse_event(mouse_event, state),
        Event::Resize(_, _) => Ok(()), // Already handled in main loop
        _ => Ok(()),
    }
}

/// Handle a key event
fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Result<()> {
    // Ignore release/repeat reports from terminals that send them
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if state.show_help {
        return handle_help_input(key, state);
    }

    // Global shortcuts
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.should_quit = true;
            return Ok(());
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.should_quit = true;
            return Ok(());
        }
        KeyCode::Char('?') => {
            state.show_help = true;
            return Ok(());
        }
        KeyCode::Tab => {
            state.set_focus(state.focus.next());
            return Ok(());
        }
        KeyCode::BackTab => {
            state.set_focus(state.focus.prev());
            return Ok(());
        }
        KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
            state.advance();
            return Ok(());
        }
        KeyCode::Char('1') => {
            state.copy_slot(Slot::First);
            return Ok(());
        }
        KeyCode::Char('2') => {
            state.copy_slot(Slot::Second);
            return Ok(());
        }
        KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Char('s') | KeyCode::Char('S') => {
            state.save_current();
            return Ok(());
        }
        KeyCode::Char('e') | KeyCode::Char('E') => {
            state.request_export();
            return Ok(());
        }
        _ => {}
    }

    match state.focus {
        FocusedWidget::Swatch => Ok(()),
        FocusedWidget::Saved => handle_saved_input(key, state),
    }
}

/// Handle input when help overlay is shown
fn handle_help_input(key: KeyEvent, state: &mut AppState) -> Result<()> {
    if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter) {
        state.show_help = false;
    }
    Ok(())
}

/// Handle input for the saved gradient grid
fn handle_saved_input(key: KeyEvent, state: &mut AppState) -> Result<()> {
    let columns = saved_columns(state.terminal_size.0) as isize;

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => state.select_by(-1),
        KeyCode::Right | KeyCode::Char('l') => state.select_by(1),
        KeyCode::Up | KeyCode::Char('k') => state.select_by(-columns),
        KeyCode::Down | KeyCode::Char('j') => state.select_by(columns),
        KeyCode::Home => state.select_first(),
        KeyCode::End => state.select_last(),
        KeyCode::Enter => state.recall_selected(),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete | KeyCode::Backspace => {
            state.remove_selected()
        }
        KeyCode::Esc => state.set_focus(FocusedWidget::Swatch),
        _ => {}
    }
    Ok(())
}

/// Handle pointer movement (hover) and left clicks
fn handle_mouse_event(mouse: MouseEvent, state: &mut AppState) -> Result<()> {
    if state.show_help {
        return Ok(());
    }

    let (width, height) = state.terminal_size;
    // Only the size warning is on screen
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Ok(());
    }

    let layout = AppLayout::compute(Rect::new(0, 0, width, height), state);
    let hit = layout.hit_test(mouse.column, mouse.row);
    let saved_id = |index: usize, state: &AppState| {
        state
            .gradient()
            .saved()
            .get(index)
            .map(|s| s.id().to_string())
    };

    match mouse.kind {
        MouseEventKind::Moved => match hit {
            Some(Hit::Card(index)) | Some(Hit::DeleteCard(index)) => {
                let id = saved_id(index, state);
                state.hover(id.as_deref());
            }
            _ => {
                if state.focus != FocusedWidget::Saved {
                    state.hover(None);
                }
            }
        },
        MouseEventKind::Down(MouseButton::Left) => match hit {
            Some(Hit::Swatch) => state.advance(),
            Some(Hit::Label(slot)) => state.copy_slot(slot),
            Some(Hit::Card(index)) => {
                if let Some(id) = saved_id(index, state) {
                    state.recall(&id);
                }
            }
            Some(Hit::DeleteCard(index)) => {
                if let Some(id) = saved_id(index, state) {
                    state.remove(&id);
                }
            }
            None => {}
        },
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardError, ClipboardSink};
    use crate::config::Config;
    use crate::terminal_capabilities::TerminalCapabilities;
    use crossbeam_channel::unbounded;
    use crossterm::event::KeyEventState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct OkClipboard;

    impl ClipboardSink for OkClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn app() -> AppState {
        let (tx, _rx) = unbounded();
        let caps = TerminalCapabilities {
            size: (80, 30),
            ..Default::default()
        };
        AppState::new(
            Config::default(),
            caps,
            tx,
            Box::new(OkClipboard),
            Box::new(StdRng::seed_from_u64(11)),
        )
    }

    fn press(state: &mut AppState, code: KeyCode) {
        let key = KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        handle_event(Event::Key(key), state).unwrap();
    }

    fn mouse(state: &mut AppState, kind: MouseEventKind, column: u16, row: u16) {
        let event = MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_event(Event::Mouse(event), state).unwrap();
    }

    #[test]
    fn test_space_advances() {
        let mut state = app();
        let before = state.gradient().current();
        press(&mut state, KeyCode::Char(' '));
        assert_eq!(state.gradient().current().from, before.to);
    }

    #[test]
    fn test_digit_keys_copy() {
        let mut state = app();
        press(&mut state, KeyCode::Char('2'));
        assert!(state.gradient().is_confirmed(Slot::Second));
        assert!(!state.gradient().is_confirmed(Slot::First));
    }

    #[test]
    fn test_save_select_delete() {
        let mut state = app();
        press(&mut state, KeyCode::Char('b'));
        press(&mut state, KeyCode::Char('r'));
        press(&mut state, KeyCode::Char('b'));
        assert_eq!(state.gradient().saved().len(), 2);

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Right);
        assert_eq!(state.selected_index(), Some(1));
        press(&mut state, KeyCode::Char('d'));
        assert_eq!(state.gradient().saved().len(), 1);
    }

    #[test]
    fn test_help_swallows_keys() {
        let mut state = app();
        press(&mut state, KeyCode::Char('?'));
        assert!(state.show_help);
        press(&mut state, KeyCode::Char('q'));
        assert!(!state.should_quit);
        press(&mut state, KeyCode::Esc);
        assert!(!state.show_help);
        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_quit);
    }

    #[test]
    fn test_mouse_hover_and_delete() {
        let mut state = app();
        press(&mut state, KeyCode::Char('b'));
        let layout = AppLayout::compute(Rect::new(0, 0, 80, 30), &state);
        let (_, card) = layout.cards[0];

        mouse(&mut state, MouseEventKind::Moved, card.x + 1, card.y + 1);
        assert_eq!(state.selected_index(), Some(0));

        let (x, y) = crate::ui::layout::delete_marker(card);
        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), x, y);
        assert!(state.gradient().saved().is_empty());
    }

    #[test]
    fn test_mouse_click_label_copies() {
        let mut state = app();
        let layout = AppLayout::compute(Rect::new(0, 0, 80, 30), &state);
        let label = layout.labels[0];
        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), label.x, label.y);
        assert!(state.gradient().is_confirmed(Slot::First));
    }

    #[test]
    fn test_mouse_ignored_below_minimum_size() {
        let mut state = app();
        press(&mut state, KeyCode::Char('b'));
        state.set_terminal_size(30, 10);
        let before = state.gradient().current();

        // Under the layout at full size this is the swatch
        mouse(&mut state, MouseEventKind::Down(MouseButton::Left), 5, 2);
        mouse(&mut state, MouseEventKind::Moved, 2, 9);
        for x in 0..30 {
            mouse(&mut state, MouseEventKind::Down(MouseButton::Left), x, 8);
        }

        let after = state.gradient().current();
        assert_eq!(after.from, before.from);
        assert_eq!(after.to, before.to);
        assert_eq!(state.gradient().saved().len(), 1);
        assert!(!state.gradient().is_confirmed(Slot::First));
        assert!(!state.gradient().is_confirmed(Slot::Second));
    }

    #[test]
    fn test_home_end_jump_to_ends() {
        let mut state = app();
        for _ in 0..4 {
            press(&mut state, KeyCode::Char('b'));
        }
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::End);
        assert_eq!(state.selected_index(), Some(3));
        press(&mut state, KeyCode::Home);
        assert_eq!(state.selected_index(), Some(0));
    }
}
