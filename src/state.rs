//! Application state management
//!
//! `AppState` is the single owner of the gradient session plus the UI-only
//! state around it (focus, status line, help overlay). Input handlers and the
//! event loop mutate it; the UI only reads it.

use std::time::Instant;

use crossbeam_channel::Sender;
use rand::RngCore;

use crate::clipboard::ClipboardSink;
use crate::config::Config;
use crate::export::export_file_name;
use crate::gradient::{GradientState, Slot};
use crate::terminal_capabilities::TerminalCapabilities;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Which area receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedWidget {
    #[default]
    Swatch,
    Saved,
}

impl FocusedWidget {
    pub fn next(&self) -> Self {
        match self {
            FocusedWidget::Swatch => FocusedWidget::Saved,
            FocusedWidget::Saved => FocusedWidget::Swatch,
        }
    }

    pub fn prev(&self) -> Self {
        // Two widgets: cycling either way lands on the other one
        self.next()
    }
}

/// Main application state
pub struct AppState {
    // Navigation
    pub focus: FocusedWidget,
    pub show_help: bool,
    pub should_quit: bool,

    // Status line
    pub status_message: String,
    pub status_is_error: bool,

    // Terminal info
    pub terminal_size: (u16, u16),
    pub capabilities: TerminalCapabilities,

    pub config: Config,
    pub is_exporting: bool,

    gradient: GradientState,
    clipboard: Box<dyn ClipboardSink>,
    rng: Box<dyn RngCore>,
    worker_tx: Sender<WorkerMessage>,
}

impl AppState {
    pub fn new(
        config: Config,
        capabilities: TerminalCapabilities,
        worker_tx: Sender<WorkerMessage>,
        clipboard: Box<dyn ClipboardSink>,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let gradient = GradientState::new(config.gradient.initial_gradient())
            .with_feedback_delay(config.gradient.copy_feedback_delay());

        Self {
            focus: FocusedWidget::default(),
            show_help: false,
            should_quit: false,

            status_message: "Ready - Press [?] for help".to_string(),
            status_is_error: false,

            terminal_size: capabilities.size,
            capabilities,

            config,
            is_exporting: false,

            gradient,
            clipboard,
            rng,
            worker_tx,
        }
    }

    pub fn gradient(&self) -> &GradientState {
        &self.gradient
    }

    /// Update terminal size on resize
    pub fn set_terminal_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    /// Set status message
    pub fn set_status(&mut self, message: &str, is_error: bool) {
        self.status_message = message.to_string();
        self.status_is_error = is_error;
    }

    /// Draw a new gradient continuing from the current second color
    pub fn advance(&mut self) {
        let next = self.gradient.advance(&mut *self.rng);
        self.set_status(&format!("New gradient {}", next.label()), false);
    }

    pub fn copy_slot(&mut self, slot: Slot) {
        self.copy_slot_at(slot, Instant::now());
    }

    /// Copy a slot's hex code; failures only reach the status line and log
    pub fn copy_slot_at(&mut self, slot: Slot, now: Instant) {
        match self.gradient.copy(slot, &mut *self.clipboard, now) {
            Ok(color) => self.set_status(&format!("Copied {}", color), false),
            Err(e) => {
                tracing::warn!(slot = slot.name(), error = %e, "copy failed");
                self.set_status(&e.to_string(), true);
            }
        }
    }

    /// Bookmark the current gradient
    pub fn save_current(&mut self) {
        self.gradient.save(&mut *self.rng);
        let count = self.gradient.saved().len();
        self.set_status(&format!("Saved gradient ({} total)", count), false);
    }

    /// Recall a saved gradient by id
    pub fn recall(&mut self, id: &str) {
        if let Some(gradient) = self.gradient.recall_id(id) {
            self.set_status(&format!("Recalled {}", gradient.label()), false);
        }
    }

    /// Delete a saved gradient by id, keeping a neighbor selected while the
    /// saved list has focus
    pub fn remove(&mut self, id: &str) {
        let Some(index) = self.gradient.position(id) else {
            return;
        };
        let was_hovered = self.gradient.hovered() == Some(id);

        self.gradient.remove(id);
        self.set_status("Removed gradient", false);

        if was_hovered && self.focus == FocusedWidget::Saved {
            self.select_index(index.min(self.gradient.saved().len().saturating_sub(1)));
        }
    }

    pub fn hover(&mut self, id: Option<&str>) {
        self.gradient.set_hover(id);
    }

    /// Index of the hovered saved gradient
    pub fn selected_index(&self) -> Option<usize> {
        self.gradient.hovered().and_then(|id| self.gradient.position(id))
    }

    fn select_index(&mut self, index: usize) {
        let id = self.gradient.saved().get(index).map(|s| s.id().to_string());
        self.gradient.set_hover(id.as_deref());
    }

    /// Move the saved-list selection by `delta`, clamped to the list
    pub fn select_by(&mut self, delta: isize) {
        let len = self.gradient.saved().len();
        if len == 0 {
            return;
        }
        let target = match self.selected_index() {
            Some(current) => (current as isize + delta).clamp(0, len as isize - 1) as usize,
            None => 0,
        };
        self.select_index(target);
    }

    pub fn select_first(&mut self) {
        self.select_index(0);
    }

    pub fn select_last(&mut self) {
        let len = self.gradient.saved().len();
        if len > 0 {
            self.select_index(len - 1);
        }
    }

    pub fn recall_selected(&mut self) {
        if let Some(id) = self.gradient.hovered().map(str::to_string) {
            self.recall(&id);
        }
    }

    pub fn remove_selected(&mut self) {
        if let Some(id) = self.gradient.hovered().map(str::to_string) {
            self.remove(&id);
        }
    }

    /// Move focus; entering the saved list selects its first card
    pub fn set_focus(&mut self, focus: FocusedWidget) {
        self.focus = focus;
        match focus {
            FocusedWidget::Saved => {
                if self.selected_index().is_none() {
                    self.select_index(0);
                }
            }
            FocusedWidget::Swatch => self.gradient.set_hover(None),
        }
    }

    /// Per-frame housekeeping: expire copy confirmations
    pub fn tick(&mut self, now: Instant) {
        self.gradient.tick(now);
    }

    /// Queue a PNG export of the current gradient
    pub fn request_export(&mut self) {
        if self.is_exporting {
            self.set_status("Export already running", false);
            return;
        }

        let gradient = self.gradient.current();
        let path = self
            .config
            .export
            .directory
            .join(export_file_name(&gradient));

        let msg = WorkerMessage::ExportPng {
            gradient,
            width: self.config.export.width,
            height: self.config.export.height,
            path: path.clone(),
        };

        if self.worker_tx.send(msg).is_err() {
            self.set_status("Export worker unavailable", true);
            return;
        }
        self.is_exporting = true;
        self.set_status(&format!("Exporting {}...", path.display()), false);
    }

    /// Handle response from the worker thread
    pub fn handle_worker_response(&mut self, response: WorkerResponse) {
        self.is_exporting = false;

        match response {
            WorkerResponse::ExportComplete { path, render_time } => {
                self.set_status(
                    &format!("Exported {} in {}ms", path.display(), render_time),
                    false,
                );
            }
            WorkerResponse::Error(err) => {
                self.set_status(&format!("Export failed: {}", err), true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crossbeam_channel::{unbounded, Receiver};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct NullClipboard {
        fail: bool,
    }

    impl ClipboardSink for NullClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                Err(ClipboardError::Unavailable("no display".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn app(fail_clipboard: bool) -> (AppState, Receiver<WorkerMessage>) {
        let (tx, rx) = unbounded();
        let state = AppState::new(
            Config::default(),
            TerminalCapabilities::default(),
            tx,
            Box::new(NullClipboard {
                fail: fail_clipboard,
            }),
            Box::new(StdRng::seed_from_u64(3)),
        );
        (state, rx)
    }

    #[test]
    fn test_copy_failure_reports_error() {
        let (mut state, _rx) = app(true);
        state.copy_slot(Slot::First);
        assert!(state.status_is_error);
        assert!(state.status_message.contains("no display"));
        assert!(!state.gradient().is_confirmed(Slot::First));
    }

    #[test]
    fn test_copy_success_sets_status() {
        let (mut state, _rx) = app(false);
        state.copy_slot(Slot::Second);
        assert_eq!(state.status_message, "Copied #FCE0E2");
        assert!(state.gradient().is_confirmed(Slot::Second));
    }

    #[test]
    fn test_focus_selects_first_saved() {
        let (mut state, _rx) = app(false);
        state.save_current();
        state.advance();
        state.save_current();

        state.set_focus(FocusedWidget::Saved);
        assert_eq!(state.selected_index(), Some(0));

        state.select_by(5);
        assert_eq!(state.selected_index(), Some(1));
        state.select_by(-9);
        assert_eq!(state.selected_index(), Some(0));

        state.set_focus(FocusedWidget::Swatch);
        assert_eq!(state.selected_index(), None);
    }

    #[test]
    fn test_select_first_and_last() {
        let (mut state, _rx) = app(false);
        state.select_last();
        assert_eq!(state.selected_index(), None);

        for _ in 0..3 {
            state.save_current();
        }
        state.select_last();
        assert_eq!(state.selected_index(), Some(2));
        state.select_first();
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn test_remove_selected_moves_to_neighbor() {
        let (mut state, _rx) = app(false);
        for _ in 0..3 {
            state.save_current();
            state.advance();
        }
        state.set_focus(FocusedWidget::Saved);
        state.select_by(2);
        state.remove_selected();
        assert_eq!(state.gradient().saved().len(), 2);
        assert_eq!(state.selected_index(), Some(1));
    }

    #[test]
    fn test_recall_selected() {
        let (mut state, _rx) = app(false);
        let first = state.gradient().current();
        state.save_current();
        state.advance();
        state.set_focus(FocusedWidget::Saved);
        state.recall_selected();
        assert_eq!(state.gradient().current().from, first.from);
        assert_eq!(state.gradient().current().to, first.to);
    }

    #[test]
    fn test_export_request_and_response() {
        let (mut state, rx) = app(false);
        state.request_export();
        assert!(state.is_exporting);
        match rx.try_recv() {
            Ok(WorkerMessage::ExportPng { width, height, path, .. }) => {
                assert_eq!((width, height), (1600, 900));
                assert!(path.ends_with("gradient-F582A8-FCE0E2.png"));
            }
            other => panic!("unexpected message: {:?}", other),
        }

        // A second request while one is running is refused
        state.request_export();
        assert!(rx.try_recv().is_err());

        state.handle_worker_response(WorkerResponse::Error("disk full".to_string()));
        assert!(!state.is_exporting);
        assert!(state.status_is_error);
    }
}
