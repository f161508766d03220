//! Gradient session state
//!
//! Owns the current two-color gradient, the list of saved gradients and the
//! transient copy-confirmation and hover feedback. Every transition is a
//! synchronous call on a single owner; time and randomness are passed in so
//! the event loop (and tests) decide where they come from.

use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::clipboard::{ClipboardError, ClipboardSink};
use crate::color_space::{random_color, Rgb};

/// Starting gradient when nothing else is configured
pub const DEFAULT_FROM: Rgb = Rgb::new(0xF5, 0x82, 0xA8);
pub const DEFAULT_TO: Rgb = Rgb::new(0xFC, 0xE0, 0xE2);

/// How long a copy confirmation stays visible
pub const COPY_FEEDBACK_DELAY: Duration = Duration::from_millis(1200);

const ID_SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One of the two colors of the current gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Slot::First => "first",
            Slot::Second => "second",
        }
    }
}

/// An ordered pair of colors blended from `from` to `to`
///
/// Equality ignores order: `(a, b)` and `(b, a)` are the same gradient drawn
/// in opposite directions.
#[derive(Debug, Clone, Copy)]
pub struct Gradient {
    pub from: Rgb,
    pub to: Rgb,
}

impl Gradient {
    pub const fn new(from: Rgb, to: Rgb) -> Self {
        Self { from, to }
    }

    pub fn color(&self, slot: Slot) -> Rgb {
        match slot {
            Slot::First => self.from,
            Slot::Second => self.to,
        }
    }

    /// `#FROM → #TO`
    pub fn label(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new(DEFAULT_FROM, DEFAULT_TO)
    }
}

impl PartialEq for Gradient {
    fn eq(&self, other: &Self) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

impl Eq for Gradient {}

impl Hash for Gradient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (lo, hi) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        lo.hash(state);
        hi.hash(state);
    }
}

/// A bookmarked gradient; immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedGradient {
    id: String,
    gradient: Gradient,
}

impl SavedGradient {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn gradient(&self) -> Gradient {
        self.gradient
    }
}

/// Scheduled reset of one slot's copy confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClearTask {
    deadline: Instant,
}

/// Per-slot confirmation flags, each with at most one pending clear
#[derive(Debug, Default)]
struct CopyFeedback {
    confirmed: [bool; 2],
    pending: [Option<ClearTask>; 2],
}

impl CopyFeedback {
    /// Raise the flag and replace any pending clear for this slot
    fn confirm(&mut self, slot: Slot, deadline: Instant) {
        let i = slot.index();
        self.confirmed[i] = true;
        self.pending[i] = Some(ClearTask { deadline });
    }

    fn reset(&mut self) {
        self.confirmed = [false; 2];
        self.pending = [None; 2];
    }

    /// Run every clear whose deadline has passed; returns true if any fired
    fn fire_due(&mut self, now: Instant) -> bool {
        let mut fired = false;
        for slot in Slot::ALL {
            let i = slot.index();
            if matches!(self.pending[i], Some(task) if task.deadline <= now) {
                self.pending[i] = None;
                self.confirmed[i] = false;
                fired = true;
            }
        }
        fired
    }
}

/// Current gradient, saved history and transient feedback
#[derive(Debug)]
pub struct GradientState {
    current: Gradient,
    saved: Vec<SavedGradient>,
    feedback: CopyFeedback,
    hovered: Option<String>,
    feedback_delay: Duration,
    next_seq: u64,
}

impl Default for GradientState {
    fn default() -> Self {
        Self::new(Gradient::default())
    }
}

impl GradientState {
    pub fn new(initial: Gradient) -> Self {
        Self {
            current: initial,
            saved: Vec::new(),
            feedback: CopyFeedback::default(),
            hovered: None,
            feedback_delay: COPY_FEEDBACK_DELAY,
            next_seq: 0,
        }
    }

    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    pub fn current(&self) -> Gradient {
        self.current
    }

    /// Saved gradients in display (insertion) order
    pub fn saved(&self) -> &[SavedGradient] {
        &self.saved
    }

    pub fn find(&self, id: &str) -> Option<&SavedGradient> {
        self.saved.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.saved.iter().position(|item| item.id == id)
    }

    pub fn is_confirmed(&self, slot: Slot) -> bool {
        self.feedback.confirmed[slot.index()]
    }

    /// When the slot's confirmation will clear, if one is pending
    pub fn pending_clear(&self, slot: Slot) -> Option<Instant> {
        self.feedback.pending[slot.index()].map(|task| task.deadline)
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Shift the gradient: the second color becomes the first and a fresh
    /// random color becomes the second.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Gradient {
        let next = Gradient::new(self.current.to, random_color(rng));
        tracing::debug!(from = %next.from, to = %next.to, "advance");
        self.current = next;
        self.feedback.reset();
        next
    }

    /// Copy the slot's hex code to the clipboard.
    ///
    /// On success the slot's confirmation is raised until `now` plus the
    /// feedback delay; an earlier pending clear for the same slot is
    /// superseded. On failure nothing changes.
    pub fn copy<C: ClipboardSink + ?Sized>(
        &mut self,
        slot: Slot,
        clipboard: &mut C,
        now: Instant,
    ) -> Result<Rgb, ClipboardError> {
        let color = self.current.color(slot);
        clipboard.set_text(&color.to_hex())?;
        self.feedback.confirm(slot, now + self.feedback_delay);
        tracing::debug!(slot = slot.name(), color = %color, "copied");
        Ok(color)
    }

    /// Fire due confirmation clears; returns true if anything changed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.feedback.fire_due(now)
    }

    /// Bookmark the current gradient and return the new entry's id.
    ///
    /// Saving the same pair twice yields two entries.
    pub fn save<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        self.save_at(rng, millis)
    }

    fn save_at<R: Rng + ?Sized>(&mut self, rng: &mut R, millis: u128) -> String {
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect();
        let id = format!(
            "{}-{}-{}-{}-{}",
            self.current.from, self.current.to, millis, self.next_seq, suffix
        );
        self.next_seq += 1;

        self.saved.push(SavedGradient {
            id: id.clone(),
            gradient: self.current,
        });
        tracing::info!(id = %id, count = self.saved.len(), "saved gradient");
        id
    }

    /// Make `gradient` current; the saved list is untouched
    pub fn recall(&mut self, gradient: Gradient) {
        self.current = gradient;
        self.feedback.reset();
        tracing::debug!(from = %gradient.from, to = %gradient.to, "recall");
    }

    /// Recall a saved entry by id; unknown ids are ignored
    pub fn recall_id(&mut self, id: &str) -> Option<Gradient> {
        let gradient = self.find(id)?.gradient;
        self.recall(gradient);
        Some(gradient)
    }

    /// Delete a saved entry; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        self.saved.remove(index);
        if self.hovered.as_deref() == Some(id) {
            self.hovered = None;
        }
        tracing::info!(id = %id, count = self.saved.len(), "removed gradient");
        true
    }

    /// Record which saved entry is under focus. Ids not in the saved list
    /// clear the hover.
    pub fn set_hover(&mut self, id: Option<&str>) {
        self.hovered = id
            .filter(|id| self.find(id).is_some())
            .map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingClipboard {
        texts: Vec<String>,
        fail: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::WriteFailed("denied".to_string()));
            }
            self.texts.push(text.to_string());
            Ok(())
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_default_gradient() {
        let state = GradientState::default();
        assert_eq!(state.current().from.to_hex(), "#F582A8");
        assert_eq!(state.current().to.to_hex(), "#FCE0E2");
    }

    #[test]
    fn test_advance_shifts_second_into_first() {
        let mut state = GradientState::default();
        let mut rng = rng();
        let next = state.advance(&mut rng);
        assert_eq!(next.from, DEFAULT_TO);
        assert_eq!(state.current().from.to_hex(), "#FCE0E2");

        for _ in 0..20 {
            let before = state.current();
            let after = state.advance(&mut rng);
            assert_eq!(after.from, before.to);
        }
    }

    #[test]
    fn test_advance_clears_confirmations() {
        let mut state = GradientState::default();
        let mut clipboard = RecordingClipboard::default();
        let now = Instant::now();
        state.copy(Slot::First, &mut clipboard, now).unwrap();
        state.copy(Slot::Second, &mut clipboard, now).unwrap();

        state.advance(&mut rng());
        assert!(!state.is_confirmed(Slot::First));
        assert!(!state.is_confirmed(Slot::Second));
        assert_eq!(state.pending_clear(Slot::First), None);
        assert_eq!(state.pending_clear(Slot::Second), None);
    }

    #[test]
    fn test_copy_writes_uppercase_hex() {
        let mut state = GradientState::new(Gradient::new(
            Rgb::new(0xab, 0xcd, 0xef),
            Rgb::new(1, 2, 3),
        ));
        let mut clipboard = RecordingClipboard::default();
        let now = Instant::now();
        state.copy(Slot::First, &mut clipboard, now).unwrap();
        state.copy(Slot::Second, &mut clipboard, now).unwrap();
        assert_eq!(clipboard.texts, vec!["#ABCDEF", "#010203"]);
    }

    #[test]
    fn test_confirmation_clears_after_delay() {
        let mut state = GradientState::default();
        let mut clipboard = RecordingClipboard::default();
        let t0 = Instant::now();
        state.copy(Slot::First, &mut clipboard, t0).unwrap();
        assert!(state.is_confirmed(Slot::First));

        assert!(!state.tick(t0 + Duration::from_millis(1199)));
        assert!(state.is_confirmed(Slot::First));

        assert!(state.tick(t0 + COPY_FEEDBACK_DELAY));
        assert!(!state.is_confirmed(Slot::First));
        assert_eq!(state.pending_clear(Slot::First), None);
    }

    #[test]
    fn test_slots_clear_independently() {
        let mut state = GradientState::default();
        let mut clipboard = RecordingClipboard::default();
        let t0 = Instant::now();
        state.copy(Slot::First, &mut clipboard, t0).unwrap();
        state
            .copy(Slot::Second, &mut clipboard, t0 + Duration::from_millis(600))
            .unwrap();

        // Second copy must not disturb the first slot
        assert!(state.is_confirmed(Slot::First));
        assert!(state.is_confirmed(Slot::Second));

        state.tick(t0 + Duration::from_millis(1200));
        assert!(!state.is_confirmed(Slot::First));
        assert!(state.is_confirmed(Slot::Second));

        state.tick(t0 + Duration::from_millis(1800));
        assert!(!state.is_confirmed(Slot::Second));
    }

    #[test]
    fn test_recopy_supersedes_pending_clear() {
        let mut state = GradientState::default();
        let mut clipboard = RecordingClipboard::default();
        let t0 = Instant::now();
        state.copy(Slot::First, &mut clipboard, t0).unwrap();
        let t1 = t0 + Duration::from_millis(1000);
        state.copy(Slot::First, &mut clipboard, t1).unwrap();
        assert_eq!(state.pending_clear(Slot::First), Some(t1 + COPY_FEEDBACK_DELAY));

        // The first copy's deadline has passed but it was replaced
        state.tick(t0 + Duration::from_millis(1500));
        assert!(state.is_confirmed(Slot::First));
    }

    #[test]
    fn test_failed_copy_leaves_state() {
        let mut state = GradientState::default();
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let result = state.copy(Slot::Second, &mut clipboard, Instant::now());
        assert!(result.is_err());
        assert!(!state.is_confirmed(Slot::Second));
        assert_eq!(state.pending_clear(Slot::Second), None);
    }

    #[test]
    fn test_save_twice_gives_distinct_ids() {
        let mut state = GradientState::default();
        let mut rng = rng();
        let a = state.save(&mut rng);
        let b = state.save(&mut rng);
        assert_ne!(a, b);
        assert_eq!(state.saved().len(), 2);
        assert_eq!(state.saved()[0].gradient(), state.saved()[1].gradient());
    }

    #[test]
    fn test_ids_unique_even_with_same_clock() {
        let mut state = GradientState::default();
        // Identical seeds give identical suffixes; the sequence still differs
        let a = state.save_at(&mut StdRng::seed_from_u64(1), 1000);
        let b = state.save_at(&mut StdRng::seed_from_u64(1), 1000);
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_carries_colors_and_timestamp() {
        let mut state = GradientState::default();
        let id = state.save_at(&mut rng(), 1_700_000_000_000);
        assert!(id.starts_with("#F582A8-#FCE0E2-1700000000000-0-"));
        let suffix = id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_save_captures_current_pair() {
        let mut state = GradientState::default();
        let mut rng = rng();
        state.advance(&mut rng);
        let current = state.current();
        let id = state.save(&mut rng);
        state.advance(&mut rng);
        let saved = state.find(&id).unwrap().gradient();
        assert_eq!(saved.from, current.from);
        assert_eq!(saved.to, current.to);
    }

    #[test]
    fn test_recall_keeps_saved_list() {
        let mut state = GradientState::default();
        let mut rng = rng();
        let original = state.current();
        let id = state.save(&mut rng);
        state.advance(&mut rng);

        let mut clipboard = RecordingClipboard::default();
        state.copy(Slot::First, &mut clipboard, Instant::now()).unwrap();

        assert_eq!(state.recall_id(&id), Some(original));
        assert_eq!(state.current().from, original.from);
        assert_eq!(state.saved().len(), 1);
        assert!(!state.is_confirmed(Slot::First));
    }

    #[test]
    fn test_recall_unknown_id_is_noop() {
        let mut state = GradientState::default();
        let before = state.current();
        assert_eq!(state.recall_id("missing"), None);
        assert_eq!(state.current(), before);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut state = GradientState::default();
        let mut rng = rng();
        state.save(&mut rng);
        state.advance(&mut rng);
        state.save(&mut rng);
        let before = state.saved().to_vec();

        assert!(!state.remove("does-not-exist"));
        assert_eq!(state.saved(), &before[..]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut state = GradientState::default();
        let mut rng = rng();
        let a = state.save(&mut rng);
        state.advance(&mut rng);
        let b = state.save(&mut rng);
        state.advance(&mut rng);
        let c = state.save(&mut rng);

        assert!(state.remove(&b));
        let ids: Vec<&str> = state.saved().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str()]);
    }

    #[test]
    fn test_hover_tracking() {
        let mut state = GradientState::default();
        let id = state.save(&mut rng());
        state.set_hover(Some(&id));
        assert_eq!(state.hovered(), Some(id.as_str()));

        state.set_hover(Some("unknown"));
        assert_eq!(state.hovered(), None);

        state.set_hover(Some(&id));
        state.remove(&id);
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn test_gradient_equality_ignores_direction() {
        let g = Gradient::new(DEFAULT_FROM, DEFAULT_TO);
        let flipped = Gradient::new(DEFAULT_TO, DEFAULT_FROM);
        assert_eq!(g, flipped);
        assert_ne!(g, Gradient::new(DEFAULT_FROM, Rgb::BLACK));

        let mut set = std::collections::HashSet::new();
        set.insert(g);
        assert!(set.contains(&flipped));
    }
}
