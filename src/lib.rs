//! gradbox - Terminal Gradient Explorer
//!
//! A TUI application that shows a two-color gradient, draws new ones at
//! random, copies hex codes to the clipboard and keeps bookmarks for the
//! session.

pub mod clipboard;
pub mod color_space;
pub mod config;
pub mod export;
pub mod gradient;
pub mod input;
pub mod logging;
pub mod state;
pub mod terminal_capabilities;
pub mod ui;
pub mod worker;

// Re-export commonly used types
pub use color_space::{hex_to_hsl, hsl_to_hex, Hsl, Rgb};
pub use config::Config;
pub use gradient::{Gradient, GradientState, SavedGradient, Slot};
pub use state::AppState;
