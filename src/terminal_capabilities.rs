//! Terminal capability detection
//!
//! Detects color support and terminal size so swatches degrade gracefully on
//! terminals without 24-bit color.

use crossterm::terminal;
use std::env;

/// Level of color support in the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSupport {
    /// No color support
    NoColor,
    /// 16 basic colors
    Color16,
    /// 256 color palette
    Color256,
    /// Full 24-bit RGB (TrueColor)
    #[default]
    TrueColor,
}

impl ColorSupport {
    pub fn name(&self) -> &'static str {
        match self {
            ColorSupport::NoColor => "None",
            ColorSupport::Color16 => "16 Colors",
            ColorSupport::Color256 => "256 Colors",
            ColorSupport::TrueColor => "True Color",
        }
    }
}

/// Terminal capabilities
#[derive(Debug, Clone)]
pub struct TerminalCapabilities {
    pub color_support: ColorSupport,
    pub size: (u16, u16),
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            color_support: ColorSupport::TrueColor,
            size: (80, 24),
        }
    }
}

/// Detect terminal capabilities
pub fn detect_capabilities() -> TerminalCapabilities {
    TerminalCapabilities {
        color_support: color_support_from(|key| env::var(key).ok()),
        size: terminal::size().unwrap_or((80, 24)),
    }
}

/// Decide the color support level from environment lookups
pub fn color_support_from<F>(lookup: F) -> ColorSupport
where
    F: Fn(&str) -> Option<String>,
{
    // https://no-color.org
    if lookup("NO_COLOR").is_some() {
        return ColorSupport::NoColor;
    }

    let colorterm = lookup("COLORTERM").map(|v| v.to_lowercase());
    if let Some(ref colorterm) = colorterm {
        if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            return ColorSupport::TrueColor;
        }
    }

    if let Some(term) = lookup("TERM").map(|v| v.to_lowercase()) {
        if term.contains("kitty")
            || term.contains("alacritty")
            || term.contains("iterm")
            || term.contains("vte")
            || term.contains("256color")
        {
            // Many 256color terminals also support TrueColor
            if colorterm.is_some() {
                return ColorSupport::TrueColor;
            }
            return ColorSupport::Color256;
        }

        if term.contains("xterm") {
            return ColorSupport::Color16;
        }

        if term.contains("screen") || term.contains("tmux") {
            return ColorSupport::Color256;
        }

        if term.contains("linux") || term.contains("console") {
            return ColorSupport::Color16;
        }
    }

    // Windows Terminal
    if lookup("WT_SESSION").is_some() {
        return ColorSupport::TrueColor;
    }

    ColorSupport::Color256
}
