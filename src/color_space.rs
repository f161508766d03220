//! Color space conversion
//!
//! Hex RGB <-> HSL conversion, random color sampling, interpolation and
//! terminal color quantization.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terminal_capabilities::ColorSupport;

/// Number of distinct 24-bit colors (16^6)
pub const COLOR_SPACE_SIZE: u32 = 0x100_0000;

/// Errors from strict color parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("expected 6 hex digits, got {0:?}")]
    InvalidLength(String),
    #[error("invalid hex color {input:?}: {reason}")]
    InvalidDigits { input: String, reason: String },
}

/// RGB color type
///
/// Serialized as its canonical `#RRGGBB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from the low 24 bits of `value` (0xRRGGBB)
    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    pub const fn to_u24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Canonical `#RRGGBB` form
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    /// Strict parse of `#RRGGBB` or `RRGGBB`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(ColorError::InvalidLength(s.to_string()));
        }

        let parsed: Srgb<u8> = digits.parse().map_err(|e: palette::rgb::FromHexError| {
            ColorError::InvalidDigits {
                input: s.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Rgb::new(parsed.red, parsed.green, parsed.blue))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// HSL triple: hue in [0, 360) degrees, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Hsl {
    pub const fn new(h: u16, s: u8, l: u8) -> Self {
        Self { h, s, l }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Convert a `#RRGGBB` string to HSL.
///
/// Never fails: input of any length other than 7 is treated as black, and a
/// channel whose two digits are not hex reads as 0.
pub fn hex_to_hsl(hex: &str) -> Hsl {
    if hex.len() != 7 {
        return rgb_to_hsl(Rgb::BLACK);
    }

    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .unwrap_or(0)
    };

    rgb_to_hsl(Rgb::new(channel(1..3), channel(3..5), channel(5..7)))
}

/// Convert an RGB color to integer HSL
pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = color.r as f64 / 255.0;
    let g = color.g as f64 / 255.0;
    let b = color.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    // Achromatic: hue is undefined and reported as 0
    if max == min {
        return Hsl::new(0, 0, (l * 100.0).round() as u8);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    let mut h = sector * 60.0;
    if h < 0.0 {
        h += 360.0;
    }

    Hsl::new(
        (h.round() as u16) % 360,
        (s * 100.0).round() as u8,
        (l * 100.0).round() as u8,
    )
}

/// Convert HSL to an RGB color
///
/// Hue is reduced modulo 360; saturation and lightness clamp at 100.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = (hsl.h % 360) as f64;
    let s = hsl.s.min(100) as f64 / 100.0;
    let l = hsl.l.min(100) as f64 / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match hsl.h % 360 / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let scale = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(scale(r), scale(g), scale(b))
}

/// Convert HSL to an uppercase `#RRGGBB` string
pub fn hsl_to_hex(hsl: Hsl) -> String {
    hsl_to_rgb(hsl).to_hex()
}

/// Draw a uniformly random color from the full 24-bit space
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
    Rgb::from_u24(rng.random_range(0..COLOR_SPACE_SIZE))
}

/// Convert RGB to perceptual luminance (0.0 to 1.0)
///
/// Uses ITU-R BT.709 coefficients.
pub fn rgb_to_luminance(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * (r as f32 / 255.0) + 0.7152 * (g as f32 / 255.0) + 0.0722 * (b as f32 / 255.0)
}

/// Pick black or white text for legibility on top of `background`
pub fn contrast_text(background: Rgb) -> Rgb {
    if rgb_to_luminance(background.r, background.g, background.b) > 0.55 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// Interpolate between two colors
pub fn interpolate_color(start: Rgb, end: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    Rgb {
        r: ((1.0 - t) * start.r as f32 + t * end.r as f32).round() as u8,
        g: ((1.0 - t) * start.g as f32 + t * end.g as f32).round() as u8,
        b: ((1.0 - t) * start.b as f32 + t * end.b as f32).round() as u8,
    }
}

/// Quantize RGB to ANSI 256-color palette
pub fn quantize_to_ansi256(rgb: Rgb) -> u8 {
    let avg = ((rgb.r as u16 + rgb.g as u16 + rgb.b as u16) / 3) as u8;
    let gray_diff = [rgb.r, rgb.g, rgb.b]
        .iter()
        .map(|&c| (c as i16 - avg as i16).abs())
        .max()
        .unwrap_or(0);

    if gray_diff < 10 {
        // Grayscale ramp (232-255, 24 levels)
        let gray_index = (avg as f32 / 255.0 * 23.0).round() as u8;
        return 232 + gray_index;
    }

    // 6x6x6 color cube (16-231)
    let level = |c: u8| (c as f32 / 255.0 * 5.0).round() as u8;
    16 + 36 * level(rgb.r) + 6 * level(rgb.g) + level(rgb.b)
}

/// Quantize RGB to ANSI 16-color palette
pub fn quantize_to_ansi16(rgb: Rgb) -> u8 {
    let luminance = rgb_to_luminance(rgb.r, rgb.g, rgb.b);

    let r = rgb.r as f32 / 255.0;
    let g = rgb.g as f32 / 255.0;
    let b = rgb.b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let saturation = if max > 0.0 { (max - min) / max } else { 0.0 };

    if saturation < 0.2 {
        return if luminance > 0.7 {
            15
        } else if luminance > 0.3 {
            7
        } else {
            0
        };
    }

    let color_base = if r >= g && r >= b {
        if g > b {
            3 // Yellow
        } else {
            1 // Red
        }
    } else if g >= r && g >= b {
        if b > r {
            6 // Cyan
        } else {
            2 // Green
        }
    } else if r > g {
        5 // Magenta
    } else {
        4 // Blue
    };

    if luminance > 0.5 {
        color_base + 8
    } else {
        color_base
    }
}

/// ANSI reset sequence
pub const ANSI_RESET: &str = "\x1b[0m";

/// Format a foreground color escape for the given support level
pub fn format_fg_color(rgb: Rgb, support: ColorSupport) -> String {
    match support {
        ColorSupport::NoColor => String::new(),
        ColorSupport::Color16 => {
            let code = quantize_to_ansi16(rgb);
            if code < 8 {
                format!("\x1b[{}m", 30 + code)
            } else {
                format!("\x1b[{}m", 90 + (code - 8))
            }
        }
        ColorSupport::Color256 => format!("\x1b[38;5;{}m", quantize_to_ansi256(rgb)),
        ColorSupport::TrueColor => format!("\x1b[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b),
    }
}

/// Format a background color escape for the given support level
pub fn format_bg_color(rgb: Rgb, support: ColorSupport) -> String {
    match support {
        ColorSupport::NoColor => String::new(),
        ColorSupport::Color16 => {
            let code = quantize_to_ansi16(rgb);
            if code < 8 {
                format!("\x1b[{}m", 40 + code)
            } else {
                format!("\x1b[{}m", 100 + (code - 8))
            }
        }
        ColorSupport::Color256 => format!("\x1b[48;5;{}m", quantize_to_ansi256(rgb)),
        ColorSupport::TrueColor => format!("\x1b[48;2;{};{};{}m", rgb.r, rgb.g, rgb.b),
    }
}
