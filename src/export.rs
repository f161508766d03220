//! Gradient rasterization
//!
//! Samples a gradient along a CSS-style angle and renders it as a PNG-ready
//! image or as an ANSI colored strip for plain terminal output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgb as Pixel, RgbImage};

use crate::color_space::{format_bg_color, interpolate_color, Rgb, ANSI_RESET};
use crate::gradient::Gradient;
use crate::terminal_capabilities::ColorSupport;

/// Top-left to bottom-right, like `linear-gradient(135deg, ...)`
pub const DEFAULT_ANGLE_DEG: f32 = 135.0;

/// Position (0.0 to 1.0) of pixel center `(x, y)` along a gradient line at
/// `angle_deg`, measured clockwise from "to top".
///
/// The gradient line is sized so the corners hit exactly 0.0 and 1.0.
pub fn gradient_position(x: f32, y: f32, width: f32, height: f32, angle_deg: f32) -> f32 {
    let angle = angle_deg.to_radians();
    let (sin, cos) = angle.sin_cos();
    let line_length = (width * sin).abs() + (height * cos).abs();
    if line_length <= f32::EPSILON {
        return 0.0;
    }

    let dx = x - width / 2.0;
    let dy = y - height / 2.0;
    (((dx * sin - dy * cos) / line_length) + 0.5).clamp(0.0, 1.0)
}

/// Color of the gradient at pixel `(x, y)` of a `width` x `height` grid
pub fn sample(gradient: &Gradient, x: u32, y: u32, width: u32, height: u32, angle_deg: f32) -> Rgb {
    let t = gradient_position(
        x as f32 + 0.5,
        y as f32 + 0.5,
        width as f32,
        height as f32,
        angle_deg,
    );
    interpolate_color(gradient.from, gradient.to, t)
}

/// Render a gradient into an RGB image
pub fn render_image(gradient: &Gradient, width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let c = sample(gradient, x, y, width, height, DEFAULT_ANGLE_DEG);
        Pixel([c.r, c.g, c.b])
    })
}

/// Render a gradient and write it as PNG
pub fn export_png(gradient: &Gradient, width: u32, height: u32, path: &Path) -> Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("export size must be non-zero, got {}x{}", width, height);
    }

    let image = render_image(gradient, width, height);
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Default export file name, e.g. `gradient-F582A8-FCE0E2.png`
pub fn export_file_name(gradient: &Gradient) -> PathBuf {
    let strip = |c: Rgb| c.to_hex().trim_start_matches('#').to_string();
    PathBuf::from(format!(
        "gradient-{}-{}.png",
        strip(gradient.from),
        strip(gradient.to)
    ))
}

/// Render a gradient as `rows` lines of colored cells followed by the hex
/// codes. Without color support only the hex line is produced.
pub fn render_ansi_strip(
    gradient: &Gradient,
    width: usize,
    rows: usize,
    support: ColorSupport,
) -> String {
    let mut output = String::new();

    if support != ColorSupport::NoColor {
        for y in 0..rows {
            for x in 0..width {
                // Terminal cells are about twice as tall as wide
                let c = sample(
                    gradient,
                    x as u32,
                    (y * 2) as u32,
                    width as u32,
                    (rows * 2) as u32,
                    DEFAULT_ANGLE_DEG,
                );
                output.push_str(&format_bg_color(c, support));
                output.push(' ');
            }
            output.push_str(ANSI_RESET);
            output.push('\n');
        }
    }

    output.push_str(&gradient.label());
    output.push('\n');
    output
}
