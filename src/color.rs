//! Deterministic series colors.
//!
//! A series identity (any sequence of displayable parts) is hashed with 32-bit
//! FNV-1, reduced to one of [`HUE_STEPS`] hues and combined with the theme's
//! saturation/value pair. The mapping depends only on the identity text, so
//! colors are stable across runs and independent of call order.

use std::fmt::{self, Write as _};

use crate::render::Color;
use crate::style::Theme;

/// Number of distinct hues a hashed color can take.
pub const HUE_STEPS: u32 = 64;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Maps series identities onto colors for one theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorAssigner {
    theme: Theme,
}

impl ColorAssigner {
    /// Create an assigner for the given theme.
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Access the theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Hash the concatenated identity parts into a color.
    pub fn hash_color(&self, identity: &[&dyn fmt::Display]) -> Color {
        hash_color_with(self.theme, identity)
    }
}

/// Hash `identity` into a color using `theme`'s saturation and value.
pub fn hash_color_with(theme: Theme, identity: &[&dyn fmt::Display]) -> Color {
    let mut text = String::new();
    for part in identity {
        // Writing into a String cannot fail.
        let _ = write!(text, "{part}");
    }
    let (saturation, value) = theme.saturation_value();
    hsv_to_rgb(hash_hue(fnv1_32(text.as_bytes())), saturation, value)
}

/// 32-bit FNV-1 (multiply, then xor).
pub fn fnv1_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u32::from(*byte)
    })
}

/// Quantize a hash onto one of [`HUE_STEPS`] hues in `[0, 360)`.
fn hash_hue(hash: u32) -> f64 {
    let norm = f64::from(hash) / f64::from(u32::MAX);
    // round() can land on HUE_STEPS itself, which is the same hue as 0.
    let step = (norm * f64::from(HUE_STEPS)).round() as u32 % HUE_STEPS;
    f64::from(step) * 360.0 / f64::from(HUE_STEPS)
}

/// Convert HSV (`h` in degrees, `s`/`v` in `[0, 1]`) into an opaque color.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Color {
    let hp = h.rem_euclid(360.0) / 60.0;
    let chroma = v * s;
    let x = chroma * (1.0 - ((hp % 2.0) - 1.0).abs());
    let m = v - chroma;

    let (r, g, b) = match hp as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    Color::new((m + r) as f32, (m + g) as f32, (m + b) as f32, 1.0)
}

/// Format a color as `#RRGGBBAA`.
pub fn hex_color(color: Color) -> String {
    let [r, g, b, a] = color.to_rgba8();
    format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
}
