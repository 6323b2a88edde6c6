//! Themes.

use crate::render::Color;

/// Visual theme for plots.
///
/// The theme picks the saturation/value pair used for hashed series colors and
/// the foreground used when no explicit color is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light backgrounds: pastel line colors.
    #[default]
    Light,
    /// Dark backgrounds: saturated line colors.
    Dark,
}

impl Theme {
    /// Saturation and value used by [`crate::ColorAssigner`].
    pub fn saturation_value(self) -> (f64, f64) {
        match self {
            Self::Light => (0.40, 0.85),
            Self::Dark => (0.95, 0.65),
        }
    }

    /// Default foreground for lines and needles.
    pub fn foreground(self) -> Color {
        match self {
            Self::Light => Color::BLACK,
            Self::Dark => Color::WHITE,
        }
    }
}
