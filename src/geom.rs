//! Geometric primitives used by the sparkline pipeline.
//!
//! [`Sample`] lives in data space (seconds since the Unix epoch against a
//! value). Screen-space types carry logical pixels and are what render
//! backends consume.

/// One observation of a telemetry stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    /// Observed value.
    pub value: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Check whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.value.is_finite()
    }
}

impl From<(f64, f64)> for Sample {
    fn from((timestamp, value): (f64, f64)) -> Self {
        Self::new(timestamp, value)
    }
}

/// A point in screen space (pixel coordinates, Y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Rectangle of the given size anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(width, height))
    }

    /// Shrink the rectangle by `x` on the left and right and `y` on the top
    /// and bottom.
    pub fn inset(&self, x: f32, y: f32) -> Self {
        Self::new(
            ScreenPoint::new(self.min.x + x, self.min.y + y),
            ScreenPoint::new(self.max.x - x, self.max.y - y),
        )
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_shrinks_both_axes() {
        let rect = ScreenRect::from_size(100.0, 40.0).inset(5.0, 2.0);
        assert_eq!(rect.min, ScreenPoint::new(5.0, 2.0));
        assert_eq!(rect.max, ScreenPoint::new(95.0, 38.0));
        assert!(rect.is_valid());
    }

    #[test]
    fn oversized_inset_is_invalid() {
        let rect = ScreenRect::from_size(10.0, 10.0).inset(6.0, 0.0);
        assert!(!rect.is_valid());
    }

    #[test]
    fn non_finite_sample_is_detected() {
        assert!(Sample::new(1.0, 2.0).is_finite());
        assert!(!Sample::new(f64::NAN, 2.0).is_finite());
        assert!(!Sample::new(1.0, f64::INFINITY).is_finite());
    }
}
