//! Coordinate transforms between data and screen space.

use crate::geom::{Sample, ScreenPoint, ScreenRect};
use crate::view::{Range, TimeWindow};

/// Transform from `(time, value)` into screen coordinates.
///
/// Time maps linearly onto `[px, w - px]` and value onto `[h - py, py]`, so
/// larger values draw higher. Rebuild it on every draw: the surface size can
/// change independently of the data.
#[derive(Debug, Clone)]
pub struct Transform {
    time: Range,
    value: Range,
    screen: ScreenRect,
}

impl Transform {
    /// Create a transform for a surface of `size` with `padding` insets.
    ///
    /// Returns `None` when the padded surface has no area or either axis has
    /// an empty span.
    pub fn new(
        window: TimeWindow,
        value: Range,
        size: (f32, f32),
        padding: (f32, f32),
    ) -> Option<Self> {
        let screen = ScreenRect::from_size(size.0, size.1).inset(padding.0, padding.1);
        if !screen.is_valid() {
            return None;
        }
        let time = window.as_range();
        if !time.is_valid() || !value.is_valid() {
            return None;
        }
        Some(Self {
            time,
            value,
            screen,
        })
    }

    /// Access the padded screen rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a timestamp onto the X axis.
    pub fn time_to_x(&self, timestamp: f64) -> f32 {
        let norm = (timestamp - self.time.min) / self.time.span();
        (self.screen.min.x as f64 + norm * self.screen.width() as f64) as f32
    }

    /// Map a value onto the Y axis.
    pub fn value_to_y(&self, value: f64) -> f32 {
        let norm = (value - self.value.min) / self.value.span();
        (self.screen.max.y as f64 - norm * self.screen.height() as f64) as f32
    }

    /// Map a sample into screen space.
    pub fn sample_to_screen(&self, sample: Sample) -> ScreenPoint {
        ScreenPoint::new(
            self.time_to_x(sample.timestamp),
            self.value_to_y(sample.value),
        )
    }

    /// Map a screen point back into data space.
    pub fn screen_to_sample(&self, point: ScreenPoint) -> Sample {
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        Sample::new(
            self.time.min + x_norm * self.time.span(),
            self.value.min + y_norm * self.value.span(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> Transform {
        let window = TimeWindow { start: 0.0, end: 10.0 };
        Transform::new(window, Range::new(0.0, 100.0), (120.0, 60.0), (10.0, 5.0))
            .expect("valid transform")
    }

    #[test]
    fn padding_maps_window_edges() {
        let transform = transform();
        assert_eq!(transform.time_to_x(0.0), 10.0);
        assert_eq!(transform.time_to_x(10.0), 110.0);
        assert_eq!(transform.value_to_y(0.0), 55.0);
        assert_eq!(transform.value_to_y(100.0), 5.0);
    }

    #[test]
    fn time_is_strictly_monotonic() {
        let transform = transform();
        let mut previous = transform.time_to_x(0.0);
        for step in 1..=100 {
            let x = transform.time_to_x(step as f64 * 0.1);
            assert!(x > previous, "x at step {step} did not increase");
            previous = x;
        }
    }

    #[test]
    fn roundtrip() {
        let transform = transform();
        let sample = Sample::new(2.5, 75.0);
        let back = transform.screen_to_sample(transform.sample_to_screen(sample));
        assert!((back.timestamp - sample.timestamp).abs() < 1e-4);
        assert!((back.value - sample.value).abs() < 1e-4);
    }

    #[test]
    fn rejects_degenerate_surface() {
        let window = TimeWindow { start: 0.0, end: 1.0 };
        assert!(Transform::new(window, Range::new(0.0, 1.0), (10.0, 10.0), (5.0, 0.0)).is_none());
        assert!(Transform::new(window, Range::new(0.0, 1.0), (0.0, 10.0), (0.0, 0.0)).is_none());
    }
}
