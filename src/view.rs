//! Value ranges and the sliding time window.

use std::time::Duration;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Create a range only if `min < max` and both bounds are finite.
    pub fn checked(min: f64, max: f64) -> Option<Self> {
        let range = Self { min, max };
        range.is_valid().then_some(range)
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// The visible time interval `[now - range, now]`, in epoch seconds.
///
/// The window is only moved by [`TimeWindow::advance`]; every plot calls it
/// once per invalidation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    /// Oldest visible timestamp.
    pub start: f64,
    /// Newest visible timestamp ("now").
    pub end: f64,
}

impl TimeWindow {
    /// Window ending at `now` and spanning `range`.
    pub fn ending_at(now: f64, range: Duration) -> Self {
        Self {
            start: now - range.as_secs_f64(),
            end: now,
        }
    }

    /// Slide the window so it ends at `now`.
    pub fn advance(&mut self, now: f64, range: Duration) {
        *self = Self::ending_at(now, range);
    }

    /// Oldest timestamp a series may keep: one extra window behind `start`.
    pub fn retention_bound(&self) -> f64 {
        self.start - self.span()
    }

    /// Window length in seconds.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// The window as a [`Range`] over time.
    pub fn as_range(&self) -> Range {
        Range::new(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_rejects_empty_and_inverted() {
        assert!(Range::checked(0.0, 100.0).is_some());
        assert!(Range::checked(5.0, 5.0).is_none());
        assert!(Range::checked(10.0, 0.0).is_none());
        assert!(Range::checked(f64::NEG_INFINITY, 0.0).is_none());
    }

    #[test]
    fn window_trails_now() {
        let mut window = TimeWindow::ending_at(10.0, Duration::from_secs(3));
        assert_eq!(window.start, 7.0);
        assert_eq!(window.retention_bound(), 4.0);

        window.advance(12.5, Duration::from_secs(3));
        assert_eq!(window.start, 9.5);
        assert_eq!(window.end, 12.5);
    }
}
