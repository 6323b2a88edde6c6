//! Per-stream sample retention and curve construction.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::SampleError;
use crate::geom::{Sample, ScreenPoint};
use crate::render::{Color, LineStyle, PathCommand, build_curve};
use crate::transform::Transform;
use crate::view::{Range, TimeWindow};

static SERIES_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a line; the handle callers keep after
/// [`crate::Plot::add_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId(u64);

impl SeriesId {
    fn next() -> Self {
        Self(SERIES_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A time-ordered, bounded buffer of samples for one rendered line.
///
/// Samples are sorted ascending by timestamp at all times. Besides the raw
/// samples the line remembers its left boundary value between draws so the
/// curve can keep touching the left edge after older samples scroll away.
#[derive(Debug, Clone)]
pub struct Line {
    id: SeriesId,
    samples: Vec<Sample>,
    style: LineStyle,
    first: Option<f64>,
}

impl Line {
    pub(crate) fn new(style: LineStyle) -> Self {
        Self {
            id: SeriesId::next(),
            samples: Vec::new(),
            style,
            first: None,
        }
    }

    /// Access the line identifier.
    pub fn id(&self) -> SeriesId {
        self.id
    }

    /// Access the retained samples, oldest first.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check whether the line holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Access the stroke style.
    pub fn style(&self) -> LineStyle {
        self.style
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    pub(crate) fn set_width(&mut self, width: f32) {
        self.style.width = width;
    }

    pub(crate) fn set_smooth(&mut self, smooth: bool) {
        self.style.smooth = smooth;
    }

    /// Append `value` at the end of `window`.
    ///
    /// When the newest sample is older than `threshold` seconds before the
    /// window end, a copy of it is first placed at `end - threshold` so the
    /// curve holds the old value until just before the new one instead of
    /// drawing one long slope.
    pub(crate) fn push(
        &mut self,
        value: f64,
        window: TimeWindow,
        threshold: f64,
    ) -> Result<(), SampleError> {
        let mut sample = Sample::new(window.end, value);
        if !sample.is_finite() {
            return Err(SampleError::NonFinite {
                timestamp: sample.timestamp,
                value,
            });
        }

        if let Some(last) = self.samples.last().copied() {
            let hold_until = window.end - threshold;
            if last.timestamp < hold_until {
                self.samples.push(Sample::new(hold_until, last.value));
            }
            // A clock stepping backwards must not break the ordering.
            sample.timestamp = sample.timestamp.max(last.timestamp);
        }

        self.samples.push(sample);
        Ok(())
    }

    /// Replace every sample with `samples` not older than `retention_bound`,
    /// sorted by timestamp. Returns the number of rejected non-finite samples.
    pub(crate) fn replace<I>(&mut self, samples: I, retention_bound: f64) -> usize
    where
        I: IntoIterator<Item = Sample>,
    {
        let mut rejected = 0;
        self.samples.clear();
        for sample in samples {
            if !sample.is_finite() {
                rejected += 1;
                continue;
            }
            if sample.timestamp >= retention_bound {
                self.samples.push(sample);
            }
        }
        self.samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        rejected
    }

    /// Drop samples older than `window_start - range`, keeping at least one.
    ///
    /// The buffer is compacted in place. Returns the number of samples removed.
    pub fn prune(&mut self, window_start: f64, range: f64) -> usize {
        let bound = window_start - range;
        let mut pop = 0;
        while pop + 1 < self.samples.len() && self.samples[pop].timestamp < bound {
            pop += 1;
        }
        self.samples.drain(..pop);
        pop
    }

    /// Recompute the boundary anchors for `window`, remembering the new left
    /// value for later frames.
    ///
    /// The left anchor takes the value in effect at the window start (the
    /// newest sample at or before it), falling back to the previous left
    /// value. The right anchor takes the newest sample's value. With no
    /// samples both sit at the top of `value_range`.
    pub(crate) fn update_anchors(
        &mut self,
        window: TimeWindow,
        value_range: Range,
    ) -> (Sample, Sample) {
        let top = value_range.max;
        if self.samples.is_empty() {
            self.first = None;
            return (Sample::new(window.start, top), Sample::new(window.end, top));
        }

        let before = self
            .samples
            .partition_point(|sample| sample.timestamp <= window.start);
        if before > 0 {
            self.first = Some(self.samples[before - 1].value);
        }
        let first = self.first.unwrap_or(top);
        let last = self.samples.last().map_or(top, |sample| sample.value);
        (
            Sample::new(window.start, first),
            Sample::new(window.end, last),
        )
    }

    /// Build this line's path for one frame.
    ///
    /// The path starts at the transformed left anchor, visits every sample
    /// inside `(start, end]` and finishes on the transformed right anchor.
    pub(crate) fn build_path(
        &mut self,
        window: TimeWindow,
        value_range: Range,
        transform: &Transform,
        scratch: &mut Vec<ScreenPoint>,
        out: &mut Vec<PathCommand>,
    ) {
        let (first, last) = self.update_anchors(window, value_range);
        scratch.clear();
        scratch.push(transform.sample_to_screen(first));
        scratch.extend(
            self.samples
                .iter()
                .filter(|sample| sample.timestamp > window.start && sample.timestamp <= window.end)
                .map(|sample| transform.sample_to_screen(*sample)),
        );
        scratch.push(transform.sample_to_screen(last));
        build_curve(scratch, self.style.smooth, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f64 = 0.25;

    fn window(end: f64) -> TimeWindow {
        TimeWindow { start: end - 3.0, end }
    }

    fn timestamps(line: &Line) -> Vec<f64> {
        line.samples().iter().map(|s| s.timestamp).collect()
    }

    #[test]
    fn push_keeps_order() {
        let mut line = Line::new(LineStyle::default());
        for (i, end) in [0.0, 0.05, 0.5, 0.55, 2.0].into_iter().enumerate() {
            line.push(i as f64, window(end), THRESHOLD).unwrap();
            assert!(line.samples().windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }
    }

    #[test]
    fn sparse_updates_dead_reckon() {
        let mut line = Line::new(LineStyle::default());
        line.push(10.0, window(0.0), THRESHOLD).unwrap();
        line.push(20.0, window(1.0), THRESHOLD).unwrap();
        assert_eq!(
            line.samples(),
            &[
                Sample::new(0.0, 10.0),
                Sample::new(0.75, 10.0),
                Sample::new(1.0, 20.0),
            ]
        );
    }

    #[test]
    fn dense_updates_do_not_dead_reckon() {
        let mut line = Line::new(LineStyle::default());
        line.push(10.0, window(0.0), THRESHOLD).unwrap();
        line.push(20.0, window(0.05), THRESHOLD).unwrap();
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn non_finite_value_is_rejected() {
        let mut line = Line::new(LineStyle::default());
        let err = line.push(f64::NAN, window(1.0), THRESHOLD).unwrap_err();
        assert!(matches!(err, SampleError::NonFinite { .. }));
        assert!(line.is_empty());
    }

    #[test]
    fn backwards_clock_does_not_reorder() {
        let mut line = Line::new(LineStyle::default());
        line.push(1.0, window(5.0), THRESHOLD).unwrap();
        line.push(2.0, window(4.0), THRESHOLD).unwrap();
        assert_eq!(timestamps(&line), vec![5.0, 5.0]);
    }

    #[test]
    fn replace_sorts_and_filters() {
        let mut line = Line::new(LineStyle::default());
        let rejected = line.replace(
            [
                Sample::new(2.0, 5.0),
                Sample::new(-9.0, 7.0),
                Sample::new(0.0, 1.0),
                Sample::new(f64::NAN, 1.0),
                Sample::new(1.0, 3.0),
            ],
            -3.0,
        );
        assert_eq!(rejected, 1);
        assert_eq!(
            line.samples(),
            &[
                Sample::new(0.0, 1.0),
                Sample::new(1.0, 3.0),
                Sample::new(2.0, 5.0),
            ]
        );
    }

    #[test]
    fn prune_respects_retention_bound() {
        let mut line = Line::new(LineStyle::default());
        line.replace((0..10).map(|t| Sample::new(t as f64, 1.0)), f64::MIN);
        let removed = line.prune(8.0, 3.0);
        assert_eq!(removed, 5);
        assert_eq!(timestamps(&line), vec![5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn prune_keeps_one_sentinel() {
        let mut line = Line::new(LineStyle::default());
        line.replace([Sample::new(0.0, 1.0), Sample::new(1.0, 2.0)], f64::MIN);
        line.prune(100.0, 3.0);
        assert_eq!(line.samples(), &[Sample::new(1.0, 2.0)]);
        line.prune(200.0, 3.0);
        assert_eq!(line.len(), 1);
    }

    #[test]
    fn empty_line_anchors_at_top() {
        let mut line = Line::new(LineStyle::default());
        let (first, last) = line.update_anchors(window(3.0), Range::new(0.0, 100.0));
        assert_eq!(first, Sample::new(0.0, 100.0));
        assert_eq!(last, Sample::new(3.0, 100.0));
    }

    #[test]
    fn left_anchor_remembers_previous_value() {
        let mut line = Line::new(LineStyle::default());
        line.replace([Sample::new(1.0, 40.0), Sample::new(5.0, 60.0)], f64::MIN);
        let range = Range::new(0.0, 100.0);

        let (first, last) = line.update_anchors(window(4.0), range);
        assert_eq!(first, Sample::new(1.0, 40.0));
        assert_eq!(last, Sample::new(4.0, 60.0));

        line.prune(7.0, 0.0);
        let (first, _) = line.update_anchors(TimeWindow { start: 4.5, end: 7.0 }, range);
        assert_eq!(first.value, 40.0);
    }
}
