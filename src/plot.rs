//! Plot entry points and builders.
//!
//! A [`Plot`] owns the sliding [`TimeWindow`], the fixed value range and every
//! [`Line`] drawn into it. It never paints: [`Plot::render`] produces a
//! [`RenderList`] for a backend to stroke.

use std::fmt;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::color::ColorAssigner;
use crate::error::{ConfigError, SampleError};
use crate::geom::{Sample, ScreenPoint};
use crate::line::{Line, SeriesId};
use crate::render::{Color, LineStyle, PathCommand, RenderList};
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::{Range, TimeWindow};

/// Plot configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotConfig {
    /// Length of the visible time window.
    pub duration: Duration,
    /// Fixed vertical scale.
    pub value_range: Range,
    /// Horizontal and vertical insets in pixels.
    pub padding: (f32, f32),
    /// Gap after which a new point is preceded by a held copy of the previous one.
    pub interpolation_threshold: Duration,
    /// Theme for default and hashed colors.
    pub theme: Theme,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(3),
            value_range: Range::new(0.0, 100.0),
            padding: (0.0, 0.0),
            interpolation_threshold: Duration::from_millis(100),
            theme: Theme::default(),
        }
    }
}

impl PlotConfig {
    /// Check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration.is_zero() {
            return Err(ConfigError::InvalidDuration);
        }
        let Range { min, max } = self.value_range;
        if Range::checked(min, max).is_none() {
            return Err(ConfigError::InvalidRange { min, max });
        }
        let (x, y) = self.padding;
        if !(x.is_finite() && y.is_finite() && x >= 0.0 && y >= 0.0) {
            return Err(ConfigError::InvalidPadding { x, y });
        }
        if self.interpolation_threshold >= self.duration {
            return Err(ConfigError::InvalidThreshold);
        }
        Ok(())
    }
}

/// Vertical marker at a fixed offset behind the window end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Needle {
    offset: Duration,
    style: LineStyle,
    timestamp: f64,
}

impl Needle {
    /// Distance from the window end.
    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Stroke style.
    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// Time the needle currently marks.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Bottom and top endpoints; both share the needle's timestamp.
    pub fn endpoints(&self, value_range: Range) -> (Sample, Sample) {
        (
            Sample::new(self.timestamp, value_range.min),
            Sample::new(self.timestamp, value_range.max),
        )
    }

    fn track(&mut self, window: TimeWindow) {
        self.timestamp = window.end - self.offset.as_secs_f64();
    }
}

/// Scrolling sparkline plot.
#[derive(Debug)]
pub struct Plot {
    config: PlotConfig,
    clock: Box<dyn Clock>,
    window: TimeWindow,
    lines: Vec<Line>,
    needle: Option<Needle>,
    redraw: bool,
    scratch: Vec<ScreenPoint>,
    path: Vec<PathCommand>,
}

impl Plot {
    /// Create a plot reading the system clock.
    pub fn new(config: PlotConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }

    /// Create a plot reading the given clock.
    pub fn with_clock(config: PlotConfig, clock: impl Clock + 'static) -> Result<Self, ConfigError> {
        Self::from_parts(config, Box::new(clock))
    }

    fn from_parts(config: PlotConfig, clock: Box<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = TimeWindow::ending_at(clock.now(), config.duration);
        Ok(Self {
            config,
            clock,
            window,
            lines: Vec::new(),
            needle: None,
            redraw: true,
            scratch: Vec::new(),
            path: Vec::new(),
        })
    }

    /// Start building a plot with custom configuration.
    pub fn builder() -> PlotBuilder {
        PlotBuilder::default()
    }

    /// Access the configuration.
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Access the time window as of the last invalidation.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Color assigner for the plot's theme.
    pub fn colors(&self) -> ColorAssigner {
        ColorAssigner::new(self.config.theme)
    }

    /// Access all lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Access one line.
    pub fn line(&self, id: SeriesId) -> Option<&Line> {
        self.lines.iter().find(|line| line.id() == id)
    }

    /// Mutable handle on one line.
    pub fn line_mut(&mut self, id: SeriesId) -> Option<LineMut<'_>> {
        let index = self.index_of(id)?;
        Some(LineMut { plot: self, index })
    }

    /// Register a new line drawn in the theme's foreground color.
    pub fn add_line(&mut self) -> SeriesId {
        let line = Line::new(LineStyle {
            color: self.config.theme.foreground(),
            ..LineStyle::default()
        });
        let id = line.id();
        self.lines.push(line);
        id
    }

    /// Detach and drop a line. Returns `false` if it was not part of the plot.
    pub fn remove_line(&mut self, id: SeriesId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.lines.remove(index);
        self.request_redraw();
        true
    }

    /// Set the window length. Takes effect on the next invalidation.
    pub fn set_duration(&mut self, duration: Duration) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.duration = duration)
    }

    /// Set the vertical scale.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.value_range = Range { min, max })
    }

    /// Set the insets subtracted from the drawing surface.
    pub fn set_padding(&mut self, x: f32, y: f32) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.padding = (x, y))
    }

    /// Set the dead-reckoning gap.
    pub fn set_interpolation_threshold(&mut self, threshold: Duration) -> Result<(), ConfigError> {
        self.reconfigure(|config| config.interpolation_threshold = threshold)
    }

    fn reconfigure(&mut self, apply: impl FnOnce(&mut PlotConfig)) -> Result<(), ConfigError> {
        let mut next = self.config;
        apply(&mut next);
        if let Err(err) = next.validate() {
            log::debug!("rejected plot configuration: {err}");
            return Err(err);
        }
        self.config = next;
        Ok(())
    }

    /// Show a needle `offset` behind the window end. `None` uses the theme
    /// foreground.
    pub fn set_needle(&mut self, offset: Duration, color: Option<Color>, width: f32) {
        let mut needle = Needle {
            offset,
            style: LineStyle {
                color: color.unwrap_or_else(|| self.config.theme.foreground()),
                width,
                smooth: false,
            },
            timestamp: 0.0,
        };
        needle.track(self.window);
        self.needle = Some(needle);
        self.request_redraw();
    }

    /// Hide the needle.
    pub fn clear_needle(&mut self) {
        if self.needle.take().is_some() {
            self.request_redraw();
        }
    }

    /// Access the needle.
    pub fn needle(&self) -> Option<&Needle> {
        self.needle.as_ref()
    }

    /// Slide the window to the clock's "now", move the needle, prune every
    /// line and request a redraw.
    ///
    /// Call this at least once per rendered frame.
    pub fn invalidate_time(&mut self) {
        self.advance_window();
        self.prune();
        self.request_redraw();
    }

    fn advance_window(&mut self) {
        self.window.advance(self.clock.now(), self.config.duration);
        if let Some(needle) = self.needle.as_mut() {
            needle.track(self.window);
        }
    }

    fn prune(&mut self) {
        let range = self.config.duration.as_secs_f64();
        for line in &mut self.lines {
            let removed = line.prune(self.window.start, range);
            if removed > 0 {
                log::trace!("pruned {removed} samples from {:?}", line.id());
            }
        }
    }

    /// Append `value` to a line, stamped with the current time.
    pub fn add_point(&mut self, id: SeriesId, value: f64) -> Result<(), SampleError> {
        let index = self.index_of(id).ok_or(SampleError::UnknownSeries(id))?;
        self.advance_window();
        let threshold = self.config.interpolation_threshold.as_secs_f64();
        if let Err(err) = self.lines[index].push(value, self.window, threshold) {
            log::debug!("dropped sample for {id:?}: {err}");
            return Err(err);
        }
        self.prune();
        self.request_redraw();
        Ok(())
    }

    /// Replace a line's samples, sorting them by timestamp and dropping those
    /// older than the retention bound.
    pub fn set_points<I>(&mut self, id: SeriesId, samples: I) -> Result<(), SampleError>
    where
        I: IntoIterator<Item = Sample>,
    {
        let index = self.index_of(id).ok_or(SampleError::UnknownSeries(id))?;
        self.advance_window();
        let bound = self.window.retention_bound();
        let rejected = self.lines[index].replace(samples, bound);
        if rejected > 0 {
            log::debug!("dropped {rejected} non-finite samples for {id:?}");
        }
        self.request_redraw();
        Ok(())
    }

    /// Ask the host to redraw.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Check whether a redraw is pending.
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Return and clear the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    /// Transform for a drawing surface of `size` pixels.
    pub fn transform(&self, size: (f32, f32)) -> Option<Transform> {
        Transform::new(
            self.window,
            self.config.value_range,
            size,
            self.config.padding,
        )
    }

    /// Describe the current frame for a surface of `size` pixels.
    ///
    /// Every line becomes one stroked path from the left to the right edge of
    /// the padded surface, followed by the needle if one is set. An empty list
    /// is returned when the surface is too small to draw into.
    pub fn render(&mut self, size: (f32, f32)) -> RenderList {
        let mut list = RenderList::new();
        let Some(transform) = self.transform(size) else {
            return list;
        };
        let value_range = self.config.value_range;

        for line in &mut self.lines {
            line.build_path(
                self.window,
                value_range,
                &transform,
                &mut self.scratch,
                &mut self.path,
            );
            list.stroke_path(&self.path, line.style());
        }

        if let Some(needle) = &self.needle {
            let (bottom, top) = needle.endpoints(value_range);
            list.stroke_path(
                &[
                    PathCommand::MoveTo(transform.sample_to_screen(bottom)),
                    PathCommand::LineTo(transform.sample_to_screen(top)),
                ],
                needle.style,
            );
        }
        list
    }

    fn index_of(&self, id: SeriesId) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == id)
    }
}

/// Mutable handle on one line of a [`Plot`].
pub struct LineMut<'a> {
    plot: &'a mut Plot,
    index: usize,
}

impl LineMut<'_> {
    /// Identifier of the line.
    pub fn id(&self) -> SeriesId {
        self.line().id()
    }

    /// Read-only view of the line.
    pub fn line(&self) -> &Line {
        &self.plot.lines[self.index]
    }

    /// Append `value` stamped with the current time.
    pub fn add_point(&mut self, value: f64) -> Result<(), SampleError> {
        let id = self.id();
        self.plot.add_point(id, value)
    }

    /// Replace all samples.
    pub fn set_points<I>(&mut self, samples: I) -> Result<(), SampleError>
    where
        I: IntoIterator<Item = Sample>,
    {
        let id = self.id();
        self.plot.set_points(id, samples)
    }

    /// Set the stroke color.
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        self.plot.lines[self.index].set_color(color);
        self.plot.request_redraw();
        self
    }

    /// Derive the stroke color from an identity, e.g. `&[&"motor", &0]`.
    pub fn set_color_from_identity(&mut self, identity: &[&dyn fmt::Display]) -> &mut Self {
        let color = self.plot.colors().hash_color(identity);
        self.set_color(color)
    }

    /// Set the stroke width in pixels.
    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.plot.lines[self.index].set_width(width);
        self.plot.request_redraw();
        self
    }

    /// Toggle quadratic smoothing.
    pub fn set_smooth(&mut self, smooth: bool) -> &mut Self {
        self.plot.lines[self.index].set_smooth(smooth);
        self.plot.request_redraw();
        self
    }
}

/// Builder for configuring a plot before construction.
#[derive(Debug, Default)]
pub struct PlotBuilder {
    config: PlotConfig,
    clock: Option<Box<dyn Clock>>,
}

impl PlotBuilder {
    /// Set the window length.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration = duration;
        self
    }

    /// Set the vertical scale.
    pub fn value_range(mut self, min: f64, max: f64) -> Self {
        self.config.value_range = Range { min, max };
        self
    }

    /// Set the surface insets.
    pub fn padding(mut self, x: f32, y: f32) -> Self {
        self.config.padding = (x, y);
        self
    }

    /// Set the dead-reckoning gap.
    pub fn interpolation_threshold(mut self, threshold: Duration) -> Self {
        self.config.interpolation_threshold = threshold;
        self
    }

    /// Set the theme used by the plot.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.config.theme = theme;
        self
    }

    /// Read time from `clock` instead of the system clock.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Build the plot.
    pub fn build(self) -> Result<Plot, ConfigError> {
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        Plot::from_parts(self.config, clock)
    }
}
