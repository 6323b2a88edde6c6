//! Redraw pacing driven by the display's frame rate.
//!
//! The host reports frames per second; the scheduler keeps one repeating timer
//! whose period matches it and only touches the timer when the reported rate
//! actually changes.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame intervals averaged by [`FrameRateMeter`].
const METER_WINDOW: usize = 8;
/// Gaps longer than this restart the meter (window hidden, app suspended).
const MAX_FRAME_GAP: Duration = Duration::from_millis(250);
/// Time between display-rate samples taken by [`FrameSampler`].
const SAMPLE_PERIOD: Duration = Duration::from_secs(2);

/// Repeating timers supplied by the host.
///
/// Each tick of a scheduled timer should call [`crate::Plot::invalidate_time`]
/// and redraw.
pub trait TimerHost {
    /// Cancellable handle for a scheduled timer.
    type Handle;

    /// Start a timer firing every `interval`.
    fn schedule_repeating(&mut self, interval: Duration) -> Self::Handle;

    /// Stop a timer.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// No timer is running.
    Idle,
    /// A timer fires every `interval`.
    Scheduled {
        /// Timer period.
        interval: Duration,
    },
}

/// Keeps a redraw timer in step with the display frame rate.
#[derive(Debug)]
pub struct RefreshScheduler<H> {
    last_fps: Option<f64>,
    interval: Option<Duration>,
    handle: Option<H>,
}

impl<H> Default for RefreshScheduler<H> {
    fn default() -> Self {
        Self {
            last_fps: None,
            interval: None,
            handle: None,
        }
    }
}

impl<H> RefreshScheduler<H> {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> RefreshState {
        match (self.handle.is_some(), self.interval) {
            (true, Some(interval)) => RefreshState::Scheduled { interval },
            _ => RefreshState::Idle,
        }
    }

    /// Last frame rate that was acted upon.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }

    /// Period of the running timer.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Feed one frame-rate report. Returns `true` if the timer was
    /// (re)scheduled.
    ///
    /// A report equal to the previous one is ignored, as are non-finite and
    /// non-positive rates.
    pub fn observe_fps<T>(&mut self, fps: f64, host: &mut T) -> bool
    where
        T: TimerHost<Handle = H>,
    {
        if !fps.is_finite() || fps <= 0.0 {
            log::trace!("ignoring frame rate report {fps}");
            return false;
        }
        if self.last_fps == Some(fps) {
            return false;
        }

        if let Some(handle) = self.handle.take() {
            host.cancel(handle);
        }
        let interval = interval_for(fps);
        log::debug!("scheduling redraw every {interval:?} for {fps} fps");
        self.handle = Some(host.schedule_repeating(interval));
        self.interval = Some(interval);
        self.last_fps = Some(fps);
        true
    }

    /// Cancel the timer. Safe to call repeatedly.
    pub fn stop<T>(&mut self, host: &mut T)
    where
        T: TimerHost<Handle = H>,
    {
        if let Some(handle) = self.handle.take() {
            log::debug!("stopping redraw timer");
            host.cancel(handle);
        }
        self.interval = None;
        self.last_fps = None;
    }
}

/// Timer period for a frame rate: `max(1, round(1000 / fps))` milliseconds.
pub fn interval_for(fps: f64) -> Duration {
    let millis = (1000.0 / fps).round().max(1.0);
    Duration::from_millis(millis as u64)
}

/// Estimates the display frame rate from frame timestamps.
///
/// Estimates are rounded to whole frames per second so that jitter between
/// frames does not read as a rate change.
#[derive(Debug, Clone, Default)]
pub struct FrameRateMeter {
    last: Option<Instant>,
    intervals: VecDeque<Duration>,
    total: Duration,
}

impl FrameRateMeter {
    /// Create an empty meter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame presented at `at` and return the current estimate.
    pub fn record(&mut self, at: Instant) -> Option<f64> {
        if let Some(last) = self.last.replace(at) {
            let gap = at.saturating_duration_since(last);
            if gap > MAX_FRAME_GAP {
                self.restart(at);
            } else if !gap.is_zero() {
                if self.intervals.len() == METER_WINDOW {
                    if let Some(oldest) = self.intervals.pop_front() {
                        self.total -= oldest;
                    }
                }
                self.intervals.push_back(gap);
                self.total += gap;
            }
        }
        self.fps()
    }

    /// Current estimate, once enough frames have been seen.
    pub fn fps(&self) -> Option<f64> {
        if !self.is_warm() {
            return None;
        }
        let mean = self.total.as_secs_f64() / self.intervals.len() as f64;
        Some((1.0 / mean).round())
    }

    /// Check whether the meter has a full window of intervals.
    pub fn is_warm(&self) -> bool {
        self.intervals.len() == METER_WINDOW
    }

    /// Forget every interval and treat `at` as the first frame.
    pub fn restart(&mut self, at: Instant) {
        self.last = Some(at);
        self.intervals.clear();
        self.total = Duration::ZERO;
    }
}

/// What the host should do after presenting a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Ask for the next frame at display rate.
    pub request_frame: bool,
    /// Fresh estimate to pass to [`RefreshScheduler::observe_fps`].
    pub fps: Option<f64>,
}

/// Measures the display rate from runs of back-to-back animation frames.
///
/// Frames paced by the refresh timer only reflect the timer's own period, so
/// they are never measured. Once per sampling period the sampler asks the host
/// for consecutive animation frames until the meter is warm, reports the
/// estimate and goes quiet again.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    meter: FrameRateMeter,
    period: Duration,
    next_sample: Option<Instant>,
    chained: bool,
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::with_period(SAMPLE_PERIOD)
    }
}

impl FrameSampler {
    /// Create a sampler that measures right away and then every two seconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sampler measuring once every `period`.
    pub fn with_period(period: Duration) -> Self {
        Self {
            meter: FrameRateMeter::new(),
            period,
            next_sample: None,
            chained: false,
        }
    }

    /// Feed a frame presented at `at`.
    ///
    /// A frame only counts as a display interval when the previous call asked
    /// for it through [`FrameStep::request_frame`].
    pub fn frame(&mut self, at: Instant) -> FrameStep {
        let due = self.next_sample.is_none_or(|next| at >= next);
        if !due {
            self.chained = false;
            return FrameStep {
                request_frame: false,
                fps: None,
            };
        }

        if !self.chained {
            self.meter.restart(at);
        } else if let Some(fps) = self.meter.record(at) {
            log::trace!("sampled display rate {fps} fps");
            self.chained = false;
            self.next_sample = Some(at + self.period);
            return FrameStep {
                request_frame: false,
                fps: Some(fps),
            };
        }
        self.chained = true;
        FrameStep {
            request_frame: true,
            fps: None,
        }
    }

    /// Measure again on the next frame.
    pub fn resample(&mut self) {
        self.next_sample = None;
        self.chained = false;
    }

    /// Check whether a run of animation frames is in progress.
    pub fn is_sampling(&self) -> bool {
        self.chained
    }
}
