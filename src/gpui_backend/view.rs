use std::sync::{Arc, RwLock};
use std::time::Instant;

use gpui::prelude::*;
use gpui::{Task, Window, canvas, div};

use crate::ingest::SampleQueue;
use crate::plot::Plot;
use crate::refresh::{FrameSampler, RefreshScheduler};

use super::paint::paint_list;
use super::timer::WindowTimers;

/// A GPUI view that renders a scrolling [`Plot`].
///
/// Each frame drains the attached [`SampleQueue`], advances the time window
/// and strokes the plot's paths. Redraws are driven by a timer matching the
/// display frame rate, which is sampled from runs of animation frames.
pub struct GpuiSparklineView {
    plot: Arc<RwLock<Plot>>,
    queue: Option<SampleQueue>,
    sampler: FrameSampler,
    scheduler: RefreshScheduler<Task<()>>,
}

impl GpuiSparklineView {
    /// Create a view for the given plot.
    pub fn new(plot: Plot) -> Self {
        Self {
            plot: Arc::new(RwLock::new(plot)),
            queue: None,
            sampler: FrameSampler::new(),
            scheduler: RefreshScheduler::new(),
        }
    }

    /// Drain `queue` into the plot on every frame.
    pub fn with_queue(mut self, queue: SampleQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Get a handle for configuring the underlying plot.
    pub fn plot_handle(&self) -> PlotHandle {
        PlotHandle {
            plot: Arc::clone(&self.plot),
        }
    }

    /// Mutate the plot and repaint if the change asked for a redraw.
    ///
    /// Unlike [`PlotHandle::write`] this works while the redraw timer is
    /// stopped.
    pub fn update_plot<R>(
        &mut self,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut Plot) -> R,
    ) -> R {
        let mut plot = self.plot.write().expect("plot lock");
        let result = f(&mut plot);
        if plot.take_redraw_request() {
            cx.notify();
        }
        result
    }

    /// Stop the redraw timer, e.g. when the view is hidden. The next render
    /// samples the display rate and starts it again.
    pub fn stop_refresh(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let mut timers = WindowTimers {
            window: &*window,
            cx: &**cx,
            view: cx.weak_entity(),
        };
        self.scheduler.stop(&mut timers);
        self.sampler.resample();
    }

    /// Feed a display rate to the redraw scheduler.
    pub(crate) fn observe_fps(&mut self, fps: f64, window: &mut Window, cx: &mut Context<Self>) {
        let mut timers = WindowTimers {
            window: &*window,
            cx: &**cx,
            view: cx.weak_entity(),
        };
        self.scheduler.observe_fps(fps, &mut timers);
    }

    /// Timer tick: pull queued samples, advance time and repaint on request.
    pub(crate) fn tick(&mut self, cx: &mut Context<Self>) {
        let mut plot = self.plot.write().expect("plot lock");
        if let Some(queue) = &self.queue {
            queue.drain_into(&mut plot);
        }
        plot.invalidate_time();
        if plot.take_redraw_request() {
            cx.notify();
        }
    }

    fn pace(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let step = self.sampler.frame(Instant::now());
        if step.request_frame {
            window.request_animation_frame();
        }
        if let Some(fps) = step.fps {
            self.observe_fps(fps, window, cx);
        }
    }
}

impl Render for GpuiSparklineView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        {
            let mut plot = self.plot.write().expect("plot lock");
            if let Some(queue) = &self.queue {
                queue.drain_into(&mut plot);
            }
            plot.invalidate_time();
            // This frame paints every change requested so far.
            plot.take_redraw_request();
        }
        self.pace(window, cx);

        let plot = Arc::clone(&self.plot);
        div().size_full().child(
            canvas(
                move |bounds, _, _| {
                    let size = (f32::from(bounds.size.width), f32::from(bounds.size.height));
                    plot.write().expect("plot lock").render(size)
                },
                move |bounds, list, window, _| {
                    paint_list(&list, bounds, window);
                },
            )
            .size_full(),
        )
    }
}

/// A handle for mutating a [`Plot`] held inside a `GpuiSparklineView`.
///
/// The handle clones cheaply and can be moved into async tasks.
#[derive(Clone)]
pub struct PlotHandle {
    plot: Arc<RwLock<Plot>>,
}

impl PlotHandle {
    /// Read the plot state.
    ///
    /// The plot is locked for the duration of the callback.
    pub fn read<R>(&self, f: impl FnOnce(&Plot) -> R) -> R {
        let plot = self.plot.read().expect("plot lock");
        f(&plot)
    }

    /// Mutate the plot state.
    ///
    /// The plot is locked for the duration of the callback. The view is not
    /// notified: the change shows on the next timer tick, or use
    /// [`GpuiSparklineView::update_plot`] to repaint right away.
    pub fn write<R>(&self, f: impl FnOnce(&mut Plot) -> R) -> R {
        let mut plot = self.plot.write().expect("plot lock");
        f(&mut plot)
    }
}
