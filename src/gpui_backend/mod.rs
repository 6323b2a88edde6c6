//! GPUI integration for gpui_sparklines.
//!
//! This module provides a GPUI view that drains queued samples into a
//! [`Plot`](crate::plot::Plot), paces redraws to the display frame rate and
//! strokes the plot's path commands.

mod paint;
mod timer;
mod view;

pub use view::{GpuiSparklineView, PlotHandle};
