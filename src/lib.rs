//! gpui_sparklines draws live telemetry streams as smoothly scrolling
//! sparklines.
//!
//! Samples are kept for roughly two window lengths, mapped from time/value
//! into pixels on every draw, and emitted as backend-agnostic path commands.
//! A [`RefreshScheduler`] paces redraws to the display's frame rate. The
//! optional `gpui` feature provides a GPUI view that paints the result.

#![forbid(unsafe_code)]

pub mod clock;
pub mod color;
pub mod error;
pub mod geom;
pub mod ingest;
pub mod line;
pub mod plot;
pub mod refresh;
pub mod render;
pub mod style;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use clock::{Clock, ManualClock, SystemClock};
pub use color::{ColorAssigner, hash_color_with, hex_color};
pub use error::{ConfigError, SampleError};
pub use geom::{Sample, ScreenPoint, ScreenRect};
pub use ingest::{SampleQueue, SampleSink, Update, channel};
pub use line::{Line, SeriesId};
pub use plot::{LineMut, Needle, Plot, PlotBuilder, PlotConfig};
pub use refresh::{
    FrameRateMeter, FrameSampler, FrameStep, RefreshScheduler, RefreshState, TimerHost,
};
pub use render::{Color, LineStyle, PathCommand, RenderList, build_curve};
pub use style::Theme;
pub use transform::Transform;
pub use view::{Range, TimeWindow};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiSparklineView, PlotHandle};
