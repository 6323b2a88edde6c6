//! Error types.

use crate::line::SeriesId;

/// Rejected plot configuration. The plot keeps its previous settings.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("duration must be positive and finite")]
    InvalidDuration,
    #[error("value range must satisfy min < max with finite bounds (got {min}..{max})")]
    InvalidRange { min: f64, max: f64 },
    #[error("padding must be finite and non-negative (got {x}, {y})")]
    InvalidPadding { x: f32, y: f32 },
    #[error("interpolation threshold must be shorter than the duration")]
    InvalidThreshold,
}

/// A sample that could not be applied to a series.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    #[error("non-finite sample ({timestamp}, {value})")]
    NonFinite { timestamp: f64, value: f64 },
    #[error("no series with id {0:?}")]
    UnknownSeries(SeriesId),
    #[error("sample queue disconnected")]
    Disconnected,
}
