//! Rendering primitives and path construction.
//!
//! These types are backend-agnostic: a plot emits a [`RenderList`] of path
//! commands and a backend (such as the GPUI backend) strokes them onto its own
//! surface. Nothing here touches pixels.

use crate::geom::ScreenPoint;

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Quantize each channel to 8 bits, truncating.
    pub fn to_rgba8(self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
    /// Join samples with quadratic segments instead of straight lines.
    pub smooth: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            smooth: true,
        }
    }
}

/// One step of a path description.
///
/// A `Stroke` finishes the path built since the previous `MoveTo` and strokes
/// it with the given style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Begin a new subpath.
    MoveTo(ScreenPoint),
    /// Straight segment to a point.
    LineTo(ScreenPoint),
    /// Quadratic Bézier segment.
    QuadTo {
        /// Control point.
        ctrl: ScreenPoint,
        /// End point.
        to: ScreenPoint,
    },
    /// Stroke the current path.
    Stroke(LineStyle),
}

/// Aggregated render commands for one frame.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<PathCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Append a whole path followed by its stroke.
    pub fn stroke_path(&mut self, path: &[PathCommand], style: LineStyle) {
        self.commands.extend_from_slice(path);
        self.commands.push(PathCommand::Stroke(style));
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check whether nothing will be drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Build the path through `points`, which must start and end with the
/// boundary anchors.
///
/// Without smoothing this is a plain polyline. With smoothing every interior
/// point becomes the control point of a quadratic segment that ends halfway
/// to the next point, and the final segment lands exactly on the last point.
pub fn build_curve(points: &[ScreenPoint], smooth: bool, out: &mut Vec<PathCommand>) {
    out.clear();
    let Some((&first, rest)) = points.split_first() else {
        return;
    };
    out.push(PathCommand::MoveTo(first));
    if rest.is_empty() {
        return;
    }

    if !smooth {
        out.extend(rest.iter().copied().map(PathCommand::LineTo));
        return;
    }

    let len = points.len();
    for i in 1..len.saturating_sub(2) {
        out.push(PathCommand::QuadTo {
            ctrl: points[i],
            to: points[i].midpoint(points[i + 1]),
        });
    }
    let ctrl = if len > 2 { len - 2 } else { 0 };
    out.push(PathCommand::QuadTo {
        ctrl: points[ctrl],
        to: points[ctrl + 1],
    });
}

fn endpoint(command: &PathCommand) -> Option<ScreenPoint> {
    match command {
        PathCommand::MoveTo(point) | PathCommand::LineTo(point) => Some(*point),
        PathCommand::QuadTo { to, .. } => Some(*to),
        PathCommand::Stroke(_) => None,
    }
}

/// First and last coordinates visited by a path.
pub fn path_extent(path: &[PathCommand]) -> Option<(ScreenPoint, ScreenPoint)> {
    let first = path.iter().find_map(endpoint)?;
    let last = path.iter().rev().find_map(endpoint)?;
    Some((first, last))
}
