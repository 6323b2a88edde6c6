use gpui::{Bounds, PathBuilder, Pixels, Point, Window, point, px};

use crate::geom::ScreenPoint;
use crate::render::{Color, LineStyle, PathCommand, RenderList};

/// Stroke every path in `list`, offset by the canvas origin.
pub(crate) fn paint_list(list: &RenderList, bounds: Bounds<Pixels>, window: &mut Window) {
    let origin = (f32::from(bounds.origin.x), f32::from(bounds.origin.y));
    let commands = list.commands();
    let mut start = 0;
    for (index, command) in commands.iter().enumerate() {
        if let PathCommand::Stroke(style) = command {
            paint_path(&commands[start..index], *style, origin, window);
            start = index + 1;
        }
    }
}

fn paint_path(commands: &[PathCommand], style: LineStyle, origin: (f32, f32), window: &mut Window) {
    if commands.is_empty() {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    for command in commands {
        match *command {
            PathCommand::MoveTo(to) => builder.move_to(to_point(to, origin)),
            PathCommand::LineTo(to) => builder.line_to(to_point(to, origin)),
            PathCommand::QuadTo { ctrl, to } => {
                builder.curve_to(to_point(to, origin), to_point(ctrl, origin));
            }
            PathCommand::Stroke(_) => {}
        }
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn to_point(screen: ScreenPoint, origin: (f32, f32)) -> Point<Pixels> {
    point(px(origin.0 + screen.x), px(origin.1 + screen.y))
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}
