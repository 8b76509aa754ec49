use eframe::egui::epaint::{CubicBezierShape, QuadraticBezierShape};
use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::layout::EdgePath;

pub(super) fn color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Canvas coordinates have their origin at the top-left of the graph area.
pub(super) fn canvas_to_screen(rect: Rect, position: Vec2) -> Pos2 {
    rect.min + position
}

pub(super) fn screen_to_canvas(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.min
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, fill: Color32) {
    painter.rect_filled(rect, 0.0, fill);
}

fn flatten_edge(rect: Rect, path: &EdgePath) -> Vec<Pos2> {
    let to_screen = |point: Vec2| canvas_to_screen(rect, point);
    match *path {
        EdgePath::Quadratic {
            start,
            control,
            end,
        } => QuadraticBezierShape::from_points_stroke(
            [to_screen(start), to_screen(control), to_screen(end)],
            false,
            Color32::TRANSPARENT,
            Stroke::NONE,
        )
        .flatten(None),
        EdgePath::Cubic {
            start,
            first,
            second,
            end,
        } => CubicBezierShape::from_points_stroke(
            [
                to_screen(start),
                to_screen(first),
                to_screen(second),
                to_screen(end),
            ],
            false,
            Color32::TRANSPARENT,
            Stroke::NONE,
        )
        .flatten(None),
    }
}

/// Shapes for one edge. Dashed edges are split along the flattened curve.
pub(super) fn edge_shapes(
    rect: Rect,
    path: &EdgePath,
    stroke: Stroke,
    dash: Option<[f32; 2]>,
) -> Vec<Shape> {
    let points = flatten_edge(rect, path);
    match dash {
        Some([dash_length, gap_length]) => {
            Shape::dashed_line(&points, stroke, dash_length, gap_length)
        }
        None => vec![Shape::line(points, stroke)],
    }
}
