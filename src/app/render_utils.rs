use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::graph::NodeStyle;

#[derive(Clone, Copy)]
pub(super) struct NodePalette {
    pub(super) border: Color32,
    pub(super) background: Color32,
    pub(super) highlight_border: Color32,
    pub(super) highlight_background: Color32,
    pub(super) hover_border: Color32,
    pub(super) hover_background: Color32,
}

const CODE_PALETTE: NodePalette = NodePalette {
    border: Color32::from_rgb(0x73, 0x3e, 0x0e),
    background: Color32::from_rgb(0xff, 0x96, 0x35),
    highlight_border: Color32::from_rgb(0x73, 0x19, 0x0e),
    highlight_background: Color32::from_rgb(0xda, 0x35, 0x21),
    hover_border: Color32::from_rgb(0x73, 0x31, 0x0e),
    hover_background: Color32::from_rgb(0xda, 0x4d, 0x21),
};

const TEXT_PALETTE: NodePalette = NodePalette {
    border: Color32::from_rgb(0x11, 0x6e, 0x00),
    background: Color32::from_rgb(0x4c, 0xc8, 0x35),
    highlight_border: Color32::from_rgb(0x00, 0x9c, 0x33),
    highlight_background: Color32::from_rgb(0x06, 0xbe, 0x37),
    hover_border: Color32::from_rgb(0x0f, 0xb2, 0x17),
    hover_background: Color32::from_rgb(0x3a, 0xda, 0x42),
};

const GROUP_PALETTE: NodePalette = NodePalette {
    border: Color32::from_rgb(70, 78, 92),
    background: Color32::from_rgb(128, 138, 156),
    highlight_border: Color32::from_rgb(70, 78, 92),
    highlight_background: Color32::from_rgb(128, 138, 156),
    hover_border: Color32::from_rgb(52, 58, 70),
    hover_background: Color32::from_rgb(150, 160, 178),
};

pub(super) fn node_palette(style: Option<NodeStyle>) -> NodePalette {
    match style {
        Some(NodeStyle::Code) => CODE_PALETTE,
        Some(NodeStyle::Text) => TEXT_PALETTE,
        None => GROUP_PALETTE,
    }
}

pub(super) const CODE_CONTENT_BACKGROUND: Color32 = Color32::from_rgb(38, 38, 38);
pub(super) const CODE_CONTENT_TEXT: Color32 = Color32::WHITE;
pub(super) const TEXT_CONTENT_BACKGROUND: Color32 = Color32::WHITE;
pub(super) const TEXT_CONTENT_TEXT: Color32 = Color32::BLACK;

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(246, 247, 249));

    let step = (64.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(170, 176, 186, 60));

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Draws `start -> end` clipped to the target box, with an arrowhead.
pub(super) fn draw_arrow(painter: &Painter, start: Pos2, end: Rect, stroke: Stroke, head: f32) {
    let tip = box_boundary_point(end, start);
    let delta = tip - start;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }

    let direction = delta / length;
    let normal = Vec2::new(-direction.y, direction.x);
    let base = tip - direction * head;

    painter.line_segment([start, base], stroke);
    painter.add(eframe::egui::Shape::convex_polygon(
        vec![tip, base + normal * (head * 0.5), base - normal * (head * 0.5)],
        stroke.color,
        Stroke::NONE,
    ));
}

/// Where the segment from `from` to the box center crosses the box edge.
fn box_boundary_point(rect: Rect, from: Pos2) -> Pos2 {
    let center = rect.center();
    let delta = from - center;
    let half = rect.size() * 0.5;
    if delta.x.abs() <= f32::EPSILON && delta.y.abs() <= f32::EPSILON {
        return center;
    }

    let scale_x = if delta.x.abs() > f32::EPSILON {
        half.x / delta.x.abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if delta.y.abs() > f32::EPSILON {
        half.y / delta.y.abs()
    } else {
        f32::INFINITY
    };

    center + delta * scale_x.min(scale_y).min(1.0)
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}
