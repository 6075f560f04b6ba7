//! Vertex generation for the beam, plates and phosphor trail

use glam::{DVec2, Vec2};
use std::f32::consts::TAU;

use super::mapping::{ScreenMapping, TubeViewMapping, Viewport};
use super::vertex::{Vertex, colors};
use crate::settings::Range;
use crate::sim::{PersistenceBuffer, TrajectoryPoint, TubeGeometry};

/// Trail dot radius in pixels
pub const TRAIL_DOT_RADIUS: f32 = 2.0;
/// Current impact dot radius in pixels
pub const IMPACT_DOT_RADIUS: f32 = 4.0;
/// View border width in pixels
pub const BORDER_WIDTH: f32 = 2.0;
const DOT_SEGMENTS: u32 = 12;

/// Phosphor color for an impact simulated at `accel_voltage`.
///
/// Green is always full; red and blue rise with `Va` across `range`
/// (blue tops out at 150/255), giving green at the low end and a pale
/// yellow-green at the high end.
pub fn trail_color(accel_voltage: f64, range: &Range) -> [f32; 4] {
    let t = range.normalize(accel_voltage) as f32;
    [t, 1.0, t * 150.0 / 255.0, 1.0]
}

/// Generate vertices for a filled circle (triangle fan as a list)
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Axis-aligned filled rectangle as two triangles
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (x0 + size.x, y0 + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Black view panel with a border drawn inside its edges
pub fn view_panel(viewport: &Viewport) -> Vec<Vertex> {
    let origin = Vec2::new(viewport.x, viewport.y);
    let size = Vec2::new(viewport.width, viewport.height);
    let w = BORDER_WIDTH;

    let mut vertices = rect(origin, size, colors::VIEW_BACKGROUND);
    vertices.extend(rect(origin, Vec2::new(size.x, w), colors::VIEW_BORDER));
    vertices.extend(rect(origin + Vec2::new(0.0, size.y - w), Vec2::new(size.x, w), colors::VIEW_BORDER));
    vertices.extend(rect(origin, Vec2::new(w, size.y), colors::VIEW_BORDER));
    vertices.extend(rect(origin + Vec2::new(size.x - w, 0.0), Vec2::new(w, size.y), colors::VIEW_BORDER));
    vertices
}

/// Trail dots, oldest first, skipping points that fall outside the screen
pub fn trail_dots(trail: &PersistenceBuffer, mapping: &ScreenMapping, color_range: &Range) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(trail.len() * (DOT_SEGMENTS * 3) as usize);
    for entry in trail.entries() {
        let p = mapping.to_pixels(entry.screen);
        if mapping.viewport.contains(p) {
            let color = trail_color(entry.accel_voltage, color_range);
            vertices.extend(circle(p, TRAIL_DOT_RADIUS, color, DOT_SEGMENTS));
        }
    }
    vertices
}

/// The brighter dot for this frame's impact (empty if off-screen)
pub fn impact_dot(
    screen: DVec2,
    accel_voltage: f64,
    mapping: &ScreenMapping,
    color_range: &Range,
) -> Vec<Vertex> {
    let p = mapping.to_pixels(screen);
    if !mapping.viewport.contains(p) {
        return Vec::new();
    }
    circle(p, IMPACT_DOT_RADIUS, trail_color(accel_voltage, color_range), DOT_SEGMENTS)
}

/// Beam path as a line list (two vertices per segment)
pub fn beam_lines(trajectory: &[TrajectoryPoint], view: &TubeViewMapping) -> Vec<Vertex> {
    if trajectory.len() < 2 {
        return Vec::new();
    }

    trajectory
        .windows(2)
        .flat_map(|w| {
            let a = view.project(&w[0]);
            let b = view.project(&w[1]);
            [
                Vertex::new(a.x, a.y, colors::BEAM),
                Vertex::new(b.x, b.y, colors::BEAM),
            ]
        })
        .collect()
}

/// Both deflection plates for a side or top view
pub fn plates(view: &TubeViewMapping, geometry: &TubeGeometry) -> Vec<Vertex> {
    view.plates(geometry)
        .into_iter()
        .flat_map(|(top_left, size)| rect(top_left, size, colors::PLATE))
        .collect()
}
