//! Physical-to-pixel mapping for the three tube views
//!
//! - front view: normalized screen space (±1 = nominal full scale) to pixels
//! - side view: axial vs vertical displacement
//! - top view: axial vs horizontal displacement
//!
//! Side and top views use a fixed transverse scale derived from the frame's
//! `max_deflect`, so the picture does not zoom with the beam.

use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::sim::{TrajectoryPoint, TubeGeometry};

/// Share of the half-extent used by full-scale deflection
pub const VIEW_FILL: f32 = 0.9;

/// Plate outline thickness in pixels
pub const PLATE_THICKNESS_PX: f32 = 5.0;

/// Pixel rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Front view of the phosphor screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    pub viewport: Viewport,
}

impl ScreenMapping {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    /// Pixels per unit of normalized screen space (same on both axes)
    #[inline]
    pub fn scale(&self) -> f32 {
        self.viewport.width / 2.0 * VIEW_FILL
    }

    /// Normalized screen position to pixels (+y up becomes -y)
    pub fn to_pixels(&self, screen: DVec2) -> Vec2 {
        let c = self.viewport.center();
        let s = self.scale();
        Vec2::new(c.x + screen.x as f32 * s, c.y - screen.y as f32 * s)
    }
}

/// Which transverse axis a longitudinal view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewAxis {
    /// Side view, vertical deflection
    Side,
    /// Top view, horizontal deflection
    Top,
}

impl ViewAxis {
    #[inline]
    pub fn displacement(&self, p: &TrajectoryPoint) -> f64 {
        match self {
            ViewAxis::Side => p.vertical,
            ViewAxis::Top => p.horizontal,
        }
    }
}

/// Longitudinal (side or top) view of the tube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeViewMapping {
    pub viewport: Viewport,
    pub axis: ViewAxis,
    /// Pixels per meter along the tube
    x_scale: f32,
    /// Pixels per meter of transverse displacement
    y_scale: f32,
}

impl TubeViewMapping {
    pub fn new(viewport: Viewport, axis: ViewAxis, geometry: &TubeGeometry, max_deflect: f64) -> Self {
        Self {
            viewport,
            axis,
            x_scale: viewport.width / geometry.total_length() as f32,
            y_scale: viewport.height / 2.0 * VIEW_FILL / max_deflect as f32,
        }
    }

    pub fn project(&self, p: &TrajectoryPoint) -> Vec2 {
        let displacement = self.axis.displacement(p) as f32;
        Vec2::new(
            self.viewport.x + p.axial as f32 * self.x_scale,
            self.viewport.center().y - displacement * self.y_scale,
        )
    }

    /// Upper and lower plate outlines as (top-left, size) pairs
    pub fn plates(&self, geometry: &TubeGeometry) -> [(Vec2, Vec2); 2] {
        let x = self.viewport.x + geometry.gun_to_plates() as f32 * self.x_scale;
        let width = geometry.plate_length() as f32 * self.x_scale;
        let half_gap = geometry.plate_separation() as f32 * self.y_scale / 2.0;
        let cy = self.viewport.center().y;
        let size = Vec2::new(width, PLATE_THICKNESS_PX);
        [
            (Vec2::new(x, cy - half_gap - PLATE_THICKNESS_PX), size),
            (Vec2::new(x, cy + half_gap), size),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_center_and_full_scale() {
        let m = ScreenMapping::new(Viewport::new(50.0, 100.0, 200.0, 300.0));
        assert_eq!(m.to_pixels(DVec2::ZERO), Vec2::new(150.0, 250.0));
        // Full scale right/up
        let p = m.to_pixels(DVec2::new(1.0, 1.0));
        assert!((p.x - 240.0).abs() < 1e-4);
        assert!((p.y - 160.0).abs() < 1e-4);
        assert!(m.viewport.contains(p));
    }

    #[test]
    fn test_tube_view_projection() {
        let g = TubeGeometry::default();
        let vp = Viewport::new(0.0, 0.0, 700.0, 200.0);
        let side = TubeViewMapping::new(vp, ViewAxis::Side, &g, 0.02);
        let p = TrajectoryPoint {
            axial: g.total_length(),
            vertical: 0.02,
            horizontal: -0.02,
        };
        let px = side.project(&p);
        assert!((px.x - 700.0).abs() < 1e-3);
        assert!((px.y - 10.0).abs() < 1e-3);

        let top = TubeViewMapping::new(vp, ViewAxis::Top, &g, 0.02);
        assert!((top.project(&p).y - 190.0).abs() < 1e-3);
    }

    #[test]
    fn test_plates_straddle_axis() {
        let g = TubeGeometry::default();
        let vp = Viewport::new(0.0, 0.0, 350.0, 200.0);
        let view = TubeViewMapping::new(vp, ViewAxis::Side, &g, 0.01);
        let [upper, lower] = view.plates(&g);
        assert!((upper.0.x - 50.0).abs() < 1e-3);
        assert!((upper.1.x - 50.0).abs() < 1e-3);
        assert!(upper.0.y + PLATE_THICKNESS_PX < 100.0);
        assert!(lower.0.y > 100.0);
    }
}
