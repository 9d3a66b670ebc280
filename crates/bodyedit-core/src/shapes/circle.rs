//! Circle parameters.

use super::{Chamfer, ShapeGeometry};
use crate::geometry::regular_polygon_points;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Segments used when a circle has to be approximated by a polygon.
const OUTLINE_SEGMENTS: u32 = 32;

/// A circle centered on its shape position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleParams {
    /// Unscaled radius.
    pub radius: f64,
}

impl CircleParams {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for CircleParams {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl ShapeGeometry for CircleParams {
    fn corner_count(&self) -> usize {
        0
    }

    fn local_outline(&self) -> Vec<Point> {
        regular_polygon_points(OUTLINE_SEGMENTS, self.radius)
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(-self.radius, -self.radius, self.radius, self.radius)
    }

    fn contains_local(&self, point: Point) -> bool {
        point.to_vec2().hypot() <= self.radius
    }

    fn to_path(&self) -> BezPath {
        Circle::new(Point::ZERO, self.radius).to_path(0.1)
    }

    fn chamfer(&self) -> Option<&Chamfer> {
        None
    }

    fn chamfer_mut(&mut self) -> Option<&mut Chamfer> {
        None
    }
}
