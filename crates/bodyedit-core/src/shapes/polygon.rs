//! Regular polygon parameters.

use super::{Chamfer, ShapeGeometry};
use crate::geometry::{polygon_contains, regular_polygon_points};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A regular polygon inscribed in a circle of `radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonParams {
    /// Number of sides, 3 through 12.
    pub sides: u32,
    /// Unscaled circumradius.
    pub radius: f64,
    /// Corner rounding.
    #[serde(default)]
    pub chamfer: Chamfer,
}

impl PolygonParams {
    pub const MIN_SIDES: u32 = 3;
    pub const MAX_SIDES: u32 = 12;

    pub fn new(sides: u32, radius: f64) -> Self {
        Self {
            sides,
            radius,
            chamfer: Chamfer::default(),
        }
    }

    pub fn with_chamfer(mut self, radius: f64) -> Self {
        self.chamfer = Chamfer::uniform(radius);
        self
    }

    /// Clamp a panel value to a valid side count.
    pub fn clamp_sides(value: f64) -> u32 {
        if value.is_nan() {
            return Self::MIN_SIDES;
        }
        value
            .round()
            .clamp(Self::MIN_SIDES as f64, Self::MAX_SIDES as f64) as u32
    }
}

impl Default for PolygonParams {
    fn default() -> Self {
        Self::new(5, 60.0)
    }
}

impl ShapeGeometry for PolygonParams {
    fn corner_count(&self) -> usize {
        self.sides as usize
    }

    fn local_outline(&self) -> Vec<Point> {
        regular_polygon_points(self.sides, self.radius)
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(-self.radius, -self.radius, self.radius, self.radius)
    }

    fn contains_local(&self, point: Point) -> bool {
        polygon_contains(&self.local_outline(), point)
    }

    fn to_path(&self) -> BezPath {
        super::closed_path(&self.local_outline())
    }

    fn chamfer(&self) -> Option<&Chamfer> {
        Some(&self.chamfer)
    }

    fn chamfer_mut(&mut self) -> Option<&mut Chamfer> {
        Some(&mut self.chamfer)
    }
}
