//! Rectangle parameters.

use super::{Chamfer, ShapeGeometry};
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A rectangle centered on its shape position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleParams {
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    /// Corner rounding.
    #[serde(default)]
    pub chamfer: Chamfer,
}

impl RectangleParams {
    pub const CORNERS: usize = 4;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            chamfer: Chamfer::default(),
        }
    }

    pub fn with_chamfer(mut self, radius: f64) -> Self {
        self.chamfer = Chamfer::uniform(radius);
        self
    }

    /// Local rect centered on the origin.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width / 2.0,
            self.height / 2.0,
        )
    }
}

impl Default for RectangleParams {
    fn default() -> Self {
        Self::new(120.0, 80.0)
    }
}

impl ShapeGeometry for RectangleParams {
    fn corner_count(&self) -> usize {
        Self::CORNERS
    }

    fn local_outline(&self) -> Vec<Point> {
        let r = self.as_rect();
        vec![
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ]
    }

    fn local_bounds(&self) -> Rect {
        self.as_rect()
    }

    fn contains_local(&self, point: Point) -> bool {
        self.as_rect().contains(point)
    }

    fn to_path(&self) -> BezPath {
        let radius = self.chamfer.radius.max(0.0);
        if radius > 0.0 {
            RoundedRect::from_rect(self.as_rect(), radius).to_path(0.1)
        } else {
            self.as_rect().to_path(0.1)
        }
    }

    fn chamfer(&self) -> Option<&Chamfer> {
        Some(&self.chamfer)
    }

    fn chamfer_mut(&mut self) -> Option<&mut Chamfer> {
        Some(&mut self.chamfer)
    }
}
