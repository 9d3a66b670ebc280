//! Freeform vertex chain parameters.

use super::{Chamfer, ModelError, ShapeGeometry};
use crate::geometry::{bounds_of, polygon_contains};
use kurbo::{BezPath, Circle, Line, ParamCurveNearest, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Radius of the dot drawn for a chain with a single vertex.
const SINGLE_VERTEX_DOT: f64 = 4.0;

/// A closed polygon given by local-space vertices in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerticesParams {
    #[serde(default)]
    pub vertices: Vec<Point>,
    #[serde(default)]
    pub chamfer: Chamfer,
}

impl VerticesParams {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            chamfer: Chamfer::default(),
        }
    }

    pub fn with_chamfer(mut self, radius: f64) -> Self {
        self.chamfer = Chamfer::uniform(radius);
        self
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex, giving its corner the scalar chamfer.
    pub fn push(&mut self, point: Point) {
        self.chamfer.push_corner(self.vertices.len());
        self.vertices.push(point);
    }

    /// Move an existing vertex.
    pub fn set(&mut self, index: usize, point: Point) -> Result<(), ModelError> {
        let len = self.vertices.len();
        let vertex = self
            .vertices
            .get_mut(index)
            .ok_or(ModelError::VertexOutOfRange { index, len })?;
        *vertex = point;
        Ok(())
    }

    /// Remove a vertex along with its corner radius.
    pub fn remove(&mut self, index: usize) -> Result<Point, ModelError> {
        let len = self.vertices.len();
        if index >= len {
            return Err(ModelError::VertexOutOfRange { index, len });
        }
        self.chamfer.remove_corner(index, len);
        Ok(self.vertices.remove(index))
    }
}

impl ShapeGeometry for VerticesParams {
    fn corner_count(&self) -> usize {
        self.vertices.len()
    }

    fn local_outline(&self) -> Vec<Point> {
        self.vertices.clone()
    }

    fn local_bounds(&self) -> Rect {
        bounds_of(&self.vertices).unwrap_or(Rect::ZERO)
    }

    /// Chains too short to enclose an area are hit within the dot radius.
    fn contains_local(&self, point: Point) -> bool {
        match self.vertices.as_slice() {
            [] => false,
            [only] => only.distance(point) <= SINGLE_VERTEX_DOT,
            [a, b] => {
                let nearest = Line::new(*a, *b).nearest(point, 1e-6);
                nearest.distance_sq <= SINGLE_VERTEX_DOT * SINGLE_VERTEX_DOT
            }
            points => polygon_contains(points, point),
        }
    }

    fn to_path(&self) -> BezPath {
        match self.vertices.as_slice() {
            [] => BezPath::new(),
            [only] => Circle::new(*only, SINGLE_VERTEX_DOT).to_path(0.1),
            points => super::closed_path(points),
        }
    }

    fn chamfer(&self) -> Option<&Chamfer> {
        Some(&self.chamfer)
    }

    fn chamfer_mut(&mut self) -> Option<&mut Chamfer> {
        Some(&mut self.chamfer)
    }
}
