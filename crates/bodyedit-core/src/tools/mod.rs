//! Placement tools and their default parameters.

use crate::shapes::{
    CircleParams, PolygonParams, RectangleParams, ShapeKind, ShapeParams, VerticesParams,
};
use serde::{Deserialize, Serialize};

/// What a click on the empty stage does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Rectangle,
    Circle,
    Polygon,
    /// Add a point to a vertex chain.
    Vertices,
    /// Stamp the clipboard template.
    Paste,
}

impl ToolKind {
    /// Shape kind this tool creates, if any.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Polygon => Some(ShapeKind::Polygon),
            ToolKind::Vertices => Some(ShapeKind::Vertices),
            ToolKind::Paste => None,
        }
    }
}

impl From<ShapeKind> for ToolKind {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rectangle => ToolKind::Rectangle,
            ShapeKind::Circle => ToolKind::Circle,
            ShapeKind::Polygon => ToolKind::Polygon,
            ShapeKind::Vertices => ToolKind::Vertices,
        }
    }
}

/// Parameters given to newly placed shapes, one set per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToolParams {
    pub rectangle: RectangleParams,
    pub circle: CircleParams,
    pub polygon: PolygonParams,
    /// Only the chamfer is used; new chains start from a single point.
    pub vertices: VerticesParams,
}

impl ToolParams {
    pub fn for_kind(&self, kind: ShapeKind) -> ShapeParams {
        match kind {
            ShapeKind::Rectangle => ShapeParams::Rectangle(self.rectangle.clone()),
            ShapeKind::Circle => ShapeParams::Circle(self.circle.clone()),
            ShapeKind::Polygon => ShapeParams::Polygon(self.polygon.clone()),
            ShapeKind::Vertices => ShapeParams::Vertices(self.vertices.clone()),
        }
    }

    /// Replace the defaults for the kind `params` belongs to.
    pub fn set(&mut self, params: ShapeParams) {
        match params {
            ShapeParams::Rectangle(p) => self.rectangle = p,
            ShapeParams::Circle(p) => self.circle = p,
            ShapeParams::Polygon(mut p) => {
                p.sides = PolygonParams::clamp_sides(p.sides as f64);
                self.polygon = p;
            }
            ShapeParams::Vertices(p) => self.vertices = p,
        }
    }
}

/// Vertex tool mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VerticesMode {
    /// The next vertex click starts a new chain instead of extending the
    /// selected one.
    pub create_new: bool,
}
