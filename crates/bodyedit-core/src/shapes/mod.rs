//! Shape model for the body editor.

mod chamfer;
mod circle;
mod polygon;
mod rectangle;
mod vertices;

pub use chamfer::{Chamfer, ChamferRadius};
pub use circle::CircleParams;
pub use polygon::PolygonParams;
pub use rectangle::RectangleParams;
pub use vertices::VerticesParams;

use crate::geometry::local_delta;
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shape model errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Expected {expected} corner radii, got {actual}")]
    ChamferCountMismatch { expected: usize, actual: usize },
    #[error("Vertex {index} out of range for a chain of {len}")]
    VertexOutOfRange { index: usize, len: usize },
    #[error("Shape has no corners to chamfer")]
    NotChamferable,
    #[error("Invalid shape id: {0}")]
    InvalidId(String),
}

/// Opaque shape identifier, written as `shape_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ShapeId(u64);

impl ShapeId {
    const PREFIX: &'static str = "shape_";

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for ShapeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .and_then(|n| n.parse().ok())
            .map(ShapeId)
            .ok_or_else(|| ModelError::InvalidId(s.to_string()))
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ShapeId {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Hands out shape ids in increasing order. Ids are never reused.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> ShapeId {
        let id = ShapeId(self.next);
        self.next += 1;
        id
    }
}

/// Cosmetic fill color picked from [`RenderColor::PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RenderColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RenderColor {
    pub const PALETTE: [RenderColor; 6] = [
        RenderColor::new(0x7a, 0xa6, 0xe5),
        RenderColor::new(0x7f, 0xd1, 0xb9),
        RenderColor::new(0xf2, 0xb4, 0x5a),
        RenderColor::new(0xd6, 0x8f, 0xb5),
        RenderColor::new(0x8a, 0xc0, 0xd1),
        RenderColor::new(0xc4, 0xd3, 0x5a),
    ];

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pick a palette entry.
    /// Uses a counter + hash mix so it works without a platform RNG.
    pub fn pick() -> Self {
        use std::sync::atomic::{AtomicU32, Ordering};

        static COLOR_COUNTER: AtomicU32 = AtomicU32::new(1);

        let counter = COLOR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut x = counter.wrapping_mul(0x9E3779B9);
        x ^= x >> 16;
        x = x.wrapping_mul(0x85EBCA6B);
        x ^= x >> 13;
        Self::PALETTE[x as usize % Self::PALETTE.len()]
    }

    pub fn to_color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, 255)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<RenderColor> for String {
    fn from(color: RenderColor) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for RenderColor {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let rgb = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|h| u32::from_str_radix(h, 16).ok())
            .ok_or_else(|| format!("Invalid color: {}", s))?;
        Ok(Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
    }
}

/// The fixed set of shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Polygon,
    Vertices,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Vertices => "vertices",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local-space geometry common to every parameter set.
pub trait ShapeGeometry {
    /// Number of chamferable corners.
    fn corner_count(&self) -> usize;

    /// Outline points in local, unscaled space.
    fn local_outline(&self) -> Vec<Point>;

    /// Bounding box in local, unscaled space.
    fn local_bounds(&self) -> Rect;

    /// Check if a local, unscaled point lies inside the shape.
    fn contains_local(&self, point: Point) -> bool;

    /// Path for rendering in local, unscaled space.
    fn to_path(&self) -> BezPath;

    fn chamfer(&self) -> Option<&Chamfer>;

    fn chamfer_mut(&mut self) -> Option<&mut Chamfer>;
}

/// Variant-specific geometric data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeParams {
    Rectangle(RectangleParams),
    Circle(CircleParams),
    Polygon(PolygonParams),
    Vertices(VerticesParams),
}

impl ShapeParams {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParams::Rectangle(_) => ShapeKind::Rectangle,
            ShapeParams::Circle(_) => ShapeKind::Circle,
            ShapeParams::Polygon(_) => ShapeKind::Polygon,
            ShapeParams::Vertices(_) => ShapeKind::Vertices,
        }
    }

    fn geometry(&self) -> &dyn ShapeGeometry {
        match self {
            ShapeParams::Rectangle(p) => p,
            ShapeParams::Circle(p) => p,
            ShapeParams::Polygon(p) => p,
            ShapeParams::Vertices(p) => p,
        }
    }

    fn geometry_mut(&mut self) -> &mut dyn ShapeGeometry {
        match self {
            ShapeParams::Rectangle(p) => p,
            ShapeParams::Circle(p) => p,
            ShapeParams::Polygon(p) => p,
            ShapeParams::Vertices(p) => p,
        }
    }
}

/// Params with the shape's scale applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaledParams<'a> {
    Rectangle {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Polygon {
        sides: u32,
        radius: f64,
        radius_x: f64,
        radius_y: f64,
    },
    /// Vertex chains are scaled by whole-body transforms, so the raw
    /// points are passed through.
    Vertices { vertices: &'a [Point] },
}

/// Everything needed to stamp out a copy of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeTemplate {
    pub params: ShapeParams,
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
    /// Color to reuse; a fresh one is picked when absent.
    #[serde(default)]
    pub render_color: Option<RenderColor>,
}

fn unit_scale() -> f64 {
    1.0
}

impl ShapeTemplate {
    pub fn kind(&self) -> ShapeKind {
        self.params.kind()
    }
}

/// One placed shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeModel {
    id: ShapeId,
    /// Center in scene coordinates.
    pub position: Point,
    /// Rotation in radians. Ignored for circles.
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub render_color: RenderColor,
    pub params: ShapeParams,
}

impl ShapeModel {
    /// Create a shape with a fresh id, no rotation and unit scale.
    pub fn create(ids: &mut IdGenerator, params: &ShapeParams, position: Point) -> Self {
        Self {
            id: ids.fresh(),
            position,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            render_color: RenderColor::pick(),
            params: params.clone(),
        }
    }

    /// Stamp out a copy of `template` at `position`.
    ///
    /// Per-corner chamfers are resynchronized against the copied geometry.
    pub fn from_template(ids: &mut IdGenerator, template: &ShapeTemplate, position: Point) -> Self {
        let mut model = Self {
            id: ids.fresh(),
            position,
            angle: template.angle,
            scale_x: template.scale_x,
            scale_y: template.scale_y,
            render_color: template.render_color.unwrap_or_else(RenderColor::pick),
            params: template.params.clone(),
        };
        model.sync_vertex_chamfers();
        model
    }

    /// Snapshot of this shape, keeping its color.
    pub fn template(&self) -> ShapeTemplate {
        ShapeTemplate {
            params: self.params.clone(),
            angle: self.angle,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            render_color: Some(self.render_color),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.params.kind()
    }

    pub fn supports_rotation(&self) -> bool {
        self.kind() != ShapeKind::Circle
    }

    pub fn scaled_params(&self) -> ScaledParams<'_> {
        let (sx, sy) = (self.scale_x, self.scale_y);
        match &self.params {
            ShapeParams::Rectangle(p) => ScaledParams::Rectangle {
                width: p.width * sx,
                height: p.height * sy,
            },
            ShapeParams::Circle(p) => ScaledParams::Circle {
                radius: p.radius,
                radius_x: p.radius * sx,
                radius_y: p.radius * sy,
            },
            ShapeParams::Polygon(p) => ScaledParams::Polygon {
                sides: p.sides,
                radius: p.radius,
                radius_x: p.radius * sx,
                radius_y: p.radius * sy,
            },
            ShapeParams::Vertices(p) => ScaledParams::Vertices {
                vertices: &p.vertices,
            },
        }
    }

    pub fn corner_count(&self) -> usize {
        self.params.geometry().corner_count()
    }

    pub fn chamfer(&self) -> Option<&Chamfer> {
        self.params.geometry().chamfer()
    }

    /// Re-derive per-corner chamfers if the corner count changed.
    pub fn sync_vertex_chamfers(&mut self) {
        let count = self.corner_count();
        if let Some(chamfer) = self.params.geometry_mut().chamfer_mut() {
            chamfer.repair(count);
        }
    }

    /// Per-corner chamfers, resynchronized first.
    pub fn ensure_vertex_chamfers(&mut self) -> &[f64] {
        let count = self.corner_count();
        match self.params.geometry_mut().chamfer_mut() {
            Some(chamfer) => {
                chamfer.sync(count);
                &chamfer.vertex_radii
            }
            None => &[],
        }
    }

    /// Set a uniform chamfer on every corner.
    pub fn apply_uniform_chamfer(&mut self, radius: f64) -> Result<(), ModelError> {
        let count = self.corner_count();
        let chamfer = self
            .params
            .geometry_mut()
            .chamfer_mut()
            .ok_or(ModelError::NotChamferable)?;
        chamfer.apply_uniform(radius, count);
        Ok(())
    }

    /// Set one chamfer radius per corner.
    pub fn apply_vertex_chamfers(&mut self, radii: Vec<f64>) -> Result<(), ModelError> {
        let count = self.corner_count();
        let chamfer = self
            .params
            .geometry_mut()
            .chamfer_mut()
            .ok_or(ModelError::NotChamferable)?;
        chamfer.apply_per_vertex(radii, count)
    }

    /// Chamfer a consumer should apply, if any.
    pub fn effective_chamfer(&self) -> Option<ChamferRadius> {
        self.chamfer()
            .and_then(|chamfer| chamfer.effective(self.corner_count()))
    }

    /// Change a polygon's side count. No-op for other kinds.
    pub fn set_polygon_sides(&mut self, value: f64) {
        if let ShapeParams::Polygon(p) = &mut self.params {
            p.sides = PolygonParams::clamp_sides(value);
            p.chamfer.repair(p.sides as usize);
        }
    }

    /// Append a vertex to a chain. Returns false for other kinds.
    pub fn push_vertex(&mut self, point: Point) -> bool {
        match &mut self.params {
            ShapeParams::Vertices(v) => {
                v.push(point);
                true
            }
            _ => false,
        }
    }

    /// Move one vertex of a chain. No-op for other kinds.
    pub fn set_vertex(&mut self, index: usize, point: Point) -> Result<(), ModelError> {
        match &mut self.params {
            ShapeParams::Vertices(v) => v.set(index, point),
            _ => Ok(()),
        }
    }

    /// Remove one vertex of a chain.
    pub fn remove_vertex(&mut self, index: usize) -> Result<Option<Point>, ModelError> {
        match &mut self.params {
            ShapeParams::Vertices(v) => v.remove(index).map(Some),
            _ => Ok(None),
        }
    }

    /// Vertex chain points, if this is a chain.
    pub fn vertices(&self) -> Option<&[Point]> {
        match &self.params {
            ShapeParams::Vertices(v) => Some(&v.vertices),
            _ => None,
        }
    }

    /// Local-to-world transform including per-axis scale.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2())
            * Affine::rotate(self.angle)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Convert a world point into this shape's local, unscaled frame.
    pub fn world_to_local(&self, point: Point) -> Point {
        let d = local_delta(point, self.position, self.angle);
        Point::new(d.x / self.scale_x, d.y / self.scale_y)
    }

    pub fn local_outline(&self) -> Vec<Point> {
        self.params.geometry().local_outline()
    }

    pub fn local_bounds(&self) -> Rect {
        self.params.geometry().local_bounds()
    }

    /// Bounding box size after scaling, before rotation.
    pub fn scaled_size(&self) -> Vec2 {
        let b = self.local_bounds();
        Vec2::new(b.width() * self.scale_x, b.height() * self.scale_y)
    }

    /// Check if a world point hits this shape.
    pub fn contains(&self, point: Point) -> bool {
        self.params.geometry().contains_local(self.world_to_local(point))
    }

    /// Path in world space.
    pub fn to_path(&self) -> BezPath {
        self.transform() * self.params.geometry().to_path()
    }
}

fn closed_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_model(ids: &mut IdGenerator) -> ShapeModel {
        ShapeModel::create(
            ids,
            &ShapeParams::Rectangle(RectangleParams::new(120.0, 80.0)),
            Point::new(100.0, 100.0),
        )
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = IdGenerator::new();
        let a = rect_model(&mut ids);
        let b = rect_model(&mut ids);
        assert_eq!(a.id().to_string(), "shape_1");
        assert_eq!(b.id().to_string(), "shape_2");
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_shape_id_parse() {
        assert_eq!("shape_12".parse::<ShapeId>().unwrap().get(), 12);
        assert!("rect_1".parse::<ShapeId>().is_err());
        let json = serde_json::to_string(&ShapeId(3)).unwrap();
        assert_eq!(json, "\"shape_3\"");
    }

    #[test]
    fn test_create_defaults() {
        let mut ids = IdGenerator::new();
        let model = rect_model(&mut ids);
        assert_eq!(model.kind(), ShapeKind::Rectangle);
        assert_eq!(model.angle, 0.0);
        assert_eq!(model.scale_x, 1.0);
        assert_eq!(model.scale_y, 1.0);
        assert!(RenderColor::PALETTE.contains(&model.render_color));
    }

    #[test]
    fn test_create_does_not_alias_params() {
        let mut ids = IdGenerator::new();
        let defaults = ShapeParams::Vertices(VerticesParams::new(vec![Point::ZERO]));
        let mut model = ShapeModel::create(&mut ids, &defaults, Point::ZERO);
        if let ShapeParams::Vertices(v) = &mut model.params {
            v.push(Point::new(5.0, 5.0));
        }
        assert_eq!(defaults, ShapeParams::Vertices(VerticesParams::new(vec![Point::ZERO])));
    }

    #[test]
    fn test_scaled_params_rectangle() {
        let mut ids = IdGenerator::new();
        let mut model = rect_model(&mut ids);
        model.scale_x = 2.0;
        model.scale_y = 0.5;
        match model.scaled_params() {
            ScaledParams::Rectangle { width, height } => {
                assert!((width - 240.0).abs() < f64::EPSILON);
                assert!((height - 40.0).abs() < f64::EPSILON);
            }
            other => panic!("Expected rectangle params, got {:?}", other),
        }
    }

    #[test]
    fn test_scaled_params_circle_and_vertices() {
        let mut ids = IdGenerator::new();
        let mut circle = ShapeModel::create(&mut ids, &ShapeParams::Circle(CircleParams::new(10.0)), Point::ZERO);
        circle.scale_x = 3.0;
        assert_eq!(
            circle.scaled_params(),
            ScaledParams::Circle { radius: 10.0, radius_x: 30.0, radius_y: 10.0 }
        );

        let points = vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)];
        let mut chain = ShapeModel::create(
            &mut ids,
            &ShapeParams::Vertices(VerticesParams::new(points.clone())),
            Point::ZERO,
        );
        chain.scale_x = 2.0;
        assert_eq!(chain.scaled_params(), ScaledParams::Vertices { vertices: &points });
    }

    #[test]
    fn test_from_template_copies_everything_but_id_and_position() {
        let mut ids = IdGenerator::new();
        let mut model = rect_model(&mut ids);
        model.angle = 0.4;
        model.scale_x = 1.5;
        let copy = ShapeModel::from_template(&mut ids, &model.template(), Point::new(5.0, 6.0));
        assert_ne!(copy.id(), model.id());
        assert_eq!(copy.position, Point::new(5.0, 6.0));
        assert_eq!(copy.angle, 0.4);
        assert_eq!(copy.scale_x, 1.5);
        assert_eq!(copy.render_color, model.render_color);
        assert_eq!(copy.params, model.params);
    }

    #[test]
    fn test_from_template_resyncs_stale_chamfers() {
        let mut ids = IdGenerator::new();
        let mut chain = VerticesParams::new(vec![Point::ZERO, Point::new(10.0, 0.0), Point::new(0.0, 10.0)]);
        chain.chamfer = Chamfer {
            radius: 2.0,
            vertex_radii: vec![1.0],
            use_per_vertex: true,
        };
        let template = ShapeTemplate {
            params: ShapeParams::Vertices(chain),
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            render_color: None,
        };
        let model = ShapeModel::from_template(&mut ids, &template, Point::ZERO);
        assert_eq!(model.chamfer().unwrap().vertex_radii, vec![2.0; 3]);
    }

    #[test]
    fn test_polygon_sides_change_resyncs_chamfers() {
        let mut ids = IdGenerator::new();
        let mut model = ShapeModel::create(&mut ids, &ShapeParams::Polygon(PolygonParams::default()), Point::ZERO);
        model.apply_vertex_chamfers(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        model.set_polygon_sides(6.0);
        assert_eq!(model.corner_count(), 6);
        assert_eq!(model.ensure_vertex_chamfers().len(), 6);
        assert!(matches!(model.effective_chamfer(), Some(ChamferRadius::PerVertex(r)) if r.len() == 6));
    }

    #[test]
    fn test_circle_is_not_chamferable() {
        let mut ids = IdGenerator::new();
        let mut circle = ShapeModel::create(&mut ids, &ShapeParams::Circle(CircleParams::default()), Point::ZERO);
        assert_eq!(circle.apply_uniform_chamfer(3.0), Err(ModelError::NotChamferable));
        assert!(circle.ensure_vertex_chamfers().is_empty());
        assert!(!circle.supports_rotation());
    }

    #[test]
    fn test_contains_respects_transform() {
        let mut ids = IdGenerator::new();
        let mut model = rect_model(&mut ids);
        assert!(model.contains(Point::new(155.0, 100.0)));
        model.angle = std::f64::consts::FRAC_PI_2;
        // rotated a quarter turn the long side is vertical
        assert!(!model.contains(Point::new(155.0, 100.0)));
        assert!(model.contains(Point::new(100.0, 155.0)));
        model.scale_y = 2.0;
        assert!(model.contains(Point::new(170.0, 100.0)));
    }

    #[test]
    fn test_render_color_hex_roundtrip() {
        let color = RenderColor::PALETTE[2];
        assert_eq!(color.to_hex(), "#f2b45a");
        let json = serde_json::to_string(&color).unwrap();
        let back: RenderColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
        assert!(RenderColor::try_from("f2b45a".to_string()).is_err());
        assert!(RenderColor::try_from("#f2b45g".to_string()).is_err());
        assert!(RenderColor::try_from("#+2b45a".to_string()).is_err());
    }

    #[test]
    fn test_render_color_rejects_non_ascii() {
        // six bytes, but the second character spans two of them
        assert!(RenderColor::try_from("#a\u{e9}123".to_string()).is_err());
        let json = r##"{ "params": { "type": "circle", "radius": 5 }, "render_color": "#a\u00e9123" }"##;
        assert!(serde_json::from_str::<ShapeTemplate>(json).is_err());
    }

    #[test]
    fn test_render_color_to_color() {
        let color = RenderColor::new(0x7a, 0xa6, 0xe5);
        assert_eq!(color.to_color(), Color::from_rgba8(0x7a, 0xa6, 0xe5, 255));
        assert_eq!(RenderColor::try_from("#7aa6e5".to_string()).unwrap(), color);
    }

    #[test]
    fn test_polygon_sides_change_leaves_untouched_chamfer_empty() {
        let mut ids = IdGenerator::new();
        let mut model = ShapeModel::create(&mut ids, &ShapeParams::Polygon(PolygonParams::default()), Point::ZERO);
        model.set_polygon_sides(6.0);
        assert!(model.chamfer().unwrap().vertex_radii.is_empty());
        assert_eq!(model.effective_chamfer(), None);
    }
}
