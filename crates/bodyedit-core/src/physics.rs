//! Physics preview planning.
//!
//! The editor does not simulate anything itself. It turns the shape list
//! into a [`CompoundPlan`] and hands it to a [`PhysicsBackend`], which wraps
//! the actual engine.

use crate::editor::EditorEvent;
use crate::shapes::{ChamferRadius, RenderColor, ShapeModel, ShapeParams};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Radius of the stand-in circle for chains too short to form a polygon.
pub const FALLBACK_RADIUS: f64 = 6.0;

/// Gravity applied while a dynamic test runs.
pub const DYNAMIC_GRAVITY: f64 = 1.0;

/// Primitive body for one part of the compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartShape {
    Rectangle {
        width: f64,
        height: f64,
        chamfer: Option<ChamferRadius>,
    },
    Circle {
        radius: f64,
    },
    Polygon {
        sides: u32,
        radius: f64,
        chamfer: Option<ChamferRadius>,
    },
    FromVertices {
        vertices: Vec<Point>,
        chamfer: Option<ChamferRadius>,
    },
}

/// One part, built unscaled and then scaled by `scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSpec {
    pub position: Point,
    pub angle: f64,
    pub scale: Vec2,
    pub color: RenderColor,
    pub shape: PartShape,
}

impl PartSpec {
    pub fn from_shape(model: &ShapeModel) -> Self {
        let chamfer = model.effective_chamfer();
        let mut angle = model.angle;
        let shape = match &model.params {
            ShapeParams::Rectangle(p) => PartShape::Rectangle {
                width: p.width,
                height: p.height,
                chamfer,
            },
            ShapeParams::Circle(p) => PartShape::Circle { radius: p.radius },
            ShapeParams::Polygon(p) => PartShape::Polygon {
                sides: p.sides,
                radius: p.radius,
                chamfer,
            },
            ShapeParams::Vertices(p) if p.vertices.len() < 3 => {
                angle = 0.0;
                PartShape::Circle {
                    radius: FALLBACK_RADIUS,
                }
            }
            ShapeParams::Vertices(p) => PartShape::FromVertices {
                vertices: p.vertices.clone(),
                chamfer,
            },
        };
        Self {
            position: model.position,
            angle,
            scale: Vec2::new(model.scale_x, model.scale_y),
            color: model.render_color,
            shape,
        }
    }
}

/// A compound body ready to hand to a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundPlan {
    pub parts: Vec<PartSpec>,
    /// Applied to the assembled compound to center it in the viewport.
    pub translation: Vec2,
}

/// Plan a compound from `shapes`, centered on `bounds`.
///
/// The center is the plain average of shape positions. Returns `None`
/// for an empty scene.
pub fn plan_compound(shapes: &[ShapeModel], bounds: Size) -> Option<CompoundPlan> {
    if shapes.is_empty() {
        return None;
    }
    let sum = shapes
        .iter()
        .fold(Vec2::ZERO, |acc, s| acc + s.position.to_vec2());
    let average = sum / shapes.len() as f64;
    let center = Vec2::new(bounds.width / 2.0, bounds.height / 2.0);
    Some(CompoundPlan {
        parts: shapes.iter().map(PartSpec::from_shape).collect(),
        translation: center - average,
    })
}

/// Which side of the viewport a wall closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallSide {
    Ground,
    Ceiling,
    Left,
    Right,
}

/// Static rectangle along one side of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub side: WallSide,
    pub rect: Rect,
}

/// The four static walls enclosing `bounds`, inset by `thickness`.
pub fn boundary_walls(bounds: Size, thickness: f64) -> [Wall; 4] {
    let (w, h, t) = (bounds.width, bounds.height, thickness);
    let wall = |side, cx: f64, cy: f64, sw: f64, sh: f64| Wall {
        side,
        rect: Rect::from_center_size(Point::new(cx, cy), Size::new(sw, sh)),
    };
    [
        wall(WallSide::Ground, w / 2.0, h - t / 2.0, w, t),
        wall(WallSide::Ceiling, w / 2.0, t / 2.0, w, t),
        wall(WallSide::Left, t / 2.0, h / 2.0, t, h),
        wall(WallSide::Right, w - t / 2.0, h / 2.0, t, h),
    ]
}

/// Static or dynamic test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Zero gravity, replaces earlier test bodies.
    Static,
    /// Gravity on, adds to earlier test bodies.
    Dynamic,
}

/// Request to build a test body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub mode: PreviewMode,
    /// `None` when there is nothing to build.
    pub plan: Option<CompoundPlan>,
}

/// A physics engine the preview can drive.
pub trait PhysicsBackend {
    /// Engine-side handle to a body.
    type Body;

    fn set_gravity(&mut self, y: f64);

    /// Build the parts, assemble them into one body and translate it.
    fn add_compound(&mut self, plan: &CompoundPlan) -> Self::Body;

    fn add_wall(&mut self, wall: &Wall) -> Self::Body;

    fn remove(&mut self, body: Self::Body);

    fn resize(&mut self, size: Size);
}

/// Test bodies and boundary walls living in a backend.
pub struct PhysicsPreview<B: PhysicsBackend> {
    backend: B,
    bounds: Size,
    wall_thickness: f64,
    test_bodies: Vec<B::Body>,
    walls: Vec<B::Body>,
}

impl<B: PhysicsBackend> PhysicsPreview<B> {
    pub fn new(backend: B, bounds: Size, wall_thickness: f64) -> Self {
        Self {
            backend,
            bounds,
            wall_thickness,
            test_bodies: Vec::new(),
            walls: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn test_body_count(&self) -> usize {
        self.test_bodies.len()
    }

    pub fn bounds_active(&self) -> bool {
        !self.walls.is_empty()
    }

    /// Replace all test bodies with one body under zero gravity.
    pub fn render_static(&mut self, plan: Option<&CompoundPlan>) {
        self.clear_test_bodies();
        self.backend.set_gravity(0.0);
        if let Some(plan) = plan {
            let body = self.backend.add_compound(plan);
            self.test_bodies.push(body);
        }
    }

    /// Add one more body and turn gravity on.
    pub fn render_dynamic(&mut self, plan: Option<&CompoundPlan>) {
        self.backend.set_gravity(DYNAMIC_GRAVITY);
        if let Some(plan) = plan {
            let body = self.backend.add_compound(plan);
            self.test_bodies.push(body);
        }
    }

    pub fn render(&mut self, request: &PreviewRequest) {
        match request.mode {
            PreviewMode::Static => self.render_static(request.plan.as_ref()),
            PreviewMode::Dynamic => self.render_dynamic(request.plan.as_ref()),
        }
    }

    pub fn clear_test_bodies(&mut self) {
        for body in self.test_bodies.drain(..) {
            self.backend.remove(body);
        }
    }

    /// Add or remove the boundary walls. Active walls are rebuilt.
    pub fn set_bounds_active(&mut self, active: bool) {
        for body in self.walls.drain(..) {
            self.backend.remove(body);
        }
        if active {
            for wall in boundary_walls(self.bounds, self.wall_thickness) {
                let body = self.backend.add_wall(&wall);
                self.walls.push(body);
            }
        }
    }

    pub fn resize(&mut self, size: Size) {
        self.bounds = size;
        self.backend.resize(size);
        if self.bounds_active() {
            self.set_bounds_active(true);
        }
    }

    /// Follow one editor event. Events unrelated to physics are ignored.
    pub fn handle_event(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::PreviewRequested(request) => self.render(request),
            EditorEvent::PreviewCleared => self.clear_test_bodies(),
            EditorEvent::BoundsActive(active) => self.set_bounds_active(*active),
            EditorEvent::CanvasResized(canvas) => {
                self.resize(Size::new(canvas.width as f64, canvas.height as f64))
            }
            _ => {}
        }
    }
}
