//! Selection gizmo and drag manipulation.

use crate::config::EditorConfig;
use crate::geometry::local_delta;
use crate::input::Modifiers;
use crate::shapes::{ModelError, ScaledParams, ShapeId, ShapeModel};
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Gizmo box size used when a shape has nothing to measure.
const FALLBACK_SIZE: Vec2 = Vec2::new(80.0, 60.0);

/// Uniform scaling never measures the pointer closer than this.
const MIN_SCALE_DISTANCE: f64 = 10.0;

/// Per-axis scaling needs the drag to start at least this far off-axis.
const MIN_AXIS_START: f64 = 1.0;

/// Gizmo drag handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GizmoHandle {
    /// Corner handle at the bottom right of the box.
    Scale,
    /// Handle above the box.
    Rotate,
}

/// Selection overlay for one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gizmo {
    pub center: Point,
    pub angle: f64,
    /// Box width and height, already scaled.
    pub size: Vec2,
    /// Distance of the rotate handle above the box.
    pub rotate_offset: f64,
    pub show_rotate: bool,
}

impl Gizmo {
    pub fn for_shape(model: &ShapeModel, config: &EditorConfig) -> Self {
        let size = match model.scaled_params() {
            ScaledParams::Rectangle { width, height } => Vec2::new(width, height),
            ScaledParams::Circle {
                radius_x, radius_y, ..
            }
            | ScaledParams::Polygon {
                radius_x, radius_y, ..
            } => Vec2::new(radius_x * 2.0, radius_y * 2.0),
            ScaledParams::Vertices { vertices } if vertices.is_empty() => FALLBACK_SIZE,
            ScaledParams::Vertices { .. } => model.scaled_size(),
        };
        let min = config.gizmo_min_size;
        Self {
            center: model.position,
            angle: model.angle,
            size: Vec2::new(size.x.max(min), size.y.max(min)),
            rotate_offset: config.rotate_handle_offset,
            show_rotate: model.supports_rotation(),
        }
    }

    fn transform(&self) -> Affine {
        Affine::translate(self.center.to_vec2()) * Affine::rotate(self.angle)
    }

    /// Box in the gizmo's own frame.
    pub fn local_rect(&self) -> Rect {
        Rect::from_center_size(Point::ZERO, self.size.to_size())
    }

    /// Box corners in world space, clockwise from the top left.
    pub fn corners(&self) -> [Point; 4] {
        let r = self.local_rect();
        let t = self.transform();
        [
            t * Point::new(r.x0, r.y0),
            t * Point::new(r.x1, r.y0),
            t * Point::new(r.x1, r.y1),
            t * Point::new(r.x0, r.y1),
        ]
    }

    /// World position of a handle, `None` if it is hidden.
    pub fn handle_position(&self, handle: GizmoHandle) -> Option<Point> {
        let local = match handle {
            GizmoHandle::Scale => Point::new(self.size.x / 2.0, self.size.y / 2.0),
            GizmoHandle::Rotate if self.show_rotate => {
                Point::new(0.0, -self.size.y / 2.0 - self.rotate_offset)
            }
            GizmoHandle::Rotate => return None,
        };
        Some(self.transform() * local)
    }

    /// Handle under a world point.
    pub fn handle_at(&self, point: Point, hit_radius: f64) -> Option<GizmoHandle> {
        [GizmoHandle::Scale, GizmoHandle::Rotate]
            .into_iter()
            .find(|handle| {
                self.handle_position(*handle)
                    .is_some_and(|p| p.distance(point) <= hit_radius)
            })
    }
}

/// What a drag manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragMode {
    Move,
    Rotate,
    Scale,
    /// Drag one vertex of a chain.
    Vertex(usize),
}

impl From<GizmoHandle> for DragMode {
    fn from(handle: GizmoHandle) -> Self {
        match handle {
            GizmoHandle::Scale => DragMode::Scale,
            GizmoHandle::Rotate => DragMode::Rotate,
        }
    }
}

/// Snapshot taken when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub mode: DragMode,
    pub shape_id: ShapeId,
    pub start: Point,
    pub center: Point,
    pub start_angle: f64,
    pub start_scale_x: f64,
    pub start_scale_y: f64,
    pub start_distance: f64,
    /// Start pointer in the shape's rotated frame.
    pub start_local: Vec2,
}

impl DragState {
    pub fn begin(mode: DragMode, model: &ShapeModel, pointer: Point) -> Self {
        let center = model.position;
        Self {
            mode,
            shape_id: model.id(),
            start: pointer,
            center,
            start_angle: model.angle,
            start_scale_x: model.scale_x,
            start_scale_y: model.scale_y,
            start_distance: pointer.distance(center),
            start_local: local_delta(pointer, center, model.angle),
        }
    }

    /// Update `model` for the pointer at `current`.
    pub fn apply(
        &self,
        model: &mut ShapeModel,
        current: Point,
        modifiers: Modifiers,
        config: &EditorConfig,
    ) -> Result<(), ModelError> {
        match self.mode {
            DragMode::Move => {
                model.position = self.center + (current - self.start);
            }
            DragMode::Rotate => {
                if model.supports_rotation() {
                    let now = (current - self.center).atan2();
                    let then = (self.start - self.center).atan2();
                    model.angle = self.start_angle + (now - then);
                }
            }
            DragMode::Scale => {
                let min_scale = config.min_gesture_scale;
                if modifiers.shift {
                    let local = local_delta(current, self.center, model.angle);
                    model.scale_x =
                        axis_scale(self.start_local.x, local.x, self.start_scale_x, min_scale);
                    model.scale_y =
                        axis_scale(self.start_local.y, local.y, self.start_scale_y, min_scale);
                } else if self.start_distance > 0.0 {
                    let distance = current.distance(self.center).max(MIN_SCALE_DISTANCE);
                    let uniform =
                        (distance / self.start_distance * self.start_scale_x).max(min_scale);
                    model.scale_x = uniform;
                    model.scale_y = uniform;
                }
            }
            DragMode::Vertex(index) => {
                let local = model.world_to_local(current);
                model.set_vertex(index, local)?;
            }
        }
        Ok(())
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Scale along one axis by the ratio of current to start offset.
///
/// Keeps `start_scale` when the drag started too close to the axis or has
/// crossed it.
fn axis_scale(start_axis: f64, current_axis: f64, start_scale: f64, min_scale: f64) -> f64 {
    if start_axis.abs() < MIN_AXIS_START || sign(start_axis) != sign(current_axis) {
        return start_scale;
    }
    (current_axis / start_axis * start_scale).max(min_scale)
}

/// First vertex within `radius` of a local unscaled point.
pub fn find_vertex_index(model: &ShapeModel, local_point: Point, radius: f64) -> Option<usize> {
    model
        .vertices()?
        .iter()
        .position(|v| v.distance(local_point) <= radius)
}
