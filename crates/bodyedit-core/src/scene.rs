//! Editor scene: the shape list and everything a session mutates.

use crate::config::EditorConfig;
use crate::export::{BodyData, ExportError};
use crate::shapes::{
    Chamfer, IdGenerator, ShapeId, ShapeKind, ShapeModel, ShapeParams, ShapeTemplate,
    VerticesParams,
};
use crate::tools::{ToolKind, ToolParams, VerticesMode};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scene errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Canvas cannot be resized while {0} shapes exist")]
    CanvasLocked(usize),
    #[error("Canvas size must be at least {0}")]
    CanvasTooSmall(u32),
    #[error("Import failed: {0}")]
    Import(#[from] ExportError),
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// Cosmetic reference image behind the shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub url: Option<String>,
    pub opacity: f64,
}

/// All mutable editor state.
#[derive(Debug, Clone)]
pub struct Scene {
    shapes: Vec<ShapeModel>,
    selected: Option<ShapeId>,
    pub current_tool: ToolKind,
    pub tool_params: ToolParams,
    clipboard: Option<ShapeTemplate>,
    pub vertices_mode: VerticesMode,
    canvas: CanvasSize,
    canvas_limits: (u32, u32),
    pub background: Background,
    ids: IdGenerator,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Scene {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            shapes: Vec::new(),
            selected: None,
            current_tool: ToolKind::default(),
            tool_params: ToolParams::default(),
            clipboard: None,
            vertices_mode: VerticesMode::default(),
            canvas: CanvasSize::new(config.canvas_width, config.canvas_height),
            canvas_limits: (config.canvas_min, config.canvas_max),
            background: Background {
                url: None,
                opacity: config.background_opacity,
            },
            ids: IdGenerator::new(),
        }
    }

    /// Shapes in placement order.
    pub fn shapes(&self) -> &[ShapeModel] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&ShapeModel> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut ShapeModel> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    pub fn selected_shape(&self) -> Option<&ShapeModel> {
        self.selected.and_then(|id| self.shape(id))
    }

    pub fn selected_shape_mut(&mut self) -> Option<&mut ShapeModel> {
        let id = self.selected?;
        self.shape_mut(id)
    }

    /// Select a shape, or clear the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ShapeId>) -> Option<ShapeId> {
        self.selected = id.filter(|id| self.shape(*id).is_some());
        self.selected
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn clipboard(&self) -> Option<&ShapeTemplate> {
        self.clipboard.as_ref()
    }

    fn push(&mut self, model: ShapeModel) -> ShapeId {
        let id = model.id();
        log::debug!("Added {} {}", model.kind(), id);
        self.shapes.push(model);
        self.selected = Some(id);
        id
    }

    /// Place a shape using `current_tool`: create, add a vertex, or paste.
    pub fn place_at(&mut self, position: Point) -> Option<ShapeId> {
        match self.current_tool {
            ToolKind::Paste => self.paste_at(position),
            ToolKind::Vertices => Some(self.add_vertex_point(position)),
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Polygon => {
                self.add_shape_at(position)
            }
        }
    }

    /// Create a shape from the current tool's defaults and select it.
    ///
    /// Returns `None` for the vertex and paste tools, which have their own
    /// entry points.
    pub fn add_shape_at(&mut self, position: Point) -> Option<ShapeId> {
        let kind = match self.current_tool.shape_kind() {
            Some(ShapeKind::Vertices) | None => return None,
            Some(kind) => kind,
        };
        let params = self.tool_params.for_kind(kind);
        let model = ShapeModel::create(&mut self.ids, &params, position);
        Some(self.push(model))
    }

    /// Extend the selected vertex chain, or start a new one.
    ///
    /// A new chain is centered on `position` with a single vertex at its
    /// origin. An extended chain gets the point in its local unscaled frame.
    pub fn add_vertex_point(&mut self, position: Point) -> ShapeId {
        if !self.vertices_mode.create_new {
            if let Some(model) = self
                .selected_shape_mut()
                .filter(|m| m.kind() == ShapeKind::Vertices)
            {
                let local = model.world_to_local(position);
                model.push_vertex(local);
                log::debug!("Extended {} to {} vertices", model.id(), model.corner_count());
                return model.id();
            }
        }

        let radius = self.tool_params.vertices.chamfer.radius;
        let params = ShapeParams::Vertices(VerticesParams {
            vertices: vec![Point::ZERO],
            chamfer: Chamfer {
                radius,
                vertex_radii: vec![radius],
                use_per_vertex: false,
            },
        });
        let model = ShapeModel::create(&mut self.ids, &params, position);
        self.vertices_mode.create_new = false;
        self.push(model)
    }

    /// Copy the selection into the clipboard. The copy gets a fresh color
    /// when pasted.
    pub fn copy_selection(&mut self) -> bool {
        let Some(model) = self.selected_shape() else {
            return false;
        };
        let mut template = model.template();
        template.render_color = None;
        log::debug!("Copied {}", model.id());
        self.clipboard = Some(template);
        true
    }

    /// Stamp the clipboard at `position`. No-op without a clipboard.
    pub fn paste_at(&mut self, position: Point) -> Option<ShapeId> {
        let template = self.clipboard.as_ref()?;
        let model = ShapeModel::from_template(&mut self.ids, template, position);
        Some(self.push(model))
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<ShapeModel> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("Removed {}", id);
        Some(self.shapes.remove(index))
    }

    /// Move the selection by a fixed offset.
    pub fn nudge_selection(&mut self, delta: Vec2) -> Option<ShapeId> {
        let model = self.selected_shape_mut()?;
        model.position += delta;
        Some(model.id())
    }

    pub fn can_resize_canvas(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Resize the canvas. Values are rounded and clamped to the configured
    /// range; anything below the minimum is rejected.
    pub fn resize_canvas(&mut self, width: f64, height: f64) -> Result<CanvasSize, SceneError> {
        if !self.can_resize_canvas() {
            return Err(SceneError::CanvasLocked(self.shapes.len()));
        }
        let (min, max) = self.canvas_limits;
        let min_f = min as f64;
        // NaN fails both comparisons
        if !(width >= min_f && height >= min_f) {
            return Err(SceneError::CanvasTooSmall(min));
        }
        let clamp = |v: f64| v.round().clamp(min_f, max as f64) as u32;
        self.canvas = CanvasSize::new(clamp(width), clamp(height));
        log::info!("Canvas resized to {}x{}", self.canvas.width, self.canvas.height);
        Ok(self.canvas)
    }

    pub fn set_background(&mut self, url: String) {
        self.background.url = Some(url);
    }

    pub fn clear_background(&mut self) {
        self.background.url = None;
    }

    /// Drop shapes, selection, clipboard, background and vertex mode.
    ///
    /// Ids keep counting up so a reset never reissues one.
    pub fn reset(&mut self) {
        self.shapes.clear();
        self.selected = None;
        self.clipboard = None;
        self.background.url = None;
        self.vertices_mode = VerticesMode::default();
        log::info!("Scene reset");
    }

    /// Append the parts of a body data export as new shapes.
    pub fn import_body_data(&mut self, json: &str) -> Result<Vec<ShapeId>, SceneError> {
        let models = BodyData::from_json(json)?.into_shapes(&mut self.ids)?;
        let ids: Vec<ShapeId> = models.iter().map(ShapeModel::id).collect();
        self.shapes.extend(models);
        log::info!("Imported {} parts", ids.len());
        Ok(ids)
    }
}
