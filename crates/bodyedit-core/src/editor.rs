//! Editor state machine.
//!
//! [`Editor::dispatch`] is the single entry point that applies an
//! [`InputAction`] to the scene and reports what changed as a list of
//! [`EditorEvent`]s. The editor never draws or simulates; hosts react to
//! the events.

use crate::config::EditorConfig;
use crate::export::{ExportBundle, ExportError};
use crate::input::{InputAction, Key, Modifiers, PointerTarget};
use crate::physics::{PreviewMode, PreviewRequest, plan_compound};
use crate::scene::{CanvasSize, Scene, SceneError};
use crate::selection::{DragMode, DragState, Gizmo, GizmoHandle, find_vertex_index};
use crate::shapes::{ModelError, ShapeId, ShapeKind, ShapeModel, ShapeParams};
use crate::tools::ToolKind;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Physics test state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestState {
    pub has_static: bool,
    pub has_dynamic: bool,
    /// Periodically rebuild the static body while editing.
    pub auto_static: bool,
}

/// What changed after an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum EditorEvent {
    SelectionChanged(Option<ShapeId>),
    /// One shape's transform or params changed.
    ShapeChanged(ShapeId),
    /// Shapes were added or removed.
    ShapeListChanged,
    ToolChanged(ToolKind),
    ClipboardChanged,
    CanvasResized(CanvasSize),
    BackgroundChanged,
    Exported(ExportBundle),
    PreviewRequested(PreviewRequest),
    PreviewCleared,
    /// Boundary walls should exist.
    BoundsActive(bool),
    TestStateChanged(TestState),
}

/// Headless body editor.
#[derive(Debug, Clone)]
pub struct Editor {
    scene: Scene,
    config: EditorConfig,
    drag: Option<DragState>,
    tests: TestState,
    auto_static_counter: u32,
    bounds_active: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(&config),
            config,
            drag: None,
            tests: TestState::default(),
            auto_static_counter: 0,
            bounds_active: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn test_state(&self) -> TestState {
        self.tests
    }

    pub fn bounds_active(&self) -> bool {
        self.bounds_active
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Gizmo for the selected shape.
    pub fn gizmo(&self) -> Option<Gizmo> {
        self.scene
            .selected_shape()
            .map(|model| Gizmo::for_shape(model, &self.config))
    }

    /// Resolve what lies under `point`: gizmo handles first, then the
    /// topmost shape.
    pub fn hit_test(&self, point: Point) -> PointerTarget {
        if let Some(handle) = self
            .gizmo()
            .and_then(|g| g.handle_at(point, self.config.handle_hit_radius))
        {
            return PointerTarget::Handle(handle);
        }
        self.scene
            .shapes()
            .iter()
            .rev()
            .find(|s| s.contains(point))
            .map_or(PointerTarget::Stage, |s| PointerTarget::Shape(s.id()))
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: InputAction) -> EditorResult<Vec<EditorEvent>> {
        let mut events = Vec::new();
        match action {
            InputAction::SelectTool { tool } => self.set_tool(tool, &mut events),
            InputAction::SetToolParams { params } => {
                log::debug!("Tool defaults for {} updated", params.kind());
                self.scene.tool_params.set(params);
            }
            InputAction::NewVerticesShape => {
                self.scene.vertices_mode.create_new = true;
                self.set_tool(ToolKind::Vertices, &mut events);
            }
            InputAction::EditVerticesShape => {
                self.scene.vertices_mode.create_new = false;
                self.set_tool(ToolKind::Vertices, &mut events);
            }

            InputAction::PointerDown {
                position,
                target,
                modifiers,
            } => self.pointer_down(position, target, modifiers, &mut events),
            InputAction::PointerMove {
                position,
                modifiers,
            } => self.pointer_move(position, modifiers, &mut events)?,
            InputAction::PointerUp => self.drag = None,

            InputAction::KeyDown { key, modifiers } => self.key_down(key, modifiers, &mut events),

            InputAction::SetPosition { x, y } => {
                self.edit_selected(&mut events, |m| {
                    m.position = Point::new(x, y);
                    Ok(true)
                })?;
            }
            InputAction::SetAngleDegrees { degrees } => {
                self.edit_selected(&mut events, |m| {
                    if !m.supports_rotation() {
                        return Ok(false);
                    }
                    m.angle = degrees.to_radians();
                    Ok(true)
                })?;
            }
            InputAction::SetScale { x, y } => {
                let min = self.config.min_gesture_scale;
                self.edit_selected(&mut events, |m| {
                    m.scale_x = x.max(min);
                    m.scale_y = y.max(min);
                    Ok(true)
                })?;
            }
            InputAction::SetRectangleSize { width, height } => {
                self.edit_selected(&mut events, |m| match &mut m.params {
                    ShapeParams::Rectangle(p) => {
                        p.width = width;
                        p.height = height;
                        Ok(true)
                    }
                    _ => Ok(false),
                })?;
            }
            InputAction::SetCircleRadius { radius } => {
                self.edit_selected(&mut events, |m| match &mut m.params {
                    ShapeParams::Circle(p) => {
                        p.radius = radius;
                        Ok(true)
                    }
                    _ => Ok(false),
                })?;
            }
            InputAction::SetPolygonSides { sides } => {
                self.edit_selected(&mut events, |m| {
                    if m.kind() != ShapeKind::Polygon {
                        return Ok(false);
                    }
                    m.set_polygon_sides(sides);
                    Ok(true)
                })?;
            }
            InputAction::SetPolygonRadius { radius } => {
                self.edit_selected(&mut events, |m| match &mut m.params {
                    ShapeParams::Polygon(p) => {
                        p.radius = radius;
                        Ok(true)
                    }
                    _ => Ok(false),
                })?;
            }
            InputAction::ApplyChamfer { radius } => {
                self.edit_selected(&mut events, |m| {
                    m.apply_uniform_chamfer(radius)?;
                    Ok(true)
                })?;
            }
            InputAction::ApplyVertexChamfers { radii } => {
                self.edit_selected(&mut events, |m| {
                    m.apply_vertex_chamfers(radii)?;
                    Ok(true)
                })?;
            }
            InputAction::RemoveVertex { index } => {
                self.edit_selected(&mut events, |m| Ok(m.remove_vertex(index)?.is_some()))?;
                // vertex indices past the removed one have shifted
                if matches!(self.drag, Some(DragState { mode: DragMode::Vertex(_), .. })) {
                    self.drag = None;
                }
            }

            InputAction::Select { id } => self.select(id, &mut events),
            InputAction::Copy => {
                if self.scene.copy_selection() {
                    events.push(EditorEvent::ClipboardChanged);
                }
            }
            InputAction::SelectPasteTool => {
                if self.scene.clipboard().is_some() {
                    self.set_tool(ToolKind::Paste, &mut events);
                } else {
                    log::warn!("Paste tool needs a copied shape");
                }
            }
            InputAction::DeleteSelection => self.delete_selection(&mut events),
            InputAction::ResizeCanvas { width, height } => {
                let size = self.scene.resize_canvas(width, height)?;
                events.push(EditorEvent::CanvasResized(size));
            }
            InputAction::SetBackground { url } => {
                self.scene.set_background(url);
                events.push(EditorEvent::BackgroundChanged);
            }
            InputAction::ClearBackground => {
                self.scene.clear_background();
                events.push(EditorEvent::BackgroundChanged);
            }
            InputAction::Import { json } => {
                let ids = self.scene.import_body_data(&json)?;
                if !ids.is_empty() {
                    self.shape_list_changed(&mut events);
                }
            }
            InputAction::Export => {
                let bundle = ExportBundle::from_shapes(self.scene.shapes())?;
                log::info!("Exported {} parts", self.scene.len());
                events.push(EditorEvent::Exported(bundle));
            }
            InputAction::ResetProject => self.reset(&mut events),

            InputAction::TestStatic => {
                if self.tests.has_dynamic {
                    log::warn!("Static test refused while a dynamic test runs");
                } else {
                    self.request_static(&mut events);
                }
            }
            InputAction::TestDynamic => {
                if self.tests.has_static || self.tests.auto_static {
                    log::warn!("Dynamic test refused while a static test is shown");
                } else {
                    self.tests.has_dynamic = true;
                    events.push(EditorEvent::PreviewRequested(self.preview(PreviewMode::Dynamic)));
                    events.push(EditorEvent::TestStateChanged(self.tests));
                }
            }
            InputAction::ClearBody => {
                self.tests = TestState::default();
                self.auto_static_counter = 0;
                events.push(EditorEvent::PreviewCleared);
                events.push(EditorEvent::TestStateChanged(self.tests));
            }
            InputAction::ToggleAutoStatic { enabled } => {
                if self.tests.has_dynamic {
                    log::warn!("Auto static refused while a dynamic test runs");
                } else {
                    self.tests.auto_static = enabled;
                    if enabled {
                        self.request_static(&mut events);
                    } else {
                        events.push(EditorEvent::TestStateChanged(self.tests));
                    }
                }
            }
            InputAction::Tick => self.tick(&mut events),
        }
        Ok(events)
    }

    fn set_tool(&mut self, tool: ToolKind, events: &mut Vec<EditorEvent>) {
        self.scene.current_tool = tool;
        events.push(EditorEvent::ToolChanged(tool));
    }

    fn select(&mut self, id: Option<ShapeId>, events: &mut Vec<EditorEvent>) {
        let before = self.scene.selected();
        self.scene.select(id);
        if self.scene.selected() != before {
            events.push(EditorEvent::SelectionChanged(self.scene.selected()));
        }
    }

    fn shape_list_changed(&mut self, events: &mut Vec<EditorEvent>) {
        events.push(EditorEvent::ShapeListChanged);
        let active = !self.scene.is_empty();
        if active != self.bounds_active {
            self.bounds_active = active;
            events.push(EditorEvent::BoundsActive(active));
        }
    }

    fn pointer_down(
        &mut self,
        position: Point,
        target: PointerTarget,
        modifiers: Modifiers,
        events: &mut Vec<EditorEvent>,
    ) {
        self.drag = None;
        match target {
            PointerTarget::Stage => {
                let before = self.scene.selected();
                let len = self.scene.len();
                let Some(id) = self.scene.place_at(position) else {
                    return;
                };
                if self.scene.len() != len {
                    self.shape_list_changed(events);
                } else {
                    events.push(EditorEvent::ShapeChanged(id));
                }
                if Some(id) != before {
                    events.push(EditorEvent::SelectionChanged(Some(id)));
                }
            }
            PointerTarget::Shape(id) => {
                let Some(model) = self.scene.shape(id) else {
                    log::warn!("Pointer down on unknown shape {}", id);
                    return;
                };
                let mode = Self::shape_drag_mode(model, position, modifiers, &self.config);
                self.drag = Some(DragState::begin(mode, model, position));
                self.select(Some(id), events);
            }
            PointerTarget::Handle(handle) => {
                let Some(model) = self.scene.selected_shape() else {
                    return;
                };
                if handle == GizmoHandle::Rotate && !model.supports_rotation() {
                    return;
                }
                self.drag = Some(DragState::begin(handle.into(), model, position));
            }
        }
    }

    /// Ctrl on a chain near a vertex drags that vertex, anything else moves.
    fn shape_drag_mode(
        model: &ShapeModel,
        position: Point,
        modifiers: Modifiers,
        config: &EditorConfig,
    ) -> DragMode {
        if modifiers.ctrl && model.kind() == ShapeKind::Vertices {
            let local = model.world_to_local(position);
            if let Some(index) = find_vertex_index(model, local, config.vertex_pick_radius) {
                return DragMode::Vertex(index);
            }
        }
        DragMode::Move
    }

    fn pointer_move(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        events: &mut Vec<EditorEvent>,
    ) -> EditorResult<()> {
        let Some(drag) = self.drag else {
            return Ok(());
        };
        let Some(model) = self.scene.shape_mut(drag.shape_id) else {
            self.drag = None;
            return Ok(());
        };
        if let Err(err) = drag.apply(model, position, modifiers, &self.config) {
            self.drag = None;
            return Err(err.into());
        }
        events.push(EditorEvent::ShapeChanged(drag.shape_id));
        Ok(())
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers, events: &mut Vec<EditorEvent>) {
        match key {
            Key::Delete | Key::Backspace => self.delete_selection(events),
            Key::Escape => {
                self.drag = None;
                self.select(None, events);
            }
            key => {
                let Some(direction) = key.arrow_direction() else {
                    return;
                };
                let step = if modifiers.shift {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                if let Some(id) = self.scene.nudge_selection(direction * step) {
                    events.push(EditorEvent::ShapeChanged(id));
                }
            }
        }
    }

    fn delete_selection(&mut self, events: &mut Vec<EditorEvent>) {
        let Some(id) = self.scene.selected() else {
            return;
        };
        self.drag = None;
        self.scene.remove_shape(id);
        self.shape_list_changed(events);
        events.push(EditorEvent::SelectionChanged(None));
    }

    /// Run `edit` on the selection. It returns whether anything changed.
    fn edit_selected<F>(&mut self, events: &mut Vec<EditorEvent>, edit: F) -> EditorResult<()>
    where
        F: FnOnce(&mut ShapeModel) -> Result<bool, ModelError>,
    {
        let Some(model) = self.scene.selected_shape_mut() else {
            return Ok(());
        };
        if edit(&mut *model)? {
            log::debug!("Edited {}", model.id());
            events.push(EditorEvent::ShapeChanged(model.id()));
        }
        Ok(())
    }

    fn preview(&self, mode: PreviewMode) -> PreviewRequest {
        let canvas = self.scene.canvas();
        let bounds = Size::new(canvas.width as f64, canvas.height as f64);
        PreviewRequest {
            mode,
            plan: plan_compound(self.scene.shapes(), bounds),
        }
    }

    fn request_static(&mut self, events: &mut Vec<EditorEvent>) {
        self.tests.has_static = true;
        events.push(EditorEvent::PreviewRequested(self.preview(PreviewMode::Static)));
        events.push(EditorEvent::TestStateChanged(self.tests));
    }

    fn tick(&mut self, events: &mut Vec<EditorEvent>) {
        if !self.tests.auto_static || self.tests.has_dynamic {
            self.auto_static_counter = 0;
            return;
        }
        self.auto_static_counter += 1;
        if self.auto_static_counter >= self.config.auto_static_frames {
            self.auto_static_counter = 0;
            self.request_static(events);
        }
    }

    fn reset(&mut self, events: &mut Vec<EditorEvent>) {
        self.scene.reset();
        self.drag = None;
        self.tests = TestState::default();
        self.auto_static_counter = 0;
        events.push(EditorEvent::ShapeListChanged);
        events.push(EditorEvent::SelectionChanged(None));
        events.push(EditorEvent::ClipboardChanged);
        events.push(EditorEvent::BackgroundChanged);
        events.push(EditorEvent::PreviewCleared);
        self.bounds_active = false;
        events.push(EditorEvent::BoundsActive(false));
        events.push(EditorEvent::TestStateChanged(self.tests));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(editor: &mut Editor, x: f64, y: f64) -> Vec<EditorEvent> {
        editor
            .dispatch(InputAction::PointerDown {
                position: Point::new(x, y),
                target: PointerTarget::Stage,
                modifiers: Modifiers::default(),
            })
            .unwrap()
    }

    fn selected(editor: &Editor) -> &ShapeModel {
        editor.scene().selected_shape().unwrap()
    }

    #[test]
    fn test_stage_click_creates_and_selects() {
        let mut editor = Editor::default();
        let events = click(&mut editor, 100.0, 100.0);
        let id = editor.scene().selected().unwrap();
        assert_eq!(
            events,
            vec![
                EditorEvent::ShapeListChanged,
                EditorEvent::BoundsActive(true),
                EditorEvent::SelectionChanged(Some(id)),
            ]
        );
        assert_eq!(selected(&editor).kind(), ShapeKind::Rectangle);

        let events = click(&mut editor, 300.0, 100.0);
        assert!(!events.contains(&EditorEvent::BoundsActive(true)));
        assert_eq!(editor.scene().len(), 2);
    }

    #[test]
    fn test_drag_moves_shape() {
        let mut editor = Editor::default();
        click(&mut editor, 100.0, 100.0);
        let id = editor.scene().selected().unwrap();
        editor.dispatch(InputAction::Select { id: None }).unwrap();

        let target = editor.hit_test(Point::new(110.0, 110.0));
        assert_eq!(target, PointerTarget::Shape(id));
        editor
            .dispatch(InputAction::PointerDown {
                position: Point::new(110.0, 110.0),
                target,
                modifiers: Modifiers::default(),
            })
            .unwrap();
        let events = editor
            .dispatch(InputAction::PointerMove {
                position: Point::new(150.0, 90.0),
                modifiers: Modifiers::default(),
            })
            .unwrap();
        assert_eq!(events, vec![EditorEvent::ShapeChanged(id)]);
        assert_eq!(selected(&editor).position, Point::new(140.0, 80.0));

        editor.dispatch(InputAction::PointerUp).unwrap();
        assert!(!editor.is_dragging());
        let events = editor
            .dispatch(InputAction::PointerMove {
                position: Point::new(0.0, 0.0),
                modifiers: Modifiers::default(),
            })
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_single_vertex_chain_is_hit() {
        let mut editor = Editor::default();
        editor.dispatch(InputAction::SelectTool { tool: ToolKind::Vertices }).unwrap();
        click(&mut editor, 100.0, 100.0);
        let id = editor.scene().selected().unwrap();
        editor.dispatch(InputAction::Select { id: None }).unwrap();

        assert_eq!(editor.hit_test(Point::new(101.0, 100.0)), PointerTarget::Shape(id));
        assert_eq!(editor.hit_test(Point::new(110.0, 100.0)), PointerTarget::Stage);
    }

    #[test]
    fn test_handle_hit_and_scale() {
        let mut editor = Editor::default();
        click(&mut editor, 100.0, 100.0);
        // default rectangle is 120x80, scale handle at its bottom right
        let target = editor.hit_test(Point::new(160.0, 140.0));
        assert_eq!(target, PointerTarget::Handle(GizmoHandle::Scale));
        editor
            .dispatch(InputAction::PointerDown {
                position: Point::new(160.0, 140.0),
                target,
                modifiers: Modifiers::default(),
            })
            .unwrap();
        editor
            .dispatch(InputAction::PointerMove {
                position: Point::new(220.0, 180.0),
                modifiers: Modifiers::default(),
            })
            .unwrap();
        assert!((selected(&editor).scale_x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ctrl_drag_moves_vertex() {
        let mut editor = Editor::default();
        editor.dispatch(InputAction::SelectTool { tool: ToolKind::Vertices }).unwrap();
        click(&mut editor, 100.0, 100.0);
        click(&mut editor, 140.0, 100.0);
        click(&mut editor, 120.0, 130.0);
        let id = editor.scene().selected().unwrap();
        assert_eq!(selected(&editor).corner_count(), 3);

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor
            .dispatch(InputAction::PointerDown {
                position: Point::new(138.0, 101.0),
                target: PointerTarget::Shape(id),
                modifiers: ctrl,
            })
            .unwrap();
        editor
            .dispatch(InputAction::PointerMove {
                position: Point::new(150.0, 90.0),
                modifiers: ctrl,
            })
            .unwrap();
        assert_eq!(selected(&editor).vertices().unwrap()[1], Point::new(50.0, -10.0));
        assert_eq!(selected(&editor).position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_remove_vertex_ends_vertex_drag() {
        let mut editor = Editor::default();
        editor.dispatch(InputAction::SelectTool { tool: ToolKind::Vertices }).unwrap();
        click(&mut editor, 100.0, 100.0);
        click(&mut editor, 140.0, 100.0);
        click(&mut editor, 120.0, 130.0);
        let id = editor.scene().selected().unwrap();

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor
            .dispatch(InputAction::PointerDown {
                position: Point::new(120.0, 129.0),
                target: PointerTarget::Shape(id),
                modifiers: ctrl,
            })
            .unwrap();
        assert!(editor.is_dragging());

        editor.dispatch(InputAction::RemoveVertex { index: 2 }).unwrap();
        assert!(!editor.is_dragging());
        assert_eq!(selected(&editor).corner_count(), 2);

        let events = editor
            .dispatch(InputAction::PointerMove {
                position: Point::new(150.0, 150.0),
                modifiers: ctrl,
            })
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(selected(&editor).vertices().unwrap(), &[Point::ZERO, Point::new(40.0, 0.0)]);
    }

    #[test]
    fn test_keyboard_nudge_and_delete() {
        let mut editor = Editor::default();
        click(&mut editor, 100.0, 100.0);
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        editor.dispatch(InputAction::KeyDown { key: Key::ArrowRight, modifiers: shift }).unwrap();
        editor.dispatch(InputAction::KeyDown { key: Key::ArrowUp, modifiers: Modifiers::default() }).unwrap();
        assert_eq!(selected(&editor).position, Point::new(110.0, 99.0));

        let events = editor
            .dispatch(InputAction::KeyDown { key: Key::Delete, modifiers: Modifiers::default() })
            .unwrap();
        assert!(editor.scene().is_empty());
        assert!(events.contains(&EditorEvent::BoundsActive(false)));
        assert!(events.contains(&EditorEvent::SelectionChanged(None)));
    }

    #[test]
    fn test_panel_edits() {
        let mut editor = Editor::default();
        editor.dispatch(InputAction::SelectTool { tool: ToolKind::Circle }).unwrap();
        click(&mut editor, 50.0, 50.0);

        let events = editor.dispatch(InputAction::SetAngleDegrees { degrees: 45.0 }).unwrap();
        assert!(events.is_empty());
        assert_eq!(selected(&editor).angle, 0.0);

        editor.dispatch(InputAction::SetScale { x: 2.0, y: -1.0 }).unwrap();
        assert_eq!(selected(&editor).scale_x, 2.0);
        assert_eq!(selected(&editor).scale_y, 0.1);

        assert!(editor.dispatch(InputAction::SetRectangleSize { width: 5.0, height: 5.0 }).unwrap().is_empty());
        editor.dispatch(InputAction::SetCircleRadius { radius: 12.0 }).unwrap();
        assert_eq!(selected(&editor).params, ShapeParams::Circle(crate::shapes::CircleParams::new(12.0)));

        let err = editor.dispatch(InputAction::ApplyChamfer { radius: 3.0 }).unwrap_err();
        assert!(matches!(err, EditorError::Model(ModelError::NotChamferable)));
    }

    #[test]
    fn test_polygon_sides_then_vertex_chamfers() {
        let mut editor = Editor::default();
        editor.dispatch(InputAction::SelectTool { tool: ToolKind::Polygon }).unwrap();
        click(&mut editor, 50.0, 50.0);
        editor
            .dispatch(InputAction::ApplyVertexChamfers { radii: vec![1.0; 5] })
            .unwrap();
        editor.dispatch(InputAction::SetPolygonSides { sides: 6.0 }).unwrap();
        let chamfer = selected(&editor).chamfer().unwrap();
        assert_eq!(chamfer.vertex_radii.len(), 6);

        assert!(editor.dispatch(InputAction::ApplyVertexChamfers { radii: vec![1.0; 5] }).is_err());
        editor.dispatch(InputAction::ApplyVertexChamfers { radii: vec![2.0; 6] }).unwrap();
        assert_eq!(selected(&editor).chamfer().unwrap().vertex_radii, vec![2.0; 6]);
    }

    #[test]
    fn test_paste_flow() {
        let mut editor = Editor::default();
        let events = editor.dispatch(InputAction::SelectPasteTool).unwrap();
        assert!(events.is_empty());
        assert_eq!(editor.scene().current_tool, ToolKind::Rectangle);

        click(&mut editor, 10.0, 10.0);
        assert_eq!(editor.dispatch(InputAction::Copy).unwrap(), vec![EditorEvent::ClipboardChanged]);
        editor.dispatch(InputAction::SelectPasteTool).unwrap();
        assert_eq!(editor.scene().current_tool, ToolKind::Paste);
        click(&mut editor, 200.0, 200.0);
        assert_eq!(editor.scene().len(), 2);
        assert_eq!(selected(&editor).position, Point::new(200.0, 200.0));
    }

    #[test]
    fn test_canvas_resize_locked_by_shapes() {
        let mut editor = Editor::default();
        let events = editor.dispatch(InputAction::ResizeCanvas { width: 500.0, height: 300.0 }).unwrap();
        assert_eq!(events, vec![EditorEvent::CanvasResized(CanvasSize::new(500, 300))]);
        click(&mut editor, 10.0, 10.0);
        let err = editor.dispatch(InputAction::ResizeCanvas { width: 600.0, height: 300.0 }).unwrap_err();
        assert!(matches!(err, EditorError::Scene(SceneError::CanvasLocked(1))));
    }

    #[test]
    fn test_static_and_dynamic_exclusion() {
        let mut editor = Editor::default();
        click(&mut editor, 10.0, 10.0);

        let events = editor.dispatch(InputAction::TestStatic).unwrap();
        assert!(matches!(&events[0], EditorEvent::PreviewRequested(r) if r.mode == PreviewMode::Static && r.plan.is_some()));
        assert!(editor.dispatch(InputAction::TestDynamic).unwrap().is_empty());

        editor.dispatch(InputAction::ClearBody).unwrap();
        assert_eq!(editor.test_state(), TestState::default());

        let events = editor.dispatch(InputAction::TestDynamic).unwrap();
        assert!(matches!(&events[0], EditorEvent::PreviewRequested(r) if r.mode == PreviewMode::Dynamic));
        assert!(editor.dispatch(InputAction::TestStatic).unwrap().is_empty());
        assert!(editor.dispatch(InputAction::ToggleAutoStatic { enabled: true }).unwrap().is_empty());
        assert!(!editor.test_state().auto_static);
    }

    #[test]
    fn test_auto_static_ticks() {
        let mut editor = Editor::default();
        click(&mut editor, 10.0, 10.0);
        let events = editor.dispatch(InputAction::ToggleAutoStatic { enabled: true }).unwrap();
        assert!(matches!(events[0], EditorEvent::PreviewRequested(_)));
        assert!(editor.dispatch(InputAction::TestDynamic).unwrap().is_empty());

        let mut requests = 0;
        for _ in 0..45 {
            let events = editor.dispatch(InputAction::Tick).unwrap();
            requests += events
                .iter()
                .filter(|e| matches!(e, EditorEvent::PreviewRequested(_)))
                .count();
        }
        assert_eq!(requests, 3);

        editor.dispatch(InputAction::ToggleAutoStatic { enabled: false }).unwrap();
        assert!(editor.dispatch(InputAction::Tick).unwrap().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut editor = Editor::default();
        click(&mut editor, 10.0, 10.0);
        editor.dispatch(InputAction::Copy).unwrap();
        editor.dispatch(InputAction::TestStatic).unwrap();
        let events = editor.dispatch(InputAction::ResetProject).unwrap();

        assert!(editor.scene().is_empty());
        assert!(editor.scene().clipboard().is_none());
        assert_eq!(editor.test_state(), TestState::default());
        assert!(!editor.bounds_active());
        assert!(events.contains(&EditorEvent::PreviewCleared));
        assert!(events.contains(&EditorEvent::BoundsActive(false)));
    }

    #[test]
    fn test_export_event() {
        let mut editor = Editor::default();
        click(&mut editor, 10.0, 10.0);
        let events = editor.dispatch(InputAction::Export).unwrap();
        match &events[0] {
            EditorEvent::Exported(bundle) => {
                assert!(bundle.json.contains("\"type\": \"rectangle\""));
                assert!(bundle.code.contains("Bodies.rectangle(10, 10, 120, 80, { angle: 0 })"));
            }
            other => panic!("Expected export, got {:?}", other),
        }
    }

    #[test]
    fn test_event_json() {
        let json = serde_json::to_string(&EditorEvent::SelectionChanged(None)).unwrap();
        assert_eq!(json, r#"{"event":"selection_changed","data":null}"#);
        let json = serde_json::to_string(&EditorEvent::ShapeListChanged).unwrap();
        assert_eq!(json, r#"{"event":"shape_list_changed"}"#);
    }
}
