//! BodyEdit Core Library
//!
//! Platform-agnostic shape model, editor state machine and exporters for
//! composing compound rigid bodies out of primitive parts.

pub mod config;
pub mod editor;
pub mod export;
pub mod geometry;
pub mod input;
pub mod physics;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use config::EditorConfig;
pub use editor::{Editor, EditorError, EditorEvent, EditorResult, TestState};
pub use export::{BodyData, ExportBundle, ExportError, export_body_code, export_body_data};
pub use input::{InputAction, Key, Modifiers, PointerTarget};
pub use physics::{CompoundPlan, PhysicsBackend, PhysicsPreview, PreviewMode, PreviewRequest};
pub use scene::{CanvasSize, Scene, SceneError};
pub use selection::{DragMode, Gizmo, GizmoHandle};
pub use shapes::{ModelError, ShapeId, ShapeKind, ShapeModel, ShapeParams};
pub use tools::ToolKind;
