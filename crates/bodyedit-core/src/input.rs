//! Input actions dispatched to the editor.
//!
//! Hosts translate pointer, keyboard and panel events into [`InputAction`]
//! values. Every action is serde-friendly so a browser shell can pass them
//! across as JSON.

use crate::selection::GizmoHandle;
use crate::shapes::{ShapeId, ShapeParams};
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Empty canvas.
    Stage,
    Shape(ShapeId),
    Handle(GizmoHandle),
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Char(char),
}

impl Key {
    /// Unit direction for arrow keys.
    pub fn arrow_direction(&self) -> Option<Vec2> {
        match self {
            Key::ArrowUp => Some(Vec2::new(0.0, -1.0)),
            Key::ArrowDown => Some(Vec2::new(0.0, 1.0)),
            Key::ArrowLeft => Some(Vec2::new(-1.0, 0.0)),
            Key::ArrowRight => Some(Vec2::new(1.0, 0.0)),
            _ => None,
        }
    }
}

/// Every user intent the editor understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InputAction {
    // Tools
    SelectTool {
        tool: ToolKind,
    },
    /// Replace the placement defaults for one shape kind.
    SetToolParams {
        params: ShapeParams,
    },
    /// Vertex tool, next click starts a new chain.
    NewVerticesShape,
    /// Vertex tool, clicks extend the selected chain.
    EditVerticesShape,

    // Pointer
    PointerDown {
        position: Point,
        target: PointerTarget,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp,

    // Keyboard
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },

    // Selection panel
    SetPosition {
        x: f64,
        y: f64,
    },
    SetAngleDegrees {
        degrees: f64,
    },
    SetScale {
        x: f64,
        y: f64,
    },
    SetRectangleSize {
        width: f64,
        height: f64,
    },
    SetCircleRadius {
        radius: f64,
    },
    SetPolygonSides {
        sides: f64,
    },
    SetPolygonRadius {
        radius: f64,
    },
    ApplyChamfer {
        radius: f64,
    },
    ApplyVertexChamfers {
        radii: Vec<f64>,
    },
    /// Remove one vertex from the selected chain.
    RemoveVertex {
        index: usize,
    },

    // Scene
    Select {
        id: Option<ShapeId>,
    },
    Copy,
    SelectPasteTool,
    DeleteSelection,
    ResizeCanvas {
        width: f64,
        height: f64,
    },
    SetBackground {
        url: String,
    },
    ClearBackground,
    Import {
        json: String,
    },
    Export,
    /// Confirmed by the host before dispatch.
    ResetProject,

    // Physics preview
    TestStatic,
    TestDynamic,
    ClearBody,
    ToggleAutoStatic {
        enabled: bool,
    },
    /// One animation frame.
    Tick,
}
