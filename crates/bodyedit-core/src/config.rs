//! Editor tuning knobs.

use serde::{Deserialize, Serialize};

/// Editor configuration. Every field falls back to its default when
/// missing from the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub canvas_min: u32,
    pub canvas_max: u32,
    /// Smallest scale a gizmo drag can produce.
    pub min_gesture_scale: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    /// Frames between automatic static previews.
    pub auto_static_frames: u32,
    pub boundary_thickness: f64,
    pub vertex_pick_radius: f64,
    pub gizmo_min_size: f64,
    pub rotate_handle_offset: f64,
    pub handle_hit_radius: f64,
    pub background_opacity: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 854,
            canvas_height: 480,
            canvas_min: 1,
            canvas_max: 2000,
            min_gesture_scale: 0.1,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            auto_static_frames: 15,
            boundary_thickness: 16.0,
            vertex_pick_radius: 10.0,
            gizmo_min_size: 12.0,
            rotate_handle_offset: 18.0,
            handle_hit_radius: 8.0,
            background_opacity: 0.6,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
