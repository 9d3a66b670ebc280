//! Host session wrapping the editor behind a JSON interface.

use crate::shortcuts::key_from_name;
use bodyedit_core::{
    Editor, EditorConfig, EditorError, EditorEvent, ExportBundle, ExportError, InputAction,
    Modifiers,
};
use kurbo::Point;
use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// One editing session owned by a host.
pub struct Session {
    editor: Editor,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            editor: Editor::new(config),
        }
    }

    /// Build a session from optional JSON config. Missing keys use defaults.
    pub fn from_config_json(json: Option<&str>) -> SessionResult<Self> {
        let config = match json {
            Some(json) => EditorConfig::from_json(json)?,
            None => EditorConfig::default(),
        };
        Ok(Self::new(config))
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn dispatch(&mut self, action: InputAction) -> SessionResult<Vec<EditorEvent>> {
        Ok(self.editor.dispatch(action)?)
    }

    /// Dispatch one JSON action and return the events as a JSON array.
    pub fn dispatch_json(&mut self, json: &str) -> SessionResult<String> {
        let action: InputAction = serde_json::from_str(json)?;
        let events = self.dispatch(action)?;
        Ok(serde_json::to_string(&events)?)
    }

    /// Replay a JSON array of actions.
    ///
    /// Rejected actions are logged and skipped, like a user dismissing an
    /// alert and carrying on.
    pub fn run_script(&mut self, json: &str) -> SessionResult<Vec<EditorEvent>> {
        let actions: Vec<InputAction> = serde_json::from_str(json)?;
        let mut events = Vec::new();
        for (index, action) in actions.into_iter().enumerate() {
            match self.editor.dispatch(action) {
                Ok(mut produced) => events.append(&mut produced),
                Err(err) => log::warn!("Action {} rejected: {}", index, err),
            }
        }
        Ok(events)
    }

    /// Pointer down at a raw position, resolving the target first.
    pub fn pointer_down(
        &mut self,
        position: Point,
        modifiers: Modifiers,
    ) -> SessionResult<Vec<EditorEvent>> {
        let target = self.editor.hit_test(position);
        self.dispatch(InputAction::PointerDown {
            position,
            target,
            modifiers,
        })
    }

    /// Key press by its browser name. Unknown keys do nothing.
    pub fn key_down(&mut self, name: &str, modifiers: Modifiers) -> SessionResult<Vec<EditorEvent>> {
        match key_from_name(name) {
            Some(key) => self.dispatch(InputAction::KeyDown { key, modifiers }),
            None => Ok(Vec::new()),
        }
    }

    pub fn export(&self) -> SessionResult<ExportBundle> {
        Ok(ExportBundle::from_shapes(self.editor.scene().shapes())?)
    }

    /// Shape list for rendering.
    pub fn shapes_json(&self) -> SessionResult<String> {
        Ok(serde_json::to_string(self.editor.scene().shapes())?)
    }
}
