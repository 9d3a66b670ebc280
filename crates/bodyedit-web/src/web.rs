//! WebAssembly entry point.
//!
//! The page owns rendering and the physics engine. It forwards input as
//! JSON actions and reacts to the JSON events returned.

use crate::session::{Session, SessionError, SessionResult};
use bodyedit_core::{EditorEvent, Modifiers};
use kurbo::Point;
use wasm_bindgen::prelude::*;

fn to_js(err: SessionError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn events_json(events: SessionResult<Vec<EditorEvent>>) -> Result<String, JsValue> {
    let events = events.map_err(to_js)?;
    serde_json::to_string(&events).map_err(|err| to_js(err.into()))
}

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the first logger.
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("Starting BodyEdit (WASM)");
}

/// Editor handle exposed to JavaScript.
#[wasm_bindgen]
pub struct WebEditor {
    session: Session,
}

#[wasm_bindgen]
impl WebEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebEditor, JsValue> {
        let session = Session::from_config_json(config_json.as_deref()).map_err(to_js)?;
        Ok(Self { session })
    }

    /// Dispatch a JSON action, returning a JSON array of events.
    pub fn dispatch(&mut self, action_json: &str) -> Result<String, JsValue> {
        self.session.dispatch_json(action_json).map_err(to_js)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool) -> Result<String, JsValue> {
        let modifiers = Modifiers {
            shift,
            ctrl,
            ..Modifiers::default()
        };
        events_json(self.session.pointer_down(Point::new(x, y), modifiers))
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, shift: bool) -> Result<String, JsValue> {
        let modifiers = Modifiers {
            shift,
            ..Modifiers::default()
        };
        events_json(self.session.key_down(key, modifiers))
    }

    #[wasm_bindgen(js_name = shapesJson)]
    pub fn shapes_json(&self) -> Result<String, JsValue> {
        self.session.shapes_json().map_err(to_js)
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        Ok(self.session.export().map_err(to_js)?.json)
    }

    #[wasm_bindgen(js_name = exportCode)]
    pub fn export_code(&self) -> Result<String, JsValue> {
        Ok(self.session.export().map_err(to_js)?.code)
    }
}
