//! BodyEdit Host Shell
//!
//! Glue between the headless editor and its hosts: a JSON session used by
//! the browser bindings and the command line replayer.

pub mod cli;
mod session;
mod shortcuts;

pub use session::{Session, SessionError, SessionResult};
pub use shortcuts::{Shortcut, ShortcutRegistry, key_from_name};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebEditor, start};
