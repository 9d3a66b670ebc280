//! Keyboard and pointer bindings.

use bodyedit_core::Key;

/// A binding shown in the help overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Display form, e.g. "Shift+ArrowLeft".
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Every binding the editor reacts to.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, "Delete selected shape"),
            Shortcut::new("Backspace", false, false, "Delete selected shape"),
            Shortcut::new("Escape", false, false, "Clear selection"),
            Shortcut::new("Arrows", false, false, "Nudge selection by 1px"),
            Shortcut::new("Arrows", false, true, "Nudge selection by 10px"),
            Shortcut::new("Drag", true, false, "Move a vertex of the selected chain"),
            Shortcut::new("Drag", false, true, "Scale each axis independently"),
        ]
    }

    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

/// Map a `KeyboardEvent.key` name to an editor key.
pub fn key_from_name(name: &str) -> Option<Key> {
    let key = match name {
        "Delete" | "Del" => Key::Delete,
        "Backspace" => Key::Backspace,
        "ArrowUp" | "Up" => Key::ArrowUp,
        "ArrowDown" | "Down" => Key::ArrowDown,
        "ArrowLeft" | "Left" => Key::ArrowLeft,
        "ArrowRight" | "Right" => Key::ArrowRight,
        "Escape" | "Esc" => Key::Escape,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };
    Some(key)
}
