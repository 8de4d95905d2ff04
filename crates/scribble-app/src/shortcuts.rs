//! Keyboard shortcut registry and detection.

use egui::{Context, Key, KeyboardShortcut, Modifiers};
use scribble_core::ControlIntent;

use crate::ui::UiAction;

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
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

    /// Format the shortcut for display (e.g., "Ctrl+S").
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

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("S", true, false, "Save drawing"),
            Shortcut::new("O", true, false, "Load saved drawing"),
            Shortcut::new("E", true, false, "Export to PNG"),
            Shortcut::new("=", true, false, "Zoom in"),
            Shortcut::new("-", true, false, "Zoom out"),
            Shortcut::new("0", true, false, "Reset view"),
            Shortcut::new("Middle+Drag", false, false, "Pan"),
            Shortcut::new("Wheel", false, false, "Zoom"),
        ]
    }

    /// Display string for the shortcut bound to `description`, if any.
    pub fn hint(description: &str) -> Option<String> {
        Self::all()
            .into_iter()
            .find(|s| s.description == description)
            .map(|s| s.format())
    }

    /// Consume the first matching shortcut from this frame's input.
    pub fn detect(ctx: &Context) -> Option<UiAction> {
        const BINDINGS: [(Key, ControlIntent); 7] = [
            (Key::Z, ControlIntent::Undo),
            (Key::S, ControlIntent::Save),
            (Key::O, ControlIntent::Load),
            (Key::E, ControlIntent::Export),
            (Key::Equals, ControlIntent::ZoomIn),
            (Key::Minus, ControlIntent::ZoomOut),
            (Key::Num0, ControlIntent::ResetView),
        ];

        ctx.input_mut(|input| {
            BINDINGS.into_iter().find_map(|(key, intent)| {
                input
                    .consume_shortcut(&KeyboardShortcut::new(Modifiers::COMMAND, key))
                    .then_some(UiAction::Canvas(intent))
            })
        })
    }
}
