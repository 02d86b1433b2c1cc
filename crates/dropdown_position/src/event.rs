use crate::Point;

/// Input events the dropdown reacts to or forwards to hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer (mouse or touch) pressed.
    PointerDown {
        position: Point,
        /// Element ids from the event target up to the document root.
        /// Empty when the host cannot resolve the target.
        path: Vec<String>,
    },
    /// Keyboard key pressed.
    KeyDown { key: Key },
    /// Trigger received focus.
    Focus,
    /// Action invoked from code rather than user input.
    Programmatic,
}

impl Event {
    /// Pointer-down without a resolved target path.
    pub fn pointer_at(x: f64, y: f64) -> Self {
        Event::PointerDown {
            position: Point::new(x, y),
            path: Vec::new(),
        }
    }

    pub fn key(key: Key) -> Self {
        Event::KeyDown { key }
    }

    /// DOM-style event type name.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::PointerDown { .. } => "pointerdown",
            Event::KeyDown { .. } => "keydown",
            Event::Focus => "focus",
            Event::Programmatic => "programmatic",
        }
    }

    /// Whether a pointer event's target path passes through the element `id`.
    pub fn path_contains(&self, id: &str) -> bool {
        match self {
            Event::PointerDown { path, .. } => path.iter().any(|p| p == id),
            _ => false,
        }
    }
}

/// Keyboard keys. Only Enter and Escape have built-in handling; everything
/// else reaches the keydown hook as a character or [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}
