use std::sync::Arc;

/// Modifier keys held while a key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Raw input observed in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    PointerMove,
    PointerClick,
    KeyPress {
        /// Value the key produced, e.g. `"a"`, `" "` or `"Escape"`.
        key: String,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Whether the event counts as productive input. Shortcuts and navigation keys don't.
    pub fn is_qualifying(&self) -> bool {
        match self {
            InputEvent::PointerMove | InputEvent::PointerClick => true,
            InputEvent::KeyPress { key, modifiers } => {
                !modifiers.any() && is_single_printable(key)
            }
        }
    }
}

fn is_single_printable(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
}

/// Everything an input source can hand over to the tracker loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Input(InputEvent),
    TitleChanged(Arc<str>),
    Toggle,
}
