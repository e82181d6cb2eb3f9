use std::thread;

use anyhow::Result;
use async_trait::async_trait;
use rdev::{listen, EventType, Key};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    tracker::input::{InputEvent, Modifiers, TrackerEvent},
    window::{create_window_reader, watch_active_window, WINDOW_POLL_PERIOD},
};

use super::InputSource;

/// Global pointer and keyboard hooks of the desktop session, plus the foreground window title
/// when the build has a window reader.
pub struct DesktopSource;

/// Held state of every physical modifier key. Left and right keys are tracked apart so releasing
/// one of them keeps the modifier active while the other is down.
#[derive(Default)]
struct ModifierState {
    control_left: bool,
    control_right: bool,
    alt: bool,
    alt_gr: bool,
    meta_left: bool,
    meta_right: bool,
}

impl ModifierState {
    /// Returns true if the key is a modifier, so it is never counted itself.
    fn apply(&mut self, key: Key, pressed: bool) -> bool {
        let held = match key {
            Key::ControlLeft => &mut self.control_left,
            Key::ControlRight => &mut self.control_right,
            Key::Alt => &mut self.alt,
            Key::AltGr => &mut self.alt_gr,
            Key::MetaLeft => &mut self.meta_left,
            Key::MetaRight => &mut self.meta_right,
            _ => return false,
        };
        *held = pressed;
        true
    }

    fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.control_left || self.control_right,
            alt: self.alt || self.alt_gr,
            meta: self.meta_left || self.meta_right,
        }
    }
}

fn translate(
    state: &mut ModifierState,
    event_type: EventType,
    name: Option<String>,
) -> Option<InputEvent> {
    match event_type {
        EventType::MouseMove { .. } => Some(InputEvent::PointerMove),
        EventType::ButtonPress(_) => Some(InputEvent::PointerClick),
        EventType::KeyPress(key) => {
            if state.apply(key, true) {
                return None;
            }
            Some(InputEvent::KeyPress {
                key: name.unwrap_or_else(|| format!("{key:?}")),
                modifiers: state.modifiers(),
            })
        }
        EventType::KeyRelease(key) => {
            state.apply(key, false);
            None
        }
        EventType::ButtonRelease(_) | EventType::Wheel { .. } => None,
    }
}

#[async_trait]
impl InputSource for DesktopSource {
    async fn run(
        self: Box<Self>,
        events: mpsc::Sender<TrackerEvent>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let input_events = events.clone();
        // rdev blocks its thread forever, it ends together with the process.
        thread::spawn(move || {
            let mut state = ModifierState::default();
            let result = listen(move |event| {
                if let Some(input) = translate(&mut state, event.event_type, event.name) {
                    let _ = input_events.blocking_send(TrackerEvent::Input(input));
                }
            });
            if let Err(e) = result {
                error!("Desktop input listener stopped {e:?}");
            }
        });
        info!("Listening to desktop input");

        let reader = create_window_reader().unwrap_or_else(|e| {
            warn!("Can't read the active window {e:?}");
            None
        });
        match reader {
            Some(reader) => watch_active_window(reader, events, shutdown, WINDOW_POLL_PERIOD).await,
            None => {
                info!("No window reader in this build, reporting the configured window title");
                drop(events);
                shutdown.cancelled().await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rdev::{Button, EventType, Key};

    use crate::tracker::input::{InputEvent, Modifiers};

    use super::{translate, ModifierState};

    #[test]
    fn tracks_held_modifiers() {
        let mut state = ModifierState::default();
        assert_eq!(translate(&mut state, EventType::KeyPress(Key::ControlLeft), None), None);
        assert_eq!(
            translate(&mut state, EventType::KeyPress(Key::KeyC), Some("c".into())),
            Some(InputEvent::KeyPress {
                key: "c".into(),
                modifiers: Modifiers {
                    ctrl: true,
                    ..Default::default()
                },
            })
        );
        translate(&mut state, EventType::KeyRelease(Key::ControlLeft), None);
        assert_eq!(state.modifiers(), Modifiers::default());
    }

    #[test]
    fn modifier_stays_held_until_both_sides_are_released() {
        let mut state = ModifierState::default();
        translate(&mut state, EventType::KeyPress(Key::ControlLeft), None);
        translate(&mut state, EventType::KeyPress(Key::ControlRight), None);
        translate(&mut state, EventType::KeyRelease(Key::ControlLeft), None);

        let shortcut = translate(&mut state, EventType::KeyPress(Key::KeyV), Some("v".into()));
        assert_eq!(
            shortcut,
            Some(InputEvent::KeyPress {
                key: "v".into(),
                modifiers: Modifiers {
                    ctrl: true,
                    ..Default::default()
                },
            })
        );
        assert!(!shortcut.is_some_and(|event| event.is_qualifying()));

        translate(&mut state, EventType::KeyRelease(Key::ControlRight), None);
        assert!(!state.modifiers().any());
    }

    #[test]
    fn clicks_count_once() {
        let mut state = ModifierState::default();
        assert_eq!(
            translate(&mut state, EventType::ButtonPress(Button::Left), None),
            Some(InputEvent::PointerClick)
        );
        assert_eq!(translate(&mut state, EventType::ButtonRelease(Button::Left), None), None);
    }
}
