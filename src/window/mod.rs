//! Reads the title of the foreground window. [create_window_reader] picks the platform reader the
//! same way input sources are picked, and [watch_active_window] turns its readings into
//! [TrackerEvent::TitleChanged] events.

#[cfg(feature = "win")]
pub mod win;
#[cfg(feature = "x11")]
pub mod x11;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{
    select,
    sync::mpsc,
    time::{interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::tracker::{accountant::UNKNOWN_WINDOW_TITLE, input::TrackerEvent};

pub const WINDOW_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Contract the platform window readers implement.
#[cfg_attr(test, mockall::automock)]
pub trait ActiveWindowReader: Send {
    /// Title of the window that currently has focus. An empty title is a valid answer, it means
    /// no application window is focused.
    fn active_window_title(&mut self) -> Result<String>;
}

/// Reader for the platform this binary was built for, if any.
pub fn create_window_reader() -> Result<Option<Box<dyn ActiveWindowReader>>> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "win")] {
            Ok(Some(Box::new(win::WindowsWindowReader)))
        } else if #[cfg(feature = "x11")] {
            Ok(Some(Box::new(x11::X11WindowReader::new()?)))
        } else {
            Ok(None)
        }
    }
}

fn read_title(reader: &mut dyn ActiveWindowReader) -> Arc<str> {
    match reader.active_window_title() {
        Ok(title) => title.into(),
        Err(e) => {
            debug!("Failed to read the active window {e:?}");
            UNKNOWN_WINDOW_TITLE.into()
        }
    }
}

/// Polls `reader` every `period` and sends the title whenever it differs from the last one sent.
/// Runs until `shutdown` is cancelled or the tracker stops listening.
pub async fn watch_active_window(
    mut reader: Box<dyn ActiveWindowReader>,
    events: mpsc::Sender<TrackerEvent>,
    shutdown: CancellationToken,
    period: Duration,
) {
    let mut poll = interval(period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_sent: Option<Arc<str>> = None;
    info!("Watching the active window");

    loop {
        select! {
            _ = shutdown.cancelled() => return,
            _ = poll.tick() => {
                let title = read_title(reader.as_mut());
                if last_sent.as_deref() == Some(&*title) {
                    continue;
                }
                if events.send(TrackerEvent::TitleChanged(title.clone())).await.is_err() {
                    return;
                }
                last_sent = Some(title);
            }
        }
    }
}
