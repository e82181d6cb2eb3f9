use futures::{Stream, StreamExt};
use tokio::{select, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::input::TrackerEvent;

/// Cancels `cancelation` on Ctrl-C.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}

/// Turns `SIGUSR1` into a tracking toggle. Other platforms have no equivalent, there it only waits
/// for shutdown.
pub async fn forward_toggle_signal(events: mpsc::Sender<TrackerEvent>, shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        use tokio_stream::wrappers::SignalStream;

        match signal(SignalKind::user_defined1()) {
            Ok(toggles) => forward_toggles(SignalStream::new(toggles), events, shutdown).await,
            Err(e) => {
                warn!("Can't listen for toggle signals {e:?}");
                shutdown.cancelled().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        drop(events);
        warn!("Toggle signals are not supported on this platform");
        shutdown.cancelled().await;
    }
}

/// Sends a toggle for every item of `toggles` until shutdown, the end of `toggles` or the tracker
/// going away.
#[cfg_attr(not(unix), allow(dead_code))]
async fn forward_toggles(
    toggles: impl Stream<Item = ()>,
    events: mpsc::Sender<TrackerEvent>,
    shutdown: CancellationToken,
) {
    let mut toggles = std::pin::pin!(toggles);
    loop {
        select! {
            _ = shutdown.cancelled() => return,
            received = toggles.next() => {
                if received.is_none() || events.send(TrackerEvent::Toggle).await.is_err() {
                    return;
                }
                info!("Toggle requested");
            }
        }
    }
}
