use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use tokio::time::Instant;

/// Source of wall-clock dates and monotonic instants for the tracker. Everything that needs "now"
/// goes through this, so tests can run on paused tokio time.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);

    /// Wall-clock time in the local timezone, used for everything shown to the user.
    fn local_time(&self) -> DateTime<Local> {
        self.time().with_timezone(&Local)
    }
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}

/// Sleeps until `deadline` if there is one, otherwise never completes.
pub async fn sleep_until_opt(clock: &dyn Clock, deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => clock.sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
