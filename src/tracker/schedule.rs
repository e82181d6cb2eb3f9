use std::time::Duration;

use tokio::time::Instant;

/// Recurring accounting tick. It only has a deadline while started, so a stopped schedule can
/// never fire.
#[derive(Debug)]
pub struct TickSchedule {
    period: Duration,
    next: Option<Instant>,
}

impl TickSchedule {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// (Re)starts the schedule, first tick one full period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Moves to the next deadline after a tick fired. Missed ticks are not replayed, a late tick
    /// pushes the following one a full period out.
    pub fn advance(&mut self, now: Instant) {
        if let Some(next) = self.next {
            let following = next + self.period;
            self.next = Some(if following <= now {
                now + self.period
            } else {
                following
            });
        }
    }
}
