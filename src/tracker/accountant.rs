use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{report::ActivityReport, utils::productivity::ProductivityScore};

use super::{idle::IdleEvaluator, input::InputEvent};

pub const FALLBACK_WINDOW_TITLE: &str = "Desktop or Minimized Application";
/// Reported when the foreground window could not be read at all.
pub const UNKNOWN_WINDOW_TITLE: &str = "System Error or Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Enabled,
    Disabled,
}

impl TrackingState {
    pub fn is_enabled(self) -> bool {
        matches!(self, TrackingState::Enabled)
    }

    fn flipped(self) -> Self {
        match self {
            TrackingState::Enabled => TrackingState::Disabled,
            TrackingState::Disabled => TrackingState::Enabled,
        }
    }
}

/// Raw input counted since the last tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalCounters {
    pub mouse: u64,
    pub keystrokes: u64,
}

impl IntervalCounters {
    fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> u64 {
        self.mouse + self.keystrokes
    }
}

/// Cumulative totals of the running session.
///
/// `active` grows by raw event counts while `idle` grows by seconds. The two are mixed in the
/// productivity score as they are.
#[derive(Debug, Clone)]
pub struct Session {
    pub started: DateTime<Local>,
    pub started_instant: Instant,
    pub active: u64,
    pub idle_seconds: u64,
}

impl Session {
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_instant)
    }
}

#[derive(Debug, Clone)]
pub struct AccountantConfig {
    pub employee_id: Option<Arc<str>>,
    pub interval: Duration,
    pub idle_evaluator: IdleEvaluator,
    pub window_title: Arc<str>,
}

/// Counts input, turns each interval into an idle or active verdict and accumulates session totals.
///
/// The accountant is purely synchronous. Scheduling of ticks and delivery of reports live in
/// [TrackerModule](super::runner::TrackerModule).
#[derive(Debug)]
pub struct ActivityAccountant {
    employee_id: Option<Arc<str>>,
    interval: Duration,
    idle_evaluator: IdleEvaluator,
    state: TrackingState,
    counters: IntervalCounters,
    last_activity: Instant,
    session: Session,
    window_title: Arc<str>,
}

impl ActivityAccountant {
    /// Starts a session in the enabled state with the activity clock set to `now`.
    pub fn new(config: AccountantConfig, started: DateTime<Local>, now: Instant) -> Self {
        Self {
            employee_id: config.employee_id,
            interval: config.interval,
            idle_evaluator: config.idle_evaluator,
            state: TrackingState::Enabled,
            counters: IntervalCounters::default(),
            last_activity: now,
            session: Session {
                started,
                started_instant: now,
                active: 0,
                idle_seconds: 0,
            },
            window_title: normalize_title(config.window_title),
        }
    }

    /// Counts a single input event. Returns whether it was counted.
    pub fn record_input(&mut self, event: &InputEvent, now: Instant) -> bool {
        if !self.state.is_enabled() || !event.is_qualifying() {
            return false;
        }
        match event {
            InputEvent::PointerMove | InputEvent::PointerClick => self.counters.mouse += 1,
            InputEvent::KeyPress { .. } => self.counters.keystrokes += 1,
        }
        self.last_activity = now;
        true
    }

    /// Closes the current interval. Produces the report to send, or nothing when tracking is off
    /// or there is nobody to report for. In the latter case the counters keep accumulating.
    pub fn tick(&mut self, now: Instant) -> Option<ActivityReport> {
        if !self.state.is_enabled() {
            debug!("Tracking is disabled, skipping tick");
            return None;
        }
        let Some(employee_id) = self.employee_id.clone() else {
            debug!("No employee identifier configured, skipping tick");
            return None;
        };

        let gap = now.saturating_duration_since(self.last_activity);
        let idle_time = if self.idle_evaluator.is_idle(gap) {
            self.interval.as_secs()
        } else {
            0
        };

        let report = ActivityReport {
            employee_id,
            mouse_activity: self.counters.mouse,
            keyboard_activity: self.counters.keystrokes,
            idle_time,
            active_window_title: self.window_title.clone(),
        };

        self.session.active += self.counters.total();
        self.session.idle_seconds += idle_time;
        self.counters.reset();

        Some(report)
    }

    /// Flips tracking on or off and returns the new state.
    pub fn toggle(&mut self, now: Instant) -> TrackingState {
        self.state = self.state.flipped();
        match self.state {
            TrackingState::Enabled => {
                self.last_activity = now;
                info!("Tracking enabled");
            }
            TrackingState::Disabled => {
                self.counters.reset();
                info!("Tracking disabled");
            }
        }
        self.state
    }

    pub fn set_window_title(&mut self, title: Arc<str>) {
        self.window_title = normalize_title(title);
    }

    pub fn productivity(&self) -> ProductivityScore {
        ProductivityScore::from_totals(self.session.active, self.session.idle_seconds)
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn counters(&self) -> IntervalCounters {
        self.counters
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    pub fn window_title(&self) -> &Arc<str> {
        &self.window_title
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

fn normalize_title(title: Arc<str>) -> Arc<str> {
    if title.trim().is_empty() {
        FALLBACK_WINDOW_TITLE.into()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use chrono::Local;
    use tokio::time::Instant;

    use crate::tracker::{
        idle::IdleEvaluator,
        input::{InputEvent, Modifiers},
    };

    use super::{
        AccountantConfig, ActivityAccountant, IntervalCounters, TrackingState,
        FALLBACK_WINDOW_TITLE,
    };

    const INTERVAL: Duration = Duration::from_secs(15);

    fn accountant_with(employee_id: Option<&str>, start: Instant) -> ActivityAccountant {
        ActivityAccountant::new(
            AccountantConfig {
                employee_id: employee_id.map(Arc::from),
                interval: INTERVAL,
                idle_evaluator: IdleEvaluator::from_millis(60_000),
                window_title: "Dashboard".into(),
            },
            Local::now(),
            start,
        )
    }

    fn accountant(start: Instant) -> ActivityAccountant {
        accountant_with(Some("42"), start)
    }

    fn key(key: &str) -> InputEvent {
        InputEvent::KeyPress {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn counts_pointer_and_keys_separately() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        assert!(accountant.record_input(&InputEvent::PointerMove, start));
        assert!(accountant.record_input(&InputEvent::PointerClick, start));
        assert!(accountant.record_input(&key("x"), start));
        assert_eq!(
            accountant.counters(),
            IntervalCounters {
                mouse: 2,
                keystrokes: 1
            }
        );
    }

    #[test]
    fn filtered_keys_leave_counters_and_clock_alone() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        let later = start + secs(5);
        let shortcut = InputEvent::KeyPress {
            key: "s".into(),
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
        };
        assert!(!accountant.record_input(&shortcut, later));
        assert!(!accountant.record_input(&key("Tab"), later));
        assert_eq!(accountant.counters(), IntervalCounters::default());
        assert_eq!(accountant.last_activity(), start);
    }

    #[test]
    fn tick_reports_and_resets_counters() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        for _ in 0..3 {
            accountant.record_input(&InputEvent::PointerMove, start + secs(1));
        }
        accountant.record_input(&key("a"), start + secs(2));

        let report = accountant.tick(start + INTERVAL).unwrap();
        assert_eq!(&*report.employee_id, "42");
        assert_eq!(report.mouse_activity, 3);
        assert_eq!(report.keyboard_activity, 1);
        assert_eq!(report.idle_time, 0);
        assert_eq!(&*report.active_window_title, "Dashboard");
        assert_eq!(accountant.counters(), IntervalCounters::default());
        assert_eq!(accountant.session().active, 4);
        assert_eq!(accountant.session().idle_seconds, 0);
    }

    #[test]
    fn long_gap_makes_whole_interval_idle() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        // Exactly at the threshold is still active.
        assert_eq!(accountant.tick(start + secs(60)).unwrap().idle_time, 0);
        let report = accountant.tick(start + secs(75)).unwrap();
        assert_eq!(report.idle_time, 15);
        assert_eq!(accountant.session().idle_seconds, 15);
    }

    #[test]
    fn recent_input_keeps_interval_active() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        accountant.record_input(&InputEvent::PointerClick, start + secs(70));
        assert_eq!(accountant.tick(start + secs(75)).unwrap().idle_time, 0);
    }

    #[test]
    fn totals_never_decrease() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        let mut previous = (0, 0);
        for i in 1..=12u64 {
            let now = start + INTERVAL * u32::try_from(i).unwrap();
            if i % 3 == 0 {
                accountant.record_input(&key("k"), now);
            }
            accountant.tick(now);
            let session = accountant.session();
            assert!(session.active >= previous.0);
            assert!(session.idle_seconds >= previous.1);
            previous = (session.active, session.idle_seconds);
        }
    }

    #[test]
    fn missing_identifier_skips_tick_without_reset() {
        let start = Instant::now();
        let mut accountant = accountant_with(None, start);
        accountant.record_input(&InputEvent::PointerMove, start);
        accountant.record_input(&key("q"), start);
        assert!(accountant.tick(start + INTERVAL).is_none());
        assert_eq!(accountant.counters().total(), 2);
        assert_eq!(accountant.session().active, 0);
    }

    #[test]
    fn disabled_tracking_ignores_input_and_ticks() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        accountant.record_input(&InputEvent::PointerMove, start);
        assert_eq!(accountant.toggle(start + secs(1)), TrackingState::Disabled);
        assert_eq!(accountant.counters(), IntervalCounters::default());

        assert!(!accountant.record_input(&InputEvent::PointerMove, start + secs(2)));
        assert_eq!(accountant.last_activity(), start);
        assert!(accountant.tick(start + secs(100)).is_none());
        assert_eq!(accountant.session().active, 0);
        assert_eq!(accountant.session().idle_seconds, 0);
    }

    #[test]
    fn re_enabling_resets_activity_clock() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        accountant.toggle(start);
        let resumed = start + secs(600);
        assert_eq!(accountant.toggle(resumed), TrackingState::Enabled);
        assert_eq!(accountant.last_activity(), resumed);
        assert_eq!(accountant.tick(resumed + INTERVAL).unwrap().idle_time, 0);
    }

    #[test]
    fn productivity_follows_totals() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        assert_eq!(accountant.productivity().value(), 0);
        for _ in 0..15 {
            accountant.record_input(&InputEvent::PointerMove, start);
        }
        accountant.tick(start + secs(15));
        // 15 events, then one idle interval of 15 seconds.
        accountant.tick(start + secs(90));
        assert_eq!(accountant.session().active, 15);
        assert_eq!(accountant.session().idle_seconds, 15);
        assert_eq!(accountant.productivity().value(), 50);
    }

    #[test]
    fn empty_title_falls_back() {
        let start = Instant::now();
        let mut accountant = accountant(start);
        accountant.set_window_title("  ".into());
        assert_eq!(&**accountant.window_title(), FALLBACK_WINDOW_TITLE);
        accountant.set_window_title("Spreadsheet".into());
        assert_eq!(&**accountant.window_title(), "Spreadsheet");
    }
}
