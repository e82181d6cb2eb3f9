use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};

use crate::{
    display::{
        render_device_id, render_productivity, render_report_log, render_session_start,
        render_session_time, render_telemetry, render_tracking_state, DisplaySurface,
    },
    report::{
        log::{ReportLog, ReportLogEntry},
        ActivityReport, ReportOutcome, ReportSink,
    },
    utils::clock::{sleep_until_opt, Clock},
};

use super::{
    accountant::{AccountantConfig, ActivityAccountant, TrackingState},
    input::TrackerEvent,
    schedule::TickSchedule,
};

pub const SESSION_TIMER_PERIOD: Duration = Duration::from_secs(1);

/// Event loop of the tracker. Input, accounting ticks, report completions and the session timer
/// all run as arms of one loop, so none of them ever interleave.
pub struct TrackerModule<D> {
    accountant: ActivityAccountant,
    schedule: TickSchedule,
    events: mpsc::Receiver<TrackerEvent>,
    sink: Arc<dyn ReportSink>,
    outcome_sender: mpsc::UnboundedSender<ReportOutcome>,
    outcomes: mpsc::UnboundedReceiver<ReportOutcome>,
    report_log: ReportLog,
    display: D,
    device_fingerprint: String,
    shutdown: CancellationToken,
    clock: Box<dyn Clock>,
}

impl<D: DisplaySurface> TrackerModule<D> {
    /// Creates the tracker with tracking already enabled and the first tick one interval away.
    pub fn new(
        config: AccountantConfig,
        events: mpsc::Receiver<TrackerEvent>,
        sink: Arc<dyn ReportSink>,
        display: D,
        device_fingerprint: String,
        shutdown: CancellationToken,
        clock: Box<dyn Clock>,
    ) -> Self {
        let now = clock.instant();
        let accountant = ActivityAccountant::new(config, clock.local_time(), now);
        let mut schedule = TickSchedule::new(accountant.interval());
        schedule.start(now);
        let (outcome_sender, outcomes) = mpsc::unbounded_channel();
        Self {
            accountant,
            schedule,
            events,
            sink,
            outcome_sender,
            outcomes,
            report_log: ReportLog::default(),
            display,
            device_fingerprint,
            shutdown,
            clock,
        }
    }

    /// Executes the tracker event loop until shutdown.
    pub async fn run(&mut self) -> Result<()> {
        self.render_initial();

        let mut timer_deadline = self.clock.instant() + SESSION_TIMER_PERIOD;
        let mut input_open = true;
        loop {
            let tick_deadline = self.schedule.deadline();
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Tracker stopped");
                    return Ok(());
                }
                event = self.events.recv(), if input_open => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        info!("All input sources are closed");
                        input_open = false;
                    }
                },
                _ = sleep_until_opt(self.clock.as_ref(), tick_deadline) => self.on_tick(),
                Some(outcome) = self.outcomes.recv() => self.on_report_outcome(outcome),
                _ = self.clock.sleep_until(timer_deadline) => {
                    timer_deadline += SESSION_TIMER_PERIOD;
                    self.render_session_timer();
                }
            }
        }
    }

    pub fn handle_event(&mut self, event: TrackerEvent) {
        match event {
            TrackerEvent::Input(input) => {
                self.accountant.record_input(&input, self.clock.instant());
            }
            TrackerEvent::TitleChanged(title) => {
                debug!("Window title changed to {title}");
                self.accountant.set_window_title(title);
            }
            TrackerEvent::Toggle => {
                self.toggle();
            }
        }
    }

    /// Flips tracking and starts or stops the tick schedule accordingly.
    pub fn toggle(&mut self) -> TrackingState {
        let now = self.clock.instant();
        let state = self.accountant.toggle(now);
        match state {
            TrackingState::Enabled => self.schedule.start(now),
            TrackingState::Disabled => self.schedule.stop(),
        }
        render_tracking_state(&mut self.display, state);
        self.display.commit();
        state
    }

    fn on_tick(&mut self) {
        let now = self.clock.instant();
        self.schedule.advance(now);
        if let Some(report) = self.accountant.tick(now) {
            info!(
                mouse = report.mouse_activity,
                keyboard = report.keyboard_activity,
                idle = report.idle_time,
                "Interval closed"
            );
            self.dispatch(report);
        }
    }

    /// Sends the report in a detached task. Its outcome comes back through `outcomes`, the loop
    /// never waits for it.
    fn dispatch(&self, report: ActivityReport) {
        let sink = Arc::clone(&self.sink);
        let outcomes = self.outcome_sender.clone();
        let span = info_span!("Reporting activity", employee = %report.employee_id);
        tokio::spawn(
            async move {
                let response = sink.submit(&report).await;
                // Only fails once the loop has stopped, then nobody needs the outcome.
                let _ = outcomes.send(ReportOutcome { report, response });
            }
            .instrument(span),
        );
    }

    fn on_report_outcome(&mut self, outcome: ReportOutcome) {
        match outcome.response {
            Ok(response) => {
                info!("Activity logged {response}");
                self.report_log
                    .push(ReportLogEntry::new(&outcome.report, self.clock.local_time()));
                render_report_log(&mut self.display, &self.report_log);
                render_productivity(&mut self.display, self.accountant.productivity());
                self.render_telemetry();
                self.display.commit();
            }
            Err(e) => error!("Error logging activity {e:?}"),
        }
    }

    fn render_initial(&mut self) {
        render_session_start(&mut self.display, self.accountant.session().started);
        render_device_id(&mut self.display, &self.device_fingerprint);
        render_tracking_state(&mut self.display, self.accountant.state());
        render_session_time(&mut self.display, Duration::ZERO);
        self.display.commit();
    }

    fn render_telemetry(&mut self) {
        render_telemetry(
            &mut self.display,
            self.accountant.counters(),
            self.accountant.session().idle_seconds,
            self.accountant.window_title(),
        );
    }

    fn render_session_timer(&mut self) {
        let elapsed = self.accountant.session().elapsed(self.clock.instant());
        render_session_time(&mut self.display, elapsed);
        self.display.commit();
    }

    pub fn accountant(&self) -> &ActivityAccountant {
        &self.accountant
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    pub fn report_log(&self) -> &ReportLog {
        &self.report_log
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}
