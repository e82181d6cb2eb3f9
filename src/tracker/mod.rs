//! The tracker counts input, closes an accounting interval on every tick and reports it.
//! [start_tracker] wires an input source, the [runner::TrackerModule] event loop and the HTTP
//! report sink together.

use std::{sync::Arc, time::Duration};

use accountant::AccountantConfig;
use anyhow::{bail, Result};
use idle::IdleEvaluator;
use input::TrackerEvent;
use runner::TrackerModule;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    display::{console::ConsoleDisplay, headless::HeadlessDisplay, DisplaySurface},
    report::http::HttpReportSink,
    source::{create_input_source, InputKind},
    utils::{
        clock::DefaultClock,
        fingerprint::{device_fingerprint, environment_identity},
    },
};

pub mod accountant;
pub mod args;
pub mod idle;
pub mod input;
pub mod runner;
pub mod schedule;
pub mod signals;

pub const DEFAULT_INTERVAL_MS: u64 = 15_000;
pub const DEFAULT_IDLE_THRESHOLD_MS: u64 = 60_000;
pub const DEFAULT_WINDOW_TITLE: &str = "Activity Monitor";
const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub employee_id: Option<Arc<str>>,
    pub endpoint: String,
    pub interval: Duration,
    pub idle_threshold: Duration,
    pub window_title: Arc<str>,
    pub input: InputKind,
    pub quiet: bool,
}

impl TrackerConfig {
    /// Idle time is reported in whole seconds, so the interval has to be made of them.
    pub fn validate(&self) -> Result<()> {
        if self.interval < Duration::from_secs(1) {
            bail!("Interval must be at least one second, got {:?}", self.interval);
        }
        if self.interval.subsec_nanos() != 0 {
            bail!(
                "Interval must be a whole number of seconds, got {:?}",
                self.interval
            );
        }
        Ok(())
    }

    pub fn accountant_config(&self) -> AccountantConfig {
        AccountantConfig {
            employee_id: self.employee_id.clone(),
            interval: self.interval,
            idle_evaluator: IdleEvaluator::new(self.idle_threshold),
            window_title: self.window_title.clone(),
        }
    }
}

/// Represents the starting point for the tracker. Runs until Ctrl-C.
pub async fn start_tracker(config: TrackerConfig) -> Result<()> {
    config.validate()?;
    if config.employee_id.is_none() {
        warn!("No employee identifier configured, activity will be counted but not reported");
    }

    let (sender, receiver) = mpsc::channel::<TrackerEvent>(EVENT_BUFFER);
    let source = create_input_source(config.input)?;
    let sink = HttpReportSink::new(&config.endpoint)?;
    info!(
        "Reporting to {} every {:?} from {} input",
        sink.endpoint(),
        config.interval,
        config.input
    );

    let display: Box<dyn DisplaySurface> = if config.quiet {
        Box::new(HeadlessDisplay::full())
    } else {
        Box::new(ConsoleDisplay::new())
    };

    let shutdown_token = CancellationToken::new();
    let mut tracker = TrackerModule::new(
        config.accountant_config(),
        receiver,
        Arc::new(sink),
        display,
        device_fingerprint(&environment_identity()),
        shutdown_token.clone(),
        Box::new(DefaultClock),
    );

    let (_, _, source_result, tracker_result) = tokio::join!(
        signals::detect_shutdown(shutdown_token.clone()),
        signals::forward_toggle_signal(sender.clone(), shutdown_token.clone()),
        source.run(sender, shutdown_token.clone()),
        tracker.run(),
    );

    if let Err(source_result) = source_result {
        error!("Input source got an error {:?}", source_result);
    }

    tracker_result
}
