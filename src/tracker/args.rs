use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Args;
use tracing::level_filters::LevelFilter;

use crate::{report::http::DEFAULT_ENDPOINT, source::InputKind};

use super::{TrackerConfig, DEFAULT_IDLE_THRESHOLD_MS, DEFAULT_INTERVAL_MS, DEFAULT_WINDOW_TITLE};

#[derive(Args, Debug)]
pub struct TrackerArgs {
    /// Identifier reports are sent for. Without it nothing is reported.
    #[arg(long = "employee-id", env = "ACTIVITYBEAT_EMPLOYEE_ID")]
    pub employee_id: Option<String>,
    #[arg(long, env = "ACTIVITYBEAT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
    #[arg(long = "interval-ms", default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval_ms: u64,
    #[arg(long = "idle-threshold-ms", default_value_t = DEFAULT_IDLE_THRESHOLD_MS)]
    pub idle_threshold_ms: u64,
    #[arg(long = "window-title", default_value = DEFAULT_WINDOW_TITLE)]
    pub window_title: String,
    /// Where input comes from: `stdin` (JSON lines) or `desktop`.
    #[arg(long, default_value_t = InputKind::default_for_build())]
    pub input: InputKind,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    pub dir: Option<PathBuf>,
    /// Don't render the dashboard to the terminal.
    #[arg(long)]
    pub quiet: bool,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}

impl From<&TrackerArgs> for TrackerConfig {
    fn from(args: &TrackerArgs) -> Self {
        TrackerConfig {
            employee_id: args
                .employee_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(Arc::from),
            endpoint: args.endpoint.clone(),
            interval: Duration::from_millis(args.interval_ms),
            idle_threshold: Duration::from_millis(args.idle_threshold_ms),
            window_title: args.window_title.as_str().into(),
            input: args.input,
            quiet: args.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use crate::source::InputKind;

    use super::{TrackerArgs, TrackerConfig};

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: TrackerArgs,
    }

    #[test]
    fn defaults_match_reference_timings() {
        let cli = TestCli::parse_from(["activitybeat", "--employee-id", "7"]);
        let config = TrackerConfig::from(&cli.args);
        assert_eq!(config.interval, Duration::from_secs(15));
        assert_eq!(config.idle_threshold, Duration::from_secs(60));
        assert_eq!(config.employee_id.as_deref(), Some("7"));
        assert_eq!(config.endpoint, "http://localhost:5000/api/log-activity");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_identifier_counts_as_missing() {
        let cli = TestCli::parse_from(["activitybeat", "--employee-id", "  "]);
        assert_eq!(TrackerConfig::from(&cli.args).employee_id, None);
    }

    #[test]
    fn parses_overrides() {
        let cli = TestCli::parse_from([
            "activitybeat",
            "--interval-ms",
            "30000",
            "--input",
            "stdin",
            "--quiet",
        ]);
        let config = TrackerConfig::from(&cli.args);
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.input, InputKind::Stdin);
        assert!(config.quiet);
    }
}
