use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    tracker::{args::TrackerArgs, start_tracker, TrackerConfig},
    utils::{
        dir::{create_application_default_path, ensure_dir},
        fingerprint::{device_fingerprint, environment_identity},
        logging::{enable_logging, AGENT_PREFIX},
        productivity::{parse_total, ProductivityScore},
        runtime::single_thread_runtime,
    },
};

#[derive(Parser, Debug)]
#[command(name = "activitybeat", version, long_about = None)]
#[command(about = "Activity heartbeat: counts input, detects idle intervals and reports them")]
struct Args {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start tracking activity and reporting it every interval")]
    Run {
        #[command(flatten)]
        args: TrackerArgs,
    },
    #[command(about = "Print the device fingerprint shown on the dashboard")]
    Fingerprint {
        #[arg(long, help = "Identity string to hash instead of the one of this machine")]
        identity: Option<String>,
    },
    #[command(about = "Compute the productivity score of a session from its totals")]
    Score {
        #[arg(value_parser = parse_total)]
        active: u64,
        #[arg(value_parser = parse_total)]
        idle: u64,
    },
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    match args.commands {
        Commands::Run { args } => {
            let app_dir = match args.dir.clone() {
                Some(dir) => ensure_dir(dir)?,
                None => create_application_default_path()?,
            };
            let logging_level = args.log.or(args.log_console.then_some(LevelFilter::DEBUG));
            enable_logging(AGENT_PREFIX, &app_dir, logging_level, args.log_console)?;

            let config = TrackerConfig::from(&args);
            single_thread_runtime()?.block_on(start_tracker(config))
        }
        Commands::Fingerprint { identity } => {
            let identity = identity.unwrap_or_else(environment_identity);
            println!("{}", device_fingerprint(&identity));
            Ok(())
        }
        Commands::Score { active, idle } => {
            let score = ProductivityScore::from_totals(active, idle);
            println!("{score} ({})", score.tier());
            Ok(())
        }
    }
}
