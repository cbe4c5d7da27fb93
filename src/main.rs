use clap::{Parser, Subcommand};
use focus_tracker::commands;
use focus_tracker::config::AppConfig;
use focus_tracker::errors::AppResult;
use focus_tracker::persistence::StorageKind;
use focus_tracker::types::AggregationLevel;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::ExitCode;

/// Tracks time spent in the focused application and window.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory for stored logs (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Where the activity log is kept
    #[arg(long, value_enum, global = true, default_value_t = StorageKind::File)]
    storage: StorageKind,

    /// Identifier the activity log is stored under (one per device/session)
    #[arg(long, global = true)]
    log_key: Option<String>,

    /// Sampling interval in milliseconds
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Track the focused window until Ctrl+C or the session duration ends
    Run {
        /// Stop automatically after this many minutes
        #[arg(long)]
        duration_minutes: Option<u64>,
        /// Also write today's export text to this file
        #[arg(long)]
        export_file: Option<PathBuf>,
    },
    /// Show a usage summary for one day
    Stats {
        /// Day to summarize, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        day: Option<NaiveDate>,
        #[arg(long, value_enum, default_value_t = AggregationLevel::Detailed)]
        level: AggregationLevel,
    },
    /// Print one day's usage as "<app>: <window>: H:MM:SS" lines
    Export {
        /// Day to export, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        day: Option<NaiveDate>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> AppResult<()> {
    let app_config = AppConfig::resolve(cli.data_dir, cli.storage, cli.log_key, cli.interval_ms)?;

    match cli.command {
        Command::Run {
            duration_minutes,
            export_file,
        } => commands::run::execute(&app_config, duration_minutes, export_file.as_deref()),
        Command::Stats { day, level } => commands::stats::execute(&app_config, day, level),
        Command::Export { day } => commands::export::execute(&app_config, day),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
