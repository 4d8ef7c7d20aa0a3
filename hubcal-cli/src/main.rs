mod commands;
mod dates;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hubcal_core::config::HubCalConfig;
use hubcal_core::store::JsonFileStore;
use hubcal_core::view::{Step, ViewMode};
use tracing_subscriber::EnvFilter;

use commands::config::ConfigChanges;
use commands::fields::{EventDetails, UpdateFields};

#[derive(Parser)]
#[command(name = "hubcal")]
#[command(about = "View your calendar and manage its events, recurring ones included")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month, week or day view
    View {
        /// View mode (month, week or day); defaults to the configured view
        #[arg(short, long)]
        mode: Option<ViewMode>,

        /// Date the view is anchored on (YYYY-MM-DD, "today", "next friday", ...)
        #[arg(short, long)]
        date: Option<String>,

        /// Move one view back from the anchor
        #[arg(long, conflicts_with = "next")]
        prev: bool,

        /// Move one view forward from the anchor
        #[arg(long)]
        next: bool,
    },
    /// Show the events of a single day
    Day {
        /// Day to show (defaults to today)
        date: Option<String>,
    },
    /// Show events between two dates
    Range {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Last day (YYYY-MM-DD); defaults to `from`
        #[arg(long)]
        to: Option<String>,
    },
    /// Create an event
    Add {
        title: String,

        /// First day of the event (YYYY-MM-DD or natural language)
        #[arg(short, long)]
        start: String,

        #[command(flatten)]
        details: EventDetails,
    },
    /// Update an event; an occurrence id updates its whole series
    Update {
        /// Event id or occurrence id
        id: String,

        #[command(flatten)]
        fields: UpdateFields,
    },
    /// Delete an event; an occurrence id deletes its whole series
    Delete {
        /// Event id or occurrence id
        id: String,
    },
    /// Show file paths and settings, or change settings
    Config {
        #[command(flatten)]
        changes: ConfigChanges,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = HubCalConfig::load().context("Could not load configuration")?;
    init_logging(&config.log_level);

    let data_path = config.data_path();
    let mut store = JsonFileStore::open(&data_path)
        .with_context(|| format!("Could not open event store at {}", data_path.display()))?;

    match cli.command {
        Commands::View {
            mode,
            date,
            prev,
            next,
        } => {
            let step = match (prev, next) {
                (true, _) => Some(Step::Previous),
                (_, true) => Some(Step::Next),
                _ => None,
            };
            commands::view::run(&store, &config, mode, date.as_deref(), step)
        }
        Commands::Day { date } => commands::view::run_day(&store, &config, date.as_deref()),
        Commands::Range { from, to } => {
            commands::view::run_range(&store, &config, &from, to.as_deref())
        }
        Commands::Add {
            title,
            start,
            details,
        } => commands::add::run(&mut store, &config.owner, title, &start, details),
        Commands::Update { id, fields } => commands::update::run(&mut store, &id, fields),
        Commands::Delete { id } => commands::delete::run(&mut store, &id),
        Commands::Config { changes } => commands::config::run(&store, &config, changes),
    }
}

/// Log to stderr so agenda output stays clean.
/// HUBCAL_LOG wins over RUST_LOG, which wins over the config's `log_level`.
fn init_logging(config_level: &str) {
    let filter = EnvFilter::try_from_env("HUBCAL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
