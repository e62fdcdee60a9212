//! FreePBX IVR statistics browser
//!
//! Loads the IVR call log once from the FreePBX database and lets the user
//! filter it by location and date range.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

mod render;
mod shell;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ivrstats_core::{Command, Config, DateFields, LocationFilter, Session, store};
use ivrstats_database::Database;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

/// Command line interface for the IVR statistics browser
#[derive(Parser)]
#[command(
    name = "ivr-stats",
    version = env!("CARGO_PKG_VERSION"),
    about = "FreePBX IVR call statistics",
    long_about = "Loads the IVR call log from a FreePBX database and shows it filtered by location and date range, with totals of abandoned and IVR-terminated calls."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format (json, pretty); overrides the config file
    #[arg(long)]
    log_format: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Location and date filter options
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Location to show (defaults to all locations)
    #[arg(short = 'L', long)]
    location: Option<String>,

    /// First day to show, YYYY-MM-DD
    #[arg(short, long, value_name = "DATE")]
    start: Option<String>,

    /// Last day to show, YYYY-MM-DD
    #[arg(short, long, value_name = "DATE")]
    end: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Print the filtered call table and totals
    List(FilterArgs),

    /// Print only the totals for the filter
    Summary(FilterArgs),

    /// List the locations offered by the location filter
    Locations,

    /// Browse interactively
    Shell,

    /// Show or validate configuration
    Config {
        /// Show resolved configuration
        #[arg(short, long)]
        show: bool,

        /// Validate configuration
        #[arg(short, long)]
        validate: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        // It's okay if .env doesn't exist
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    ivrstats_core::init_logging(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "IVR statistics starting");

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::List(filter) => {
            with_session(&config, |session| {
                list(session, &filter, true, &mut io::stdout().lock())
            })
            .await
        }
        Commands::Summary(filter) => {
            with_session(&config, |session| {
                list(session, &filter, false, &mut io::stdout().lock())
            })
            .await
        }
        Commands::Locations => {
            with_session(&config, |session| {
                let mut out = io::stdout().lock();
                for entry in session.selector_entries() {
                    writeln!(out, "{entry}")?;
                }
                Ok(())
            })
            .await
        }
        Commands::Shell => {
            with_session(&config, |session| {
                let mut browser = shell::Shell::new(session);
                writeln!(io::stdout(), "{}", shell::HELP)?;
                browser
                    .run(io::stdin().lock(), &mut io::stdout(), &mut io::stderr())
                    .context("Shell I/O failed")
            })
            .await
        }
        Commands::Config { show, validate } => handle_config_command(&config, show, validate),
    }
}

/// Open the database, load the session, run `action`, then close the connection
///
/// A failed load is reported and `action` runs over an empty session.
async fn with_session<F>(config: &Config, action: F) -> anyhow::Result<()>
where
    F: FnOnce(Session) -> anyhow::Result<()>,
{
    let database = match Database::new(config).await {
        Ok(database) => Some(database),
        Err(e) => {
            error!(error = %e, "Could not connect to database");
            eprintln!("{e}");
            None
        }
    };

    let session = match &database {
        Some(database) => match store::load(database).await {
            Ok(data) => Session::from(data),
            Err(e) => {
                eprintln!("{e}");
                Session::empty()
            }
        },
        None => Session::empty(),
    };

    let result = action(session);

    if let Some(database) = database {
        database.close().await;
    }
    result
}

/// Apply the command-line filter and print the result to `out`
///
/// A rejected filter fails the whole command and nothing is printed.
fn list<W: Write>(
    mut session: Session,
    filter: &FilterArgs,
    table: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    if let Some(command) = filter_command(filter) {
        session.handle(command).context("Filter rejected")?;
    }

    if table {
        render::write_table(out, session.visible())?;
    }
    render::write_summary(out, &session.summary())?;
    Ok(())
}

/// Map command-line filter options onto a session command
fn filter_command(filter: &FilterArgs) -> Option<Command> {
    let location = LocationFilter::from(filter.location.as_deref());

    if filter.start.is_some() || filter.end.is_some() {
        let dates = DateFields::new(
            filter.start.clone().unwrap_or_default(),
            filter.end.clone().unwrap_or_default(),
        );
        Some(Command::ApplyDateFilter { location, dates })
    } else if filter.location.is_some() {
        Some(Command::LocationChanged {
            location,
            dates: DateFields::default(),
        })
    } else {
        None
    }
}

/// Handle configuration commands
fn handle_config_command(config: &Config, show: bool, validate: bool) -> anyhow::Result<()> {
    if validate {
        config.ensure_valid()?;
        info!("Configuration validation completed");
        println!("Configuration is valid");
    }

    if show {
        let config_toml =
            toml::to_string_pretty(config).context("Failed to serialize configuration")?;
        println!("{config_toml}");
    }

    Ok(())
}
