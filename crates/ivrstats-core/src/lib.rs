//! Core types, formatting and filtering for the IVR statistics browser
//!
//! The call log is loaded once into a [`RecordStore`]; a [`Session`] keeps
//! the current location and date filter and the view derived from it.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod session;
pub mod store;
pub mod summary;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use filter::{DateRange, RecordFilter, filter_records};
pub use session::{Command, DateFields, Session};
pub use store::{CallLogSource, LoadedData, RecordStore};
pub use summary::CallSummary;
pub use types::{ALL_LOCATIONS, CallRecord, LocationFilter, Outcome};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns an error if the configured format is unknown or a global
/// subscriber is already installed.
pub fn init_logging(logging: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        other => {
            return Err(Error::Configuration {
                message: format!("Unknown log format: {other}"),
            });
        }
    };

    result.map_err(|e| Error::Other(format!("Failed to initialize logging: {e}")))
}
