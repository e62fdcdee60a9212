//! Error types for the IVR statistics browser

use chrono::NaiveDate;
use std::{error::Error as StdError, fmt};

/// Main error type for the IVR statistics browser
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Backing query or connection failure
    Database(String),

    /// Date range whose end falls before its start
    InvalidDateRange {
        /// Requested first day
        start: NaiveDate,
        /// Requested last day
        end: NaiveDate,
    },

    /// Date filter requested without both bounds
    IncompleteDateRange,

    /// Location that is not in the harvested location list
    UnknownLocation {
        /// Requested location
        location: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new validation error
    #[must_use]
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by user input rather than a system fault
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidDateRange { .. }
                | Self::IncompleteDateRange
                | Self::UnknownLocation { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "End date {end} comes before start date {start}")
            }
            Self::IncompleteDateRange => {
                write!(f, "Please choose a start and end date to filter statistics on")
            }
            Self::UnknownLocation { location } => write!(f, "Unknown location: {location}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

// From implementations for automatic conversions
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}
