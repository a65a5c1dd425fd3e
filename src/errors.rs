//! The kernel's narrow error taxonomy.
//!
//! `simulate_interval` and every control-API call are total: out-of-range
//! input is clamped, rerouted, or logged, never propagated. `Error` only
//! surfaces from construction-time roster loading and from the optional
//! CLI binary's startup path.

use std::fmt;

#[derive(Debug)]
pub enum ValidationError {
    InvalidData(String),
    InvalidId(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidData(msg) => write!(f, "Invalid data: {msg}"),
            Self::InvalidId(id) => write!(f, "Invalid ID: {id}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A configuration value that was out of range and got clamped rather than
/// rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug)]
pub enum Error {
    Validation(ValidationError),
    /// A flight roster CSV could not be read or parsed at all (not a
    /// single bad row — those are logged and skipped).
    RosterLoad(String),
    LogConfig(String),
    Other(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "Validation error: {e}"),
            Self::RosterLoad(msg) => write!(f, "Failed to load flight roster: {msg}"),
            Self::LogConfig(msg) => write!(f, "Logging configuration error: {msg}"),
            Self::Other(e) => write!(f, "Other error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Other(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::RosterLoad(error.to_string())
    }
}
