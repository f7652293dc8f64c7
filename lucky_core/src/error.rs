//! Error types for the lucky_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lucky_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet writer error
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reference table validation error
    #[error("Reference table validation error: {0}")]
    TableValidation(String),

    /// A date string could not be parsed or does not exist in the calendar
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Month outside 1-12, or a year/month pair with no calendar days
    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Lunar calendar conversion failed
    #[error("Lunar conversion error: {0}")]
    Lunar(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
