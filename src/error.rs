//! Error types for iploc.

use thiserror::Error;

/// Error type for iploc operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed CIDR text in a blocks record
    #[error("invalid network prefix: {0}")]
    InvalidPrefix(String),

    /// Query input that is not an IPv4 address
    #[error("invalid IPv4 address: {0}")]
    InvalidAddress(String),

    /// A parsed database file contained no data rows
    #[error("empty {0} table")]
    EmptyTable(&'static str),

    /// A locations record is missing the display-name column
    #[error("locations record has no column {0}")]
    MissingColumn(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Zip archive error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Database download error
    #[error("download error: {0}")]
    Download(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for iploc operations.
pub type Result<T> = std::result::Result<T, Error>;
