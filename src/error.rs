//! Error types for tascan

use thiserror::Error;

/// Main error type for tascan
#[derive(Error, Debug)]
pub enum TascanError {
    #[error("Not enough columns in CSV header")]
    NotEnoughColumns,

    #[error("No filename provided and none bound to the series")]
    NoFilename,

    #[error("Mismatched '{open}'/'{close}' delimiters in script: {script}")]
    MismatchedDelimiters {
        open: char,
        close: char,
        script: String,
    },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for tascan operations
pub type Result<T> = std::result::Result<T, TascanError>;
