//! Error types for the data-loader crate.
//!
//! Every variant here is a load-integrity failure: the dataset either loads
//! completely and validates, or startup fails. Nothing in this module is
//! raised once a [`Dataset`](crate::Dataset) exists.

use thiserror::Error;

use crate::types::GameId;

/// Errors that can occur during data loading, parsing and validation
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The games table is not well-formed CSV
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// An index or notes file is not well-formed JSON
    #[error("JSON error in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Row or entry in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// An index file lists something that is not a game id
    #[error("Invalid game id {value:?} under key {key:?} in {file}")]
    InvalidId {
        file: String,
        key: String,
        value: String,
    },

    /// A release index key is not a valid year or month
    #[error("Invalid {what} key {key:?} in {file}")]
    InvalidKey {
        file: String,
        what: &'static str,
        key: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field} of game {id}: {value}")]
    InvalidValue {
        field: String,
        id: GameId,
        value: String,
    },

    /// Two rows of the games table share an identifier
    #[error("Duplicate game id {0}")]
    DuplicateId(GameId),

    /// An index entry points at a game that is not in the games table
    #[error("Missing reference: {index} key {key:?} lists unknown game id {id}")]
    MissingReference {
        index: String,
        key: String,
        id: GameId,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
