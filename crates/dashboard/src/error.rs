//! Error types for the dashboard query surface.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors a dashboard request can produce.
///
/// Data absence, inverted bounds, reversed year windows and unknown
/// membership keys are not errors; they yield empty or zero results. Only
/// requests that cannot be interpreted at all end up here.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Unknown numeric column: {0}")]
    UnknownColumn(String),

    #[error("Unknown membership dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown grouping: {0}")]
    UnknownGrouping(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// A custom combination needs at least one key
    #[error("Empty combination for {dimension}")]
    EmptyCombination { dimension: String },

    #[error("Too many selections to compare: {given} (at most {max})")]
    TooManySelections { given: usize, max: usize },

    #[error("Failed to access notes file {path}: {source}")]
    NotesIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed notes file {path}: {source}")]
    NotesFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    DataLoad(#[from] data_loader::DataLoadError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
