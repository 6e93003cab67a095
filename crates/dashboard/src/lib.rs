//! Dashboard crate for the game insights engine.
//!
//! This crate contains the per-session query surface that coordinates the
//! dataset, the filter engine and the aggregation engine, plus the
//! memoization cache and note persistence that sit next to it.

pub mod cache;
pub mod error;
pub mod notes;
pub mod parse;
pub mod session;

pub use cache::{AggregationCache, CacheKey, CacheStats, DEFAULT_MAX_ENTRIES};
pub use error::{DashboardError, Result};
pub use notes::{NOTES_FILE, NoteStore};
pub use parse::{parse_column, parse_combination, parse_dimension, parse_group_by, parse_metric};
pub use session::{ColumnInfo, MAX_COMPARISONS, SeriesComparison, Session};
