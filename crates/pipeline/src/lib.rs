//! Filtering and aggregation over the games dataset.
//!
//! This crate provides:
//! - Filter trait and implementations for narrowing the dataset
//! - FilterPipeline for composing filters, driven by a [`FilterState`]
//!   and a [`MembershipSelection`]
//! - The aggregation engine: binning, grouping, top-N collapsing,
//!   minimum-support filtering, normalization and custom combinations
//! - Heatmap selection and release time series built on top of it
//!
//! ## Architecture
//! Every view recomputes in two stages:
//! 1. Filters narrow the dataset to a subset (AND across every constraint)
//! 2. The subset is aggregated into ordered rows for one grouping
//!
//! Both stages are pure functions of their inputs; the only mutable piece
//! is the per-session [`FilterState`].
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{AggregateOptions, FilterDefaults, FilterState, GroupBy, Metric};
//! use pipeline::{MembershipSelection, aggregate, apply_filters};
//!
//! let state = FilterState::new(&dataset, FilterDefaults::default());
//! let selection = MembershipSelection::new().with(Dimension::Genres, ["Indie"]);
//! let subset = apply_filters(&dataset, &state, &selection);
//!
//! let table = aggregate(
//!     &subset,
//!     &dataset,
//!     GroupBy::PriceBin,
//!     &Metric::SUCCESS,
//!     &AggregateOptions::new(),
//! );
//! ```

pub mod aggregation;
pub mod binning;
pub mod filter_pipeline;
pub mod filter_state;
pub mod filters;
pub mod grouping;
pub mod heatmap;
pub mod selection;
pub mod timeseries;
pub mod traits;

// Re-export main types
pub use aggregation::{
    AggregateOptions, AggregatedRow, AggregatedTable, DEFAULT_TOP_N, Metric, MetricValue,
    OTHER_LABEL, RowKind, SortOrder, aggregate, combination,
};
pub use binning::{LanguageCountBin, OS_COMBINATIONS, PriceBin};
pub use filter_pipeline::{FilterPipeline, Subset, apply_filters};
pub use filter_state::{Bound, FilterDefaults, FilterState, FilterStatus};
pub use grouping::{GroupBy, GroupKey};
pub use heatmap::{DEFAULT_TOP_PER_METRIC, HeatmapRequest, heatmap};
pub use selection::MembershipSelection;
pub use timeseries::{Reduction, TimeGranularity, TimePoint, TimeSeries, reduction, time_series};
pub use traits::Filter;
