//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the FilterPipeline struct that chains filters
//! together using the builder pattern, and [`apply_filters`], the filter
//! engine entry point that builds a pipeline from a session's state.

use crate::filter_state::FilterState;
use crate::filters::{MembershipFilter, NumericRangeFilter, ReleaseWindowFilter};
use crate::selection::MembershipSelection;
use crate::traits::Filter;
use data_loader::{Dataset, Game};
use tracing::instrument;

/// Games that survived filtering, in ascending id order
pub type Subset<'a> = Vec<&'a Game>;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(NumericRangeFilter::new(NumericColumn::Reviews, Bound::new(20.0, 1e6)))
///     .add_filter(MembershipFilter::new(&dataset, Dimension::Tags, ["Indie"]).unwrap());
///
/// let subset = pipeline.apply(dataset.games().collect());
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the pipeline for a filter state and a membership selection.
    ///
    /// One range filter per active column, one membership filter per
    /// dimension with a non-empty selection, and a release window filter
    /// when the selection has one. Every filter is AND-combined.
    pub fn from_state(
        dataset: &Dataset,
        state: &FilterState,
        selection: &MembershipSelection,
    ) -> Self {
        let mut pipeline = Self::new();
        for (column, bound) in state.bounds() {
            pipeline = pipeline.add_filter(NumericRangeFilter::new(column, bound));
        }
        for dimension in selection.dimensions() {
            if let Some(filter) = MembershipFilter::new(dataset, dimension, selection.keys(dimension)) {
                pipeline = pipeline.add_filter(filter);
            }
        }
        if let Some((from, to)) = selection.release_years() {
            pipeline = pipeline.add_filter(ReleaseWindowFilter::new(from, to));
        }
        pipeline
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the games.
    ///
    /// ## Algorithm
    /// 1. Start with the input games
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    pub fn apply<'a>(&self, games: Vec<&'a Game>) -> Vec<&'a Game> {
        let mut current = games;
        for filter in &self.filters {
            if current.is_empty() {
                break;
            }
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Narrow the dataset to the games matching a filter state and selection.
///
/// Pure: the same inputs always give the same subset, in ascending id order.
#[instrument(skip_all, fields(active = state.bounds().count(), selected = selection.dimensions().count()))]
pub fn apply_filters<'a>(
    dataset: &'a Dataset,
    state: &FilterState,
    selection: &MembershipSelection,
) -> Subset<'a> {
    let pipeline = FilterPipeline::from_state(dataset, state, selection);
    let subset = pipeline.apply(dataset.games().collect());
    tracing::debug!(filters = pipeline.len(), matched = subset.len(), "Filters applied");
    subset
}
