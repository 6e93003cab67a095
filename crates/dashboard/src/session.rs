//! # Dashboard Session
//!
//! The query surface a presentation layer talks to. One session owns:
//! 1. A shared, read-only [`Dataset`]
//! 2. Its own [`FilterState`] (never shared with another session)
//! 3. A memoization cache of aggregated tables
//!
//! Every view follows the same pass: apply the session filters and the
//! view's membership selection, then aggregate the subset.

use crate::cache::{AggregationCache, CacheKey, CacheStats};
use crate::error::{DashboardError, Result};
use data_loader::{ColumnRange, Dataset, Dimension, NumericColumn};
use pipeline::{
    AggregateOptions, AggregatedRow, AggregatedTable, Bound, FilterDefaults, FilterState,
    FilterStatus, GroupBy, HeatmapRequest, MembershipSelection, Metric, Subset, TimeGranularity,
    TimeSeries,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Most selections compared against the all-games baseline at once
pub const MAX_COMPARISONS: usize = 3;

/// One numeric column as listed to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub column: NumericColumn,
    /// `None` when no game has a value for the column
    pub range: Option<ColumnRange>,
    /// `None` when the column is not filtered
    pub bound: Option<Bound>,
}

/// A labeled time series, one per compared selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesComparison {
    pub label: String,
    pub series: TimeSeries,
}

pub struct Session {
    dataset: Arc<Dataset>,
    filters: FilterState,
    cache: AggregationCache,
}

impl Session {
    /// Start a session over an already loaded dataset
    pub fn new(dataset: Arc<Dataset>, defaults: FilterDefaults) -> Self {
        let filters = FilterState::new(&dataset, defaults);
        Self {
            dataset,
            filters,
            cache: AggregationCache::new(),
        }
    }

    /// Load the dataset from `data_dir` and start a session over it
    pub fn load(data_dir: &Path, defaults: FilterDefaults) -> Result<Self> {
        let dataset = Dataset::load_from_files(data_dir)?;
        Ok(Self::new(Arc::new(dataset), defaults))
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filters
    }

    pub fn filter_status(&self) -> FilterStatus {
        self.filters.status()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // =========================================================================
    // Columns and filters
    // =========================================================================

    pub fn list_columns(&self) -> Vec<ColumnInfo> {
        NumericColumn::ALL
            .into_iter()
            .map(|column| ColumnInfo {
                column,
                range: self.dataset.column_range(column),
                bound: self.filters.bound(column),
            })
            .collect()
    }

    pub fn column_range(&self, column: NumericColumn) -> Option<ColumnRange> {
        self.dataset.column_range(column)
    }

    /// Set a column's bound, activating the column if needed.
    ///
    /// A side left as `None` keeps the current (or first-touch default)
    /// value. Both ends are clamped to the column's global range; an
    /// inverted result is kept and matches nothing.
    pub fn set_filter(&mut self, column: NumericColumn, min: Option<f64>, max: Option<f64>) -> Bound {
        let current = self.filters.activate(column, &self.dataset);
        let bound = self.filters.set_bounds(
            column,
            min.unwrap_or(current.min),
            max.unwrap_or(current.max),
            &self.dataset,
        );
        if bound.is_inverted() {
            tracing::warn!(%column, min = bound.min, max = bound.max, "Inverted bound matches no game");
        }
        bound
    }

    pub fn clear_filter(&mut self, column: NumericColumn) -> Option<Bound> {
        self.filters.deactivate(column)
    }

    /// Drop every active bound, including the configured defaults
    pub fn clear_all_filters(&mut self) {
        let columns: Vec<_> = self.filters.active_columns().collect();
        for column in columns {
            self.filters.deactivate(column);
        }
    }

    /// Back to the configured defaults. Tables cached for other filter
    /// states are dropped.
    pub fn reset_filters(&mut self) {
        self.filters.reset(&self.dataset);
        self.cache.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Games matching the session filters and a selection
    pub fn apply_filters(&self, selection: &MembershipSelection) -> Subset<'_> {
        pipeline::apply_filters(&self.dataset, &self.filters, selection)
    }

    /// Aggregate an arbitrary subset. Not cached.
    pub fn aggregate(
        &self,
        subset: &[&data_loader::Game],
        group_by: GroupBy,
        metrics: &[Metric],
        options: &AggregateOptions,
    ) -> AggregatedTable {
        pipeline::aggregate(subset, &self.dataset, group_by, metrics, options)
    }

    /// Filter, then aggregate, reusing a cached table when nothing the
    /// result depends on has changed.
    #[instrument(skip_all, fields(%group_by, selection = %selection.label()))]
    pub fn query(
        &mut self,
        selection: &MembershipSelection,
        group_by: GroupBy,
        metrics: &[Metric],
        options: &AggregateOptions,
    ) -> Arc<AggregatedTable> {
        let key = CacheKey {
            filters: self.filters.fingerprint(),
            selection: selection.fingerprint(),
            group_by,
            metrics: metrics.to_vec(),
            options: options.clone(),
        };
        let dataset = Arc::clone(&self.dataset);
        let filters = &self.filters;
        self.cache.get_or_insert_with(key, || {
            let subset = pipeline::apply_filters(&dataset, filters, selection);
            pipeline::aggregate(&subset, &dataset, group_by, metrics, options)
        })
    }

    /// One custom combination row over the filtered selection
    pub fn combination(
        &self,
        selection: &MembershipSelection,
        dimension: Dimension,
        keys: &[String],
        metrics: &[Metric],
        zero_as_missing: &BTreeSet<NumericColumn>,
    ) -> Result<AggregatedRow> {
        let subset = self.apply_filters(selection);
        pipeline::combination(&subset, &self.dataset, dimension, keys, metrics, zero_as_missing)
            .ok_or_else(|| DashboardError::EmptyCombination {
                dimension: dimension.to_string(),
            })
    }

    pub fn heatmap(
        &self,
        selection: &MembershipSelection,
        request: &HeatmapRequest,
    ) -> Result<AggregatedTable> {
        if request.combinations.iter().any(Vec::is_empty) {
            return Err(DashboardError::EmptyCombination {
                dimension: request.dimension.to_string(),
            });
        }
        let subset = self.apply_filters(selection);
        Ok(pipeline::heatmap(&subset, &self.dataset, request))
    }

    /// Series over the filtered selection. A reversed year window yields
    /// an empty series.
    pub fn time_series(
        &self,
        selection: &MembershipSelection,
        years: Option<(i32, i32)>,
        granularity: TimeGranularity,
        columns: &[NumericColumn],
    ) -> Result<TimeSeries> {
        let subset = self.apply_filters(selection);
        Ok(pipeline::time_series(&subset, &self.dataset, years, granularity, columns))
    }

    /// The all-games baseline followed by one series per selection.
    ///
    /// Every series covers the same years so they can share an axis.
    pub fn compare_time_series(
        &self,
        selections: &[MembershipSelection],
        years: Option<(i32, i32)>,
        granularity: TimeGranularity,
        columns: &[NumericColumn],
    ) -> Result<Vec<SeriesComparison>> {
        if selections.len() > MAX_COMPARISONS {
            return Err(DashboardError::TooManySelections {
                given: selections.len(),
                max: MAX_COMPARISONS,
            });
        }
        let years = years.or_else(|| self.dataset.release_index().year_range());
        std::iter::once(MembershipSelection::new())
            .chain(selections.iter().cloned())
            .map(|selection| {
                Ok(SeriesComparison {
                    label: selection.label(),
                    series: self.time_series(&selection, years, granularity, columns)?,
                })
            })
            .collect()
    }

    /// Swap in a new dataset, dropping every cached table and resetting
    /// the filters to the defaults against the new ranges.
    pub fn reload(&mut self, dataset: Arc<Dataset>) {
        self.dataset = dataset;
        self.cache.clear();
        self.filters.reset(&self.dataset);
        let (games, keys, buckets) = self.dataset.counts();
        info!(games, keys, buckets, "Session dataset reloaded");
    }
}
