//! Session-scoped numeric filter state.
//!
//! A [`FilterState`] maps each active numeric column to a [`Bound`]. Columns
//! that are not active impose no constraint. The state is owned by one
//! session and passed by reference into the filter engine; it is never
//! shared between sessions.

use data_loader::{ColumnRange, Dataset, NumericColumn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Inclusive `[min, max]` range applied to one column.
///
/// An inverted bound (`min > max`) is legal and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

/// Columns active at session start, each with a minimum floor
/// (e.g. at least 20 reviews).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterDefaults {
    pub floors: BTreeMap<NumericColumn, f64>,
}

impl FilterDefaults {
    /// No column active by default
    pub fn none() -> Self {
        Self {
            floors: BTreeMap::new(),
        }
    }

    pub fn with_floor(mut self, column: NumericColumn, floor: f64) -> Self {
        self.floors.insert(column, floor);
        self
    }
}

impl Default for FilterDefaults {
    /// The dashboard starts out hiding games with fewer than 20 reviews
    fn default() -> Self {
        Self::none().with_floor(NumericColumn::Reviews, 20.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    /// Exactly the configured defaults
    Default,
    /// Touched since the last reset
    UserModified,
}

#[derive(Debug, Clone)]
pub struct FilterState {
    bounds: BTreeMap<NumericColumn, Bound>,
    defaults: FilterDefaults,
    status: FilterStatus,
}

impl FilterState {
    /// Fresh state with every defaulted column active
    pub fn new(dataset: &Dataset, defaults: FilterDefaults) -> Self {
        let mut state = Self {
            bounds: BTreeMap::new(),
            defaults,
            status: FilterStatus::Default,
        };
        state.apply_defaults(dataset);
        state
    }

    /// State with no active column and no defaults
    pub fn unfiltered() -> Self {
        Self {
            bounds: BTreeMap::new(),
            defaults: FilterDefaults::none(),
            status: FilterStatus::Default,
        }
    }

    fn apply_defaults(&mut self, dataset: &Dataset) {
        let columns: Vec<_> = self.defaults.floors.keys().copied().collect();
        for column in columns {
            let bound = self.default_bound(column, dataset);
            self.bounds.insert(column, bound);
        }
    }

    /// First-touch bound: the column's global range, with the configured
    /// floor raising the minimum.
    fn default_bound(&self, column: NumericColumn, dataset: &Dataset) -> Bound {
        let range = global_range(column, dataset);
        let min = match self.defaults.floors.get(&column) {
            Some(&floor) => range.clamp(floor.max(range.min)),
            None => range.min,
        };
        Bound::new(min, range.max)
    }

    pub fn status(&self) -> FilterStatus {
        self.status
    }

    pub fn defaults(&self) -> &FilterDefaults {
        &self.defaults
    }

    pub fn is_active(&self, column: NumericColumn) -> bool {
        self.bounds.contains_key(&column)
    }

    pub fn bound(&self, column: NumericColumn) -> Option<Bound> {
        self.bounds.get(&column).copied()
    }

    /// Active columns with their bounds, in column order
    pub fn bounds(&self) -> impl Iterator<Item = (NumericColumn, Bound)> + '_ {
        self.bounds.iter().map(|(c, b)| (*c, *b))
    }

    pub fn active_columns(&self) -> impl Iterator<Item = NumericColumn> + '_ {
        self.bounds.keys().copied()
    }

    /// Activate a column, returning its bound.
    ///
    /// An already active column keeps its current bound.
    pub fn activate(&mut self, column: NumericColumn, dataset: &Dataset) -> Bound {
        if let Some(bound) = self.bound(column) {
            return bound;
        }
        let bound = self.default_bound(column, dataset);
        self.bounds.insert(column, bound);
        self.status = FilterStatus::UserModified;
        bound
    }

    /// Deactivate a column and forget its bound
    pub fn deactivate(&mut self, column: NumericColumn) -> Option<Bound> {
        let removed = self.bounds.remove(&column);
        if removed.is_some() {
            self.status = FilterStatus::UserModified;
        }
        removed
    }

    /// Set both ends of a column's bound, activating it if needed.
    ///
    /// Each end is clamped to the column's global range. An inverted result
    /// is kept as is. Setting the bound a column already has changes
    /// nothing, status included.
    pub fn set_bounds(
        &mut self,
        column: NumericColumn,
        min: f64,
        max: f64,
        dataset: &Dataset,
    ) -> Bound {
        let range = global_range(column, dataset);
        let bound = Bound::new(range.clamp(min), range.clamp(max));
        if self.bounds.insert(column, bound) != Some(bound) {
            self.status = FilterStatus::UserModified;
        }
        bound
    }

    pub fn set_min(&mut self, column: NumericColumn, min: f64, dataset: &Dataset) -> Bound {
        let current = self.activate(column, dataset);
        self.set_bounds(column, min, current.max, dataset)
    }

    pub fn set_max(&mut self, column: NumericColumn, max: f64, dataset: &Dataset) -> Bound {
        let current = self.activate(column, dataset);
        self.set_bounds(column, current.min, max, dataset)
    }

    /// Back to the configured defaults
    pub fn reset(&mut self, dataset: &Dataset) {
        self.bounds.clear();
        self.apply_defaults(dataset);
        self.status = FilterStatus::Default;
    }

    /// Stable hash of the active bounds, used as a cache key
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for (column, bound) in &self.bounds {
            column.hash(&mut hasher);
            bound.min.to_bits().hash(&mut hasher);
            bound.max.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Range of a column, or a degenerate `[0, 0]` when no game has a value
fn global_range(column: NumericColumn, dataset: &Dataset) -> ColumnRange {
    dataset
        .column_range(column)
        .unwrap_or(ColumnRange { min: 0.0, max: 0.0 })
}
