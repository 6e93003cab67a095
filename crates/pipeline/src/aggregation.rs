//! Group-by aggregation over a filtered subset.
//!
//! ## Algorithm
//! 1. Partition the subset with a [`GroupBy`] (one-to-many where the
//!    grouping expands)
//! 2. Accumulate every group in parallel: size, and per metric the sum and
//!    count of present values
//! 3. Optionally collapse everything outside the N largest groups into one
//!    "Other" group
//! 4. Drop groups below the minimum size unless pinned
//! 5. Order rows (natural order unless a value sort is requested)
//! 6. Optionally min-max normalize each metric over the displayed rows
//!
//! Aggregation never fails: games without the grouped attribute are left out
//! of the grouping, absent metric values are left out of the mean, and a
//! group whose metric has no values reports `None` for it.

use crate::filters::membership::intersect;
use crate::grouping::{GroupBy, GroupKey};
use data_loader::{Dataset, Dimension, Game, NumericColumn};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// Number of groups kept before collapsing into "Other", unless overridden
pub const DEFAULT_TOP_N: usize = 10;

/// Label of the synthetic group holding every collapsed group
pub const OTHER_LABEL: &str = "Other";

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Metric {
    /// Number of games in the group
    GamesReleased,
    /// Mean of a numeric column over the group's games that have a value
    Mean(NumericColumn),
}

impl Metric {
    /// The success metrics every dashboard view reports
    pub const SUCCESS: [Metric; 6] = [
        Metric::GamesReleased,
        Metric::Mean(NumericColumn::AveragePlaytime),
        Metric::Mean(NumericColumn::PeakCcu),
        Metric::Mean(NumericColumn::Reviews),
        Metric::Mean(NumericColumn::Recommendations),
        Metric::Mean(NumericColumn::ReviewScore),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::GamesReleased => "Games released",
            Metric::Mean(column) => column.name(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match squashed.as_str() {
            "gamesreleased" | "games" | "count" => Ok(Metric::GamesReleased),
            _ => s
                .parse::<NumericColumn>()
                .map(Metric::Mean)
                .map_err(|_| format!("unknown metric: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SortOrder {
    /// Canonical order of the grouping
    #[default]
    Natural,
    /// By the first metric, smallest first
    Ascending,
    /// By the first metric, largest first
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "natural" | "none" | "category" => Ok(SortOrder::Natural),
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("unknown sort order: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AggregateOptions {
    /// Keep the N largest groups and collapse the rest into "Other"
    pub top_n: Option<usize>,
    /// Drop groups smaller than this unless pinned
    pub min_group_size: usize,
    /// Labels that bypass both top-N collapsing and the size threshold
    pub pinned: BTreeSet<String>,
    pub sort: SortOrder,
    /// Attach per-metric min-max normalized values to every row
    pub normalize: bool,
    /// Columns whose zero values are left out of their mean
    pub zero_as_missing: BTreeSet<NumericColumn>,
}

impl AggregateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn with_min_group_size(mut self, size: usize) -> Self {
        self.min_group_size = size;
        self
    }

    pub fn pin(mut self, label: impl Into<String>) -> Self {
        self.pinned.insert(label.into());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    pub fn zero_as_missing(mut self, column: NumericColumn) -> Self {
        self.zero_as_missing.insert(column);
        self
    }
}

// =============================================================================
// Result types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    /// An ordinary group of the grouping
    Group,
    /// Every group collapsed by top-N selection
    Other,
    /// A user-chosen key combination
    Custom,
}

/// One metric of one row.
///
/// `support` is the number of games the value was computed from; it equals
/// the row size for "Games released" and may be smaller for a mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricValue {
    pub value: Option<f64>,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub label: String,
    pub kind: RowKind,
    /// Games backing the row
    pub size: usize,
    /// One entry per requested metric, in request order
    pub values: Vec<MetricValue>,
    /// Min-max normalized values, present once the table is normalized
    pub normalized: Option<Vec<Option<f64>>>,
    #[serde(skip)]
    pub(crate) order: GroupKey,
}

impl AggregatedRow {
    pub fn value(&self, metric_index: usize) -> Option<f64> {
        self.values.get(metric_index).and_then(|v| v.value)
    }

    pub fn normalized_value(&self, metric_index: usize) -> Option<f64> {
        self.normalized.as_ref()?.get(metric_index).copied().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTable {
    pub group_by: GroupBy,
    pub metrics: Vec<Metric>,
    pub rows: Vec<AggregatedRow>,
    /// Sum of group sizes before collapsing and thresholding; exceeds the
    /// number of games under expanding groupings
    pub total_size: usize,
}

impl AggregatedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, label: &str) -> Option<&AggregatedRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn metric_index(&self, metric: Metric) -> Option<usize> {
        self.metrics.iter().position(|m| *m == metric)
    }

    /// Values of one metric down the rows
    pub fn column(&self, metric: Metric) -> Vec<Option<f64>> {
        match self.metric_index(metric) {
            Some(i) => self.rows.iter().map(|r| r.value(i)).collect(),
            None => Vec::new(),
        }
    }

    /// Put custom rows on top, keeping their given order.
    ///
    /// Re-normalizes when the table was already normalized, since the
    /// displayed set changed.
    pub fn with_custom_rows(mut self, custom: Vec<AggregatedRow>) -> Self {
        let was_normalized = self.rows.iter().any(|r| r.normalized.is_some());
        let mut rows = custom;
        rows.append(&mut self.rows);
        self.rows = rows;
        if was_normalized {
            self.normalize();
        }
        self
    }

    /// Rescale every metric to `[0, 1]` over the displayed rows.
    ///
    /// A metric with no spread normalizes to 0 everywhere. Rows without a
    /// value for a metric keep `None`.
    pub fn normalize(&mut self) {
        let mut normalized = vec![Vec::with_capacity(self.metrics.len()); self.rows.len()];
        for i in 0..self.metrics.len() {
            let present = self.rows.iter().filter_map(|r| r.value(i));
            let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            for (row, out) in self.rows.iter().zip(normalized.iter_mut()) {
                out.push(row.value(i).map(|v| {
                    if max > min {
                        (v - min) / (max - min)
                    } else {
                        0.0
                    }
                }));
            }
        }
        for (row, values) in self.rows.iter_mut().zip(normalized) {
            row.normalized = Some(values);
        }
    }
}

// =============================================================================
// Accumulation
// =============================================================================

/// Running totals for one group
#[derive(Debug, Clone)]
struct Accumulator {
    size: usize,
    /// (sum, count) of present values per metric
    sums: Vec<(f64, usize)>,
}

impl Accumulator {
    fn empty(metrics: usize) -> Self {
        Self {
            size: 0,
            sums: vec![(0.0, 0); metrics],
        }
    }

    fn from_games(games: &[&Game], metrics: &[Metric], zero_as_missing: &BTreeSet<NumericColumn>) -> Self {
        let mut acc = Self::empty(metrics.len());
        acc.size = games.len();
        for (metric, (sum, count)) in metrics.iter().zip(acc.sums.iter_mut()) {
            let Metric::Mean(column) = metric else {
                continue;
            };
            let skip_zero = zero_as_missing.contains(column);
            for value in games.iter().filter_map(|g| g.value(*column)) {
                if skip_zero && value == 0.0 {
                    continue;
                }
                *sum += value;
                *count += 1;
            }
        }
        acc
    }

    fn merge(&mut self, other: &Accumulator) {
        self.size += other.size;
        for ((sum, count), (other_sum, other_count)) in self.sums.iter_mut().zip(&other.sums) {
            *sum += other_sum;
            *count += other_count;
        }
    }

    fn finish(&self, metrics: &[Metric]) -> Vec<MetricValue> {
        metrics
            .iter()
            .zip(&self.sums)
            .map(|(metric, &(sum, count))| match metric {
                Metric::GamesReleased => MetricValue {
                    value: Some(self.size as f64),
                    support: self.size,
                },
                Metric::Mean(_) => MetricValue {
                    value: (count > 0).then(|| sum / count as f64),
                    support: count,
                },
            })
            .collect()
    }
}

/// Keep the `n` largest unpinned groups; merge the rest.
///
/// Ties in size go to the group earlier in natural order. Returns the kept
/// groups in natural order and the merged remainder, if any.
fn collapse_top_n(
    groups: Vec<(GroupKey, Accumulator)>,
    n: usize,
    pinned: &BTreeSet<String>,
    metrics: usize,
) -> (Vec<(GroupKey, Accumulator)>, Option<Accumulator>) {
    let (mut kept, mut ranked): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .partition(|(key, _)| pinned.contains(&key.label));
    ranked.sort_by(|(ka, a), (kb, b)| b.size.cmp(&a.size).then_with(|| ka.cmp(kb)));

    let rest = ranked.split_off(n.min(ranked.len()));
    kept.extend(ranked);
    kept.sort_by(|(a, _), (b, _)| a.cmp(b));

    if rest.is_empty() {
        return (kept, None);
    }
    let mut other = Accumulator::empty(metrics);
    for (_, acc) in &rest {
        other.merge(acc);
    }
    (kept, Some(other))
}

/// Compare two rows by one metric, absent values last
fn compare_by_value(a: &AggregatedRow, b: &AggregatedRow, ascending: bool) -> Ordering {
    match (a.value(0), b.value(0)) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            if ascending { ord } else { ord.reverse() }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Custom rows first, then groups, then "Other".
fn order_rows(rows: &mut [AggregatedRow], sort: SortOrder) {
    let section = |row: &AggregatedRow| match row.kind {
        RowKind::Custom => 0,
        RowKind::Group => 1,
        RowKind::Other => 2,
    };
    rows.sort_by(|a, b| {
        section(a).cmp(&section(b)).then_with(|| {
            if a.kind != RowKind::Group {
                return Ordering::Equal;
            }
            let by_value = match sort {
                SortOrder::Natural => Ordering::Equal,
                SortOrder::Ascending => compare_by_value(a, b, true),
                SortOrder::Descending => compare_by_value(a, b, false),
            };
            by_value.then_with(|| a.order.cmp(&b.order))
        })
    });
}

// =============================================================================
// Entry points
// =============================================================================

/// Aggregate a subset by one grouping.
///
/// Pure: depends only on its arguments. The returned rows carry one
/// [`MetricValue`] per requested metric.
#[instrument(skip(subset, dataset, metrics, options), fields(games = subset.len(), %group_by))]
pub fn aggregate(
    subset: &[&Game],
    dataset: &Dataset,
    group_by: GroupBy,
    metrics: &[Metric],
    options: &AggregateOptions,
) -> AggregatedTable {
    let groups = group_by.partition(subset, dataset);
    let accumulated: Vec<(GroupKey, Accumulator)> = groups
        .into_par_iter()
        .map(|(key, games)| {
            let acc = Accumulator::from_games(&games, metrics, &options.zero_as_missing);
            (key, acc)
        })
        .collect();
    let total_size = accumulated.iter().map(|(_, acc)| acc.size).sum();

    let (mut kept, other) = match options.top_n {
        Some(n) => collapse_top_n(accumulated, n, &options.pinned, metrics.len()),
        None => (accumulated, None),
    };
    kept.retain(|(key, acc)| {
        acc.size >= options.min_group_size || options.pinned.contains(&key.label)
    });

    let mut rows: Vec<AggregatedRow> = kept
        .into_iter()
        .map(|(key, acc)| AggregatedRow {
            label: key.label.clone(),
            kind: RowKind::Group,
            size: acc.size,
            values: acc.finish(metrics),
            normalized: None,
            order: key,
        })
        .collect();
    if let Some(acc) = other {
        rows.push(AggregatedRow {
            label: OTHER_LABEL.to_string(),
            kind: RowKind::Other,
            size: acc.size,
            values: acc.finish(metrics),
            normalized: None,
            order: GroupKey::new(i64::MAX, OTHER_LABEL),
        });
    }
    order_rows(&mut rows, options.sort);

    let mut table = AggregatedTable {
        group_by,
        metrics: metrics.to_vec(),
        rows,
        total_size,
    };
    if options.normalize {
        table.normalize();
    }
    tracing::debug!(rows = table.rows.len(), total_size, "Aggregated");
    table
}

/// Aggregate the games possessing ALL of `keys` as one synthetic row.
///
/// The row is labeled with the keys joined by ", " in the order given
/// (duplicates dropped). Returns `None` for an empty key list. A
/// combination no game supports yields a row of size 0.
pub fn combination(
    subset: &[&Game],
    dataset: &Dataset,
    dimension: Dimension,
    keys: &[String],
    metrics: &[Metric],
    zero_as_missing: &BTreeSet<NumericColumn>,
) -> Option<AggregatedRow> {
    let mut seen = BTreeSet::new();
    let keys: Vec<String> = keys
        .iter()
        .filter(|k| seen.insert(k.as_str()))
        .cloned()
        .collect();
    if keys.is_empty() {
        return None;
    }

    let ids = intersect(dataset, dimension, &keys);
    let games: Vec<&Game> = subset
        .iter()
        .filter(|g| ids.contains(&g.id))
        .copied()
        .collect();
    let acc = Accumulator::from_games(&games, metrics, zero_as_missing);
    let label = keys.join(", ");

    Some(AggregatedRow {
        order: GroupKey::new(i64::MIN, label.clone()),
        label,
        kind: RowKind::Custom,
        size: acc.size,
        values: acc.finish(metrics),
        normalized: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: u32, price: f64, reviews: f64, playtime: f64, os: (bool, bool, bool)) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            release_date: None,
            price,
            average_playtime: playtime,
            peak_ccu: 0.0,
            reviews,
            recommendations: 0.0,
            review_score: Some(0.5),
            windows: os.0,
            mac: os.1,
            linux: os.2,
        }
    }

    fn create_test_dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.insert_game(game(1, 0.0, 100.0, 0.0, (true, false, true)));
        dataset.insert_game(game(2, 10.0, 200.0, 30.0, (true, true, true)));
        dataset.insert_game(game(3, 10.0, 300.0, 60.0, (true, false, false)));
        dataset.insert_game(game(4, 150.0, 400.0, 90.0, (true, false, false)));
        let languages = [
            ("English", vec![1, 2, 3, 4]),
            ("German", vec![2, 3, 4]),
            ("French", vec![2, 4]),
            ("Japanese", vec![3]),
            ("Korean", vec![4]),
        ];
        for (language, ids) in languages {
            for id in ids {
                dataset.insert_membership(Dimension::Languages, language, id);
            }
        }
        dataset.build_derived_indices();
        dataset
    }

    const REVIEWS: Metric = Metric::Mean(NumericColumn::Reviews);
    const PLAYTIME: Metric = Metric::Mean(NumericColumn::AveragePlaytime);

    #[test]
    fn test_price_bin_means_and_sizes() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();

        let table = aggregate(
            &subset,
            &dataset,
            GroupBy::PriceBin,
            &[REVIEWS, Metric::GamesReleased],
            &AggregateOptions::new(),
        );

        assert_eq!(table.labels(), vec!["Free", "(0,10]", ">100"]);
        let bin = table.row("(0,10]").unwrap();
        assert_eq!(bin.size, 2);
        assert_eq!(bin.value(0), Some(250.0));
        assert_eq!(bin.value(1), Some(2.0));
    }

    #[test]
    fn test_zero_as_missing_excludes_from_mean_only() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let options = AggregateOptions::new().zero_as_missing(NumericColumn::AveragePlaytime);

        let table = aggregate(&subset, &dataset, GroupBy::OsCount, &[PLAYTIME], &options);

        // Games 1 and 3 have 2 and 1 OS; game 1 has zero playtime
        let two = table.row("2").unwrap();
        assert_eq!(two.size, 1);
        assert_eq!(two.value(0), None);
        assert_eq!(two.values[0].support, 0);
    }

    #[test]
    fn test_os_expansion_counts_every_supported_os() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();

        let table = aggregate(
            &subset,
            &dataset,
            GroupBy::OperatingSystem,
            &[Metric::GamesReleased],
            &AggregateOptions::new(),
        );

        assert_eq!(table.labels(), vec!["Windows", "Mac", "Linux"]);
        assert_eq!(table.column(Metric::GamesReleased), vec![Some(4.0), Some(1.0), Some(2.0)]);
        assert_eq!(table.total_size, 7);
    }

    #[test]
    fn test_top_n_collapses_rest_into_other() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let options = AggregateOptions::new().with_top_n(2);

        let table = aggregate(
            &subset,
            &dataset,
            GroupBy::Membership(Dimension::Languages),
            &[REVIEWS],
            &options,
        );

        assert_eq!(table.labels(), vec!["English", "German", OTHER_LABEL]);
        let other = table.row(OTHER_LABEL).unwrap();
        assert_eq!(other.kind, RowKind::Other);
        // French (2, 4), Japanese (3), Korean (4)
        assert_eq!(other.size, 4);
        assert_eq!(other.value(0), Some((200.0 + 400.0 + 300.0 + 400.0) / 4.0));

        let shown: usize = table.rows.iter().map(|r| r.size).sum();
        assert_eq!(shown, table.total_size);
    }

    #[test]
    fn test_no_other_when_nothing_collapsed() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let options = AggregateOptions::new().with_top_n(10);

        let table = aggregate(
            &subset,
            &dataset,
            GroupBy::Membership(Dimension::Languages),
            &[REVIEWS],
            &options,
        );
        assert!(table.row(OTHER_LABEL).is_none());
        assert_eq!(table.rows.len(), 5);
    }

    #[test]
    fn test_min_group_size_respects_pins() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let options = AggregateOptions::new().with_min_group_size(2).pin("Korean");

        let table = aggregate(
            &subset,
            &dataset,
            GroupBy::Membership(Dimension::Languages),
            &[Metric::GamesReleased],
            &options,
        );
        assert_eq!(table.labels(), vec!["English", "French", "German", "Korean"]);
    }

    #[test]
    fn test_value_sort_overrides_natural_order() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let options = AggregateOptions::new().with_sort(SortOrder::Descending);

        let table = aggregate(&subset, &dataset, GroupBy::PriceBin, &[REVIEWS], &options);
        assert_eq!(table.labels(), vec![">100", "(0,10]", "Free"]);

        let options = AggregateOptions::new().with_sort(SortOrder::Ascending);
        let table = aggregate(&subset, &dataset, GroupBy::PriceBin, &[REVIEWS], &options);
        assert_eq!(table.labels(), vec!["Free", "(0,10]", ">100"]);
    }

    #[test]
    fn test_normalize_per_metric() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let options = AggregateOptions::new().normalized();
        let score = Metric::Mean(NumericColumn::ReviewScore);

        let table = aggregate(&subset, &dataset, GroupBy::PriceBin, &[REVIEWS, score], &options);

        let reviews: Vec<_> = table.rows.iter().map(|r| r.normalized_value(0).unwrap()).collect();
        assert_eq!(reviews, vec![0.0, (250.0 - 100.0) / 300.0, 1.0]);
        // Every game has the same review score
        assert!(table.rows.iter().all(|r| r.normalized_value(1) == Some(0.0)));
    }

    #[test]
    fn test_combination_requires_all_keys() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let keys = vec!["English".to_string(), "German".to_string()];

        let row = combination(
            &subset,
            &dataset,
            Dimension::Languages,
            &keys,
            &[Metric::GamesReleased, REVIEWS],
            &BTreeSet::new(),
        )
        .unwrap();

        assert_eq!(row.label, "English, German");
        assert_eq!(row.kind, RowKind::Custom);
        assert_eq!(row.size, 3);
        assert_eq!(row.value(1), Some(300.0));
    }

    #[test]
    fn test_combination_edge_cases() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();

        let none = combination(&subset, &dataset, Dimension::Languages, &[], &[REVIEWS], &BTreeSet::new());
        assert!(none.is_none());

        let keys = vec!["Japanese".to_string(), "Korean".to_string()];
        let empty = combination(&subset, &dataset, Dimension::Languages, &keys, &[REVIEWS], &BTreeSet::new())
            .unwrap();
        assert_eq!(empty.size, 0);
        assert_eq!(empty.value(0), None);
    }

    #[test]
    fn test_custom_rows_go_on_top() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let keys = vec!["French".to_string(), "German".to_string()];
        let custom = combination(&subset, &dataset, Dimension::Languages, &keys, &[REVIEWS], &BTreeSet::new())
            .unwrap();

        let table = aggregate(
            &subset,
            &dataset,
            GroupBy::Membership(Dimension::Languages),
            &[REVIEWS],
            &AggregateOptions::new().normalized(),
        )
        .with_custom_rows(vec![custom]);

        assert_eq!(table.rows[0].label, "French, German");
        assert!(table.rows[0].normalized.is_some());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("games-released".parse(), Ok(Metric::GamesReleased));
        assert_eq!("reviews".parse(), Ok(REVIEWS));
        assert!("fun".parse::<Metric>().is_err());
    }
}
