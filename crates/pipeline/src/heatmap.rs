//! Multi-metric comparison of the groups of one membership dimension.
//!
//! ## Algorithm
//! 1. Aggregate by the dimension, dropping groups below the minimum size
//! 2. Keep a group when it ranks in the top k of ANY requested metric
//! 3. Put the requested key combinations on top (they bypass both rules)
//! 4. Normalize every metric over the rows that are actually shown

use crate::aggregation::{AggregateOptions, AggregatedRow, AggregatedTable, Metric, aggregate, combination};
use crate::grouping::GroupBy;
use data_loader::{Dataset, Dimension, Game, NumericColumn};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::instrument;

pub const DEFAULT_TOP_PER_METRIC: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeatmapRequest {
    pub dimension: Dimension,
    pub metrics: Vec<Metric>,
    pub min_group_size: usize,
    pub top_per_metric: usize,
    /// Key combinations shown as custom rows, in request order
    pub combinations: Vec<Vec<String>>,
    pub zero_as_missing: BTreeSet<NumericColumn>,
}

impl HeatmapRequest {
    pub fn new(dimension: Dimension, metrics: impl Into<Vec<Metric>>) -> Self {
        Self {
            dimension,
            metrics: metrics.into(),
            min_group_size: 0,
            top_per_metric: DEFAULT_TOP_PER_METRIC,
            combinations: Vec::new(),
            zero_as_missing: BTreeSet::new(),
        }
    }

    pub fn with_min_group_size(mut self, size: usize) -> Self {
        self.min_group_size = size;
        self
    }

    pub fn with_top_per_metric(mut self, k: usize) -> Self {
        self.top_per_metric = k;
        self
    }

    pub fn with_combination<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.combinations.push(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn zero_as_missing(mut self, column: NumericColumn) -> Self {
        self.zero_as_missing.insert(column);
        self
    }
}

/// Labels ranking in the top `k` of at least one metric.
///
/// Ties are broken by natural (alphabetical) order so the cut is stable.
fn top_labels(rows: &[AggregatedRow], metrics: usize, k: usize) -> BTreeSet<String> {
    let mut keep = BTreeSet::new();
    for i in 0..metrics {
        let mut ranked: Vec<&AggregatedRow> = rows.iter().filter(|r| r.value(i).is_some()).collect();
        ranked.sort_by(|a, b| {
            let (x, y) = (a.value(i).unwrap_or(0.0), b.value(i).unwrap_or(0.0));
            y.partial_cmp(&x)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.order.cmp(&b.order))
        });
        keep.extend(ranked.into_iter().take(k).map(|r| r.label.clone()));
    }
    keep
}

/// Build the heatmap table for a subset.
///
/// Empty combinations are skipped. Custom rows keep their request order;
/// the remaining groups are alphabetical.
#[instrument(skip_all, fields(games = subset.len(), dimension = %request.dimension))]
pub fn heatmap(subset: &[&Game], dataset: &Dataset, request: &HeatmapRequest) -> AggregatedTable {
    let options = AggregateOptions {
        min_group_size: request.min_group_size,
        zero_as_missing: request.zero_as_missing.clone(),
        ..AggregateOptions::default()
    };
    let mut table = aggregate(
        subset,
        dataset,
        GroupBy::Membership(request.dimension),
        &request.metrics,
        &options,
    );

    let keep = top_labels(&table.rows, request.metrics.len(), request.top_per_metric);
    table.rows.retain(|r| keep.contains(&r.label));

    let custom: Vec<AggregatedRow> = request
        .combinations
        .iter()
        .filter_map(|keys| {
            combination(
                subset,
                dataset,
                request.dimension,
                keys,
                &request.metrics,
                &request.zero_as_missing,
            )
        })
        .collect();
    tracing::debug!(groups = table.rows.len(), custom = custom.len(), "Heatmap rows selected");

    let mut table = table.with_custom_rows(custom);
    table.normalize();
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::RowKind;

    fn game(id: u32, reviews: f64, score: f64) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            release_date: None,
            price: 0.0,
            average_playtime: 0.0,
            peak_ccu: 0.0,
            reviews,
            recommendations: 0.0,
            review_score: Some(score),
            windows: true,
            mac: false,
            linux: false,
        }
    }

    fn create_test_dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.insert_game(game(1, 10.0, 0.9));
        dataset.insert_game(game(2, 500.0, 0.5));
        dataset.insert_game(game(3, 100.0, 0.7));
        dataset.insert_game(game(4, 50.0, 0.3));
        let languages = [
            ("English", vec![1, 2, 3, 4]),
            ("German", vec![2, 3]),
            ("French", vec![1]),
            ("Polish", vec![4]),
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
    const SCORE: Metric = Metric::Mean(NumericColumn::ReviewScore);

    #[test]
    fn test_keeps_top_k_of_any_metric() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let request = HeatmapRequest::new(Dimension::Languages, [REVIEWS, SCORE]).with_top_per_metric(1);

        let table = heatmap(&subset, &dataset, &request);

        // German leads on reviews (300), French on score (0.9)
        assert_eq!(table.labels(), vec!["French", "German"]);
    }

    #[test]
    fn test_min_group_size_applies_before_ranking() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let request = HeatmapRequest::new(Dimension::Languages, [SCORE])
            .with_min_group_size(2)
            .with_top_per_metric(5);

        let table = heatmap(&subset, &dataset, &request);
        assert_eq!(table.labels(), vec!["English", "German"]);
    }

    #[test]
    fn test_combinations_on_top_and_normalized() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();
        let request = HeatmapRequest::new(Dimension::Languages, [REVIEWS])
            .with_min_group_size(2)
            .with_combination(["English", "German"])
            .with_combination(["French", "Polish"]);

        let table = heatmap(&subset, &dataset, &request);

        assert_eq!(table.rows[0].label, "English, German");
        assert_eq!(table.rows[0].kind, RowKind::Custom);
        assert_eq!(table.rows[0].size, 2);
        // No game has both French and Polish; the row is still shown
        assert_eq!(table.rows[1].size, 0);
        assert_eq!(table.rows[1].normalized_value(0), None);

        let normalized: Vec<_> = table.rows.iter().filter_map(|r| r.normalized_value(0)).collect();
        let min = normalized.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = normalized.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!((min, max), (0.0, 1.0));
    }
}
