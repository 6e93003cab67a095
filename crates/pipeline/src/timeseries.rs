//! Release-time series over the release index.
//!
//! Buckets come from the `(year, month)` release index, not from the games'
//! own dates, so a series agrees with what the index lists. Every bucket in
//! the requested calendar range is emitted, empty ones with zeros, so a
//! chart axis never has holes.

use data_loader::{Dataset, Game, GameId, IdSet, NumericColumn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TimeGranularity {
    #[default]
    Month,
    Year,
}

impl fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeGranularity::Month => f.write_str("month"),
            TimeGranularity::Year => f.write_str("year"),
        }
    }
}

impl FromStr for TimeGranularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "month" | "monthly" | "m" => Ok(TimeGranularity::Month),
            "year" | "yearly" | "y" => Ok(TimeGranularity::Year),
            _ => Err(format!("unknown granularity: {s}")),
        }
    }
}

/// How a column is reduced over the games of one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reduction {
    Sum,
    Mean,
}

/// Count-like columns add up across a bucket; rates and prices are averaged.
pub fn reduction(column: NumericColumn) -> Reduction {
    match column {
        NumericColumn::ReviewScore | NumericColumn::Price => Reduction::Mean,
        NumericColumn::AveragePlaytime
        | NumericColumn::PeakCcu
        | NumericColumn::Reviews
        | NumericColumn::Recommendations => Reduction::Sum,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub year: i32,
    /// `None` at year granularity
    pub month: Option<u32>,
    pub games_released: usize,
    /// One value per requested column, 0 for an empty bucket
    pub values: Vec<f64>,
}

impl TimePoint {
    /// `2015-03` or `2015`
    pub fn label(&self) -> String {
        match self.month {
            Some(month) => format!("{}-{:02}", self.year, month),
            None => self.year.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub granularity: TimeGranularity,
    pub columns: Vec<NumericColumn>,
    pub points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_released(&self) -> usize {
        self.points.iter().map(|p| p.games_released).sum()
    }
}

fn reduce(games: &[&Game], column: NumericColumn) -> f64 {
    let values: Vec<f64> = games.iter().filter_map(|g| g.value(column)).collect();
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().sum();
    match reduction(column) {
        Reduction::Sum => sum,
        Reduction::Mean => sum / values.len() as f64,
    }
}

fn point(
    year: i32,
    month: Option<u32>,
    ids: &[GameId],
    dataset: &Dataset,
    columns: &[NumericColumn],
) -> TimePoint {
    let games: Vec<&Game> = ids.iter().filter_map(|id| dataset.get_game(*id)).collect();
    TimePoint {
        year,
        month,
        games_released: games.len(),
        values: columns.iter().map(|c| reduce(&games, *c)).collect(),
    }
}

/// Ids of one bucket that are also in the subset, ascending
fn bucket(dataset: &Dataset, subset: &HashSet<GameId>, year: i32, month: u32) -> Vec<GameId> {
    let mut ids: Vec<GameId> = dataset
        .release_index()
        .ids(year, month)
        .map(|ids: &IdSet| ids.iter().filter(|id| subset.contains(id)).copied().collect())
        .unwrap_or_default();
    ids.sort_unstable();
    ids
}

/// Release series of a subset.
///
/// `years` defaults to the full range of the release index; an index with
/// no entries and no explicit range gives an empty series. A reversed range
/// is treated as empty.
///
/// At year granularity the year's games are gathered first and reduced
/// once, so a mean is over games and not over monthly means.
#[instrument(skip(subset, dataset, columns), fields(games = subset.len()))]
pub fn time_series(
    subset: &[&Game],
    dataset: &Dataset,
    years: Option<(i32, i32)>,
    granularity: TimeGranularity,
    columns: &[NumericColumn],
) -> TimeSeries {
    let Some((from, to)) = years.or_else(|| dataset.release_index().year_range()) else {
        return TimeSeries {
            granularity,
            columns: columns.to_vec(),
            points: Vec::new(),
        };
    };
    let members: HashSet<GameId> = subset.iter().map(|g| g.id).collect();

    let points: Vec<TimePoint> = match granularity {
        TimeGranularity::Month => (from..=to)
            .flat_map(|year| (1..=12).map(move |month| (year, month)))
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(year, month)| {
                let ids = bucket(dataset, &members, year, month);
                point(year, Some(month), &ids, dataset, columns)
            })
            .collect(),
        TimeGranularity::Year => (from..=to)
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|year| {
                let mut ids: Vec<GameId> = (1..=12)
                    .flat_map(|month| bucket(dataset, &members, year, month))
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                point(year, None, &ids, dataset, columns)
            })
            .collect(),
    };
    tracing::debug!(points = points.len(), from, to, %granularity, "Time series built");

    TimeSeries {
        granularity,
        columns: columns.to_vec(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(id: u32, year: i32, month: u32, reviews: f64, score: f64) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            release_date: NaiveDate::from_ymd_opt(year, month, 1),
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
        dataset.insert_game(game(1, 2015, 1, 10.0, 0.2));
        dataset.insert_game(game(2, 2015, 1, 30.0, 0.4));
        dataset.insert_game(game(3, 2015, 6, 60.0, 0.9));
        dataset.insert_game(game(4, 2016, 3, 5.0, 0.5));
        dataset.index_release_dates();
        dataset.build_derived_indices();
        dataset
    }

    const COLUMNS: [NumericColumn; 2] = [NumericColumn::Reviews, NumericColumn::ReviewScore];

    #[test]
    fn test_month_series_is_contiguous() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();

        let series = time_series(&subset, &dataset, Some((2015, 2016)), TimeGranularity::Month, &COLUMNS);

        assert_eq!(series.len(), 24);
        assert_eq!(series.points[0].label(), "2015-01");
        assert_eq!(series.points[23].label(), "2016-12");
        assert_eq!(series.total_released(), 4);

        let february = &series.points[1];
        assert_eq!(february.games_released, 0);
        assert_eq!(february.values, vec![0.0, 0.0]);
    }

    #[test]
    fn test_month_bucket_reductions() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();

        let series = time_series(&subset, &dataset, Some((2015, 2015)), TimeGranularity::Month, &COLUMNS);

        let january = &series.points[0];
        assert_eq!(january.games_released, 2);
        assert_eq!(january.values[0], 40.0);
        assert!((january.values[1] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_year_mean_is_over_games() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().collect();

        let series = time_series(&subset, &dataset, None, TimeGranularity::Year, &COLUMNS);

        assert_eq!(series.len(), 2);
        let year = &series.points[0];
        assert_eq!(year.label(), "2015");
        assert_eq!(year.games_released, 3);
        assert_eq!(year.values[0], 100.0);
        // (0.2 + 0.4 + 0.9) / 3, not the mean of 0.3 and 0.9
        assert!((year.values[1] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_subset_restricts_buckets() {
        let dataset = create_test_dataset();
        let subset: Vec<_> = dataset.games().filter(|g| g.reviews > 20.0).collect();

        let series = time_series(&subset, &dataset, Some((2015, 2016)), TimeGranularity::Year, &COLUMNS);
        assert_eq!(
            series.points.iter().map(|p| p.games_released).collect::<Vec<_>>(),
            vec![2, 0]
        );
    }

    #[test]
    fn test_empty_index_gives_empty_series() {
        let dataset = Dataset::new();
        let series = time_series(&[], &dataset, None, TimeGranularity::Month, &COLUMNS);
        assert!(series.is_empty());
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("Month".parse(), Ok(TimeGranularity::Month));
        assert_eq!("yearly".parse(), Ok(TimeGranularity::Year));
        assert!("week".parse::<TimeGranularity>().is_err());
    }
}
