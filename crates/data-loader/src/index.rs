//! Dataset building, derived indices and load-time validation.
//!
//! Loading is all-or-nothing: any malformed file or integrity violation is
//! returned as a [`DataLoadError`] and no [`Dataset`] is produced.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument};

/// Name of the games table inside the data directory
pub const GAMES_FILE: &str = "cleaned_games.csv";

/// Name of the release index inside the data directory
pub const RELEASE_FILE: &str = "release.json";

/// Upper bound of a valid review score
pub const REVIEW_SCORE_MAX: f64 = 1.0;

impl Dataset {
    /// Load the entire dataset from a directory
    ///
    /// Steps:
    /// 1. Parse the games table, the four membership files and the release
    ///    file in parallel
    /// 2. Insert games, rejecting duplicate ids
    /// 3. Attach the indexes
    /// 4. Build derived indices (language counts, column ranges)
    /// 5. Validate data integrity
    #[instrument]
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading games dataset from {:?}", data_dir);

        let games_path = data_dir.join(GAMES_FILE);
        let release_path = data_dir.join(RELEASE_FILE);

        let ((games, release), memberships) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_games(&games_path),
                    || parser::parse_release_index(&release_path),
                )
            },
            || {
                Dimension::ALL
                    .par_iter()
                    .map(|&dimension| {
                        parser::parse_membership_index(&data_dir.join(dimension.file_name()))
                            .map(|index| (dimension, index))
                    })
                    .collect::<Result<Vec<_>>>()
            },
        );

        let games = games?;
        let release = release?;
        let memberships = memberships?;

        info!(
            "Parsed {} games, {} release buckets, {} membership indexes",
            games.len(),
            release.len(),
            memberships.len()
        );

        let mut dataset = Dataset::new();
        for game in games {
            let id = game.id;
            if dataset.insert_game(game).is_some() {
                return Err(DataLoadError::DuplicateId(id));
            }
        }
        for (dimension, index) in memberships {
            dataset.memberships.insert(dimension, index);
        }
        dataset.release_index = release;

        dataset.build_derived_indices();
        dataset.validate()?;

        let (games, keys, buckets) = dataset.counts();
        info!(games, keys, buckets, "Dataset loaded and validated");
        Ok(dataset)
    }

    /// Compute everything derived from games and indexes.
    ///
    /// Call again after inserting data by hand.
    pub fn build_derived_indices(&mut self) {
        self.language_counts = self.compute_language_counts();
        self.column_ranges = self.compute_column_ranges();
    }

    /// Fill the release index from the games' own release dates
    pub fn index_release_dates(&mut self) {
        let dated: Vec<(i32, u32, GameId)> = self
            .games
            .values()
            .filter_map(|g| Some((g.release_year()?, g.release_month()?, g.id)))
            .collect();
        for (year, month, id) in dated {
            self.release_index.insert(year, month, id);
        }
    }

    fn compute_language_counts(&self) -> HashMap<GameId, usize> {
        let mut counts = HashMap::new();
        for (_, ids) in self.membership(Dimension::Languages).iter() {
            for &id in ids {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts
    }

    fn compute_column_ranges(&self) -> HashMap<NumericColumn, ColumnRange> {
        NumericColumn::ALL
            .par_iter()
            .filter_map(|&column| {
                let mut values = self.games.values().filter_map(|g| g.value(column));
                let first = values.next()?;
                let range = values.fold(ColumnRange { min: first, max: first }, |r, v| {
                    ColumnRange {
                        min: r.min.min(v),
                        max: r.max.max(v),
                    }
                });
                Some((column, range))
            })
            .collect()
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - every numeric metric is finite and non-negative
    /// - review scores lie in `[0, REVIEW_SCORE_MAX]`
    /// - every id in every index exists in the games table
    pub fn validate(&self) -> Result<()> {
        for game in self.games.values() {
            for column in NumericColumn::ALL {
                let Some(value) = game.value(column) else {
                    continue;
                };
                let upper = match column {
                    NumericColumn::ReviewScore => REVIEW_SCORE_MAX,
                    _ => f64::INFINITY,
                };
                if !value.is_finite() || value < 0.0 || value > upper {
                    return Err(DataLoadError::InvalidValue {
                        field: column.name().to_string(),
                        id: game.id,
                        value: value.to_string(),
                    });
                }
            }
        }

        for (dimension, index) in &self.memberships {
            for (key, ids) in index.iter() {
                if let Some(&id) = ids.iter().find(|id| !self.contains(**id)) {
                    return Err(DataLoadError::MissingReference {
                        index: dimension.name().to_string(),
                        key: key.to_string(),
                        id,
                    });
                }
            }
        }

        for ((year, month), ids) in self.release_index.iter() {
            if let Some(&id) = ids.iter().find(|id| !self.contains(**id)) {
                return Err(DataLoadError::MissingReference {
                    index: "Release".to_string(),
                    key: format!("{year}-{month:02}"),
                    id,
                });
            }
        }

        Ok(())
    }
}
