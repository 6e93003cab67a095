//! # Data Loader Crate
//!
//! This crate loads and indexes the games dataset: the games table plus one
//! membership index per categorical dimension and a release-time index.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Game, NumericColumn, Dimension, Dataset)
//! - **parser**: Parse the CSV table and JSON index files
//! - **index**: Build derived indices and validate integrity at load
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Dataset, Dimension};
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_files(Path::new("data"))?;
//!
//! let game = dataset.get_game(10).unwrap();
//! let action = dataset.membership(Dimension::Genres).ids("Action");
//! ```
//!
//! The dataset is immutable once loaded and is meant to be shared behind an
//! `Arc` by every session.

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

pub use error::{DataLoadError, Result};
pub use index::{GAMES_FILE, RELEASE_FILE, REVIEW_SCORE_MAX};
pub use types::{
    ColumnRange,
    Dataset,
    Dimension,
    Game,
    GameId,
    IdSet,
    MembershipIndex,
    NumericColumn,
    OperatingSystem,
    ReleaseIndex,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: GameId) -> Game {
        Game {
            id,
            name: "Test".to_string(),
            release_date: chrono::NaiveDate::from_ymd_opt(2019, 11, 2),
            price: 4.99,
            average_playtime: 30.0,
            peak_ccu: 12.0,
            reviews: 40.0,
            recommendations: 20.0,
            review_score: Some(0.8),
            windows: true,
            mac: false,
            linux: true,
        }
    }

    #[test]
    fn test_dataset_creation() {
        let dataset = Dataset::new();
        assert_eq!(dataset.counts(), (0, 0, 0));
        assert!(dataset.membership(Dimension::Tags).is_empty());
    }

    #[test]
    fn test_insert_game() {
        let mut dataset = Dataset::new();
        assert!(dataset.insert_game(game(1)).is_none());
        assert!(dataset.insert_game(game(1)).is_some());

        let retrieved = dataset.get_game(1).unwrap();
        assert_eq!(retrieved.release_year(), Some(2019));
        assert_eq!(retrieved.release_quarter(), Some(4));
    }

    #[test]
    fn test_operating_systems_in_canonical_order() {
        let g = game(1);
        let systems: Vec<_> = g.operating_systems().collect();
        assert_eq!(systems, vec![OperatingSystem::Windows, OperatingSystem::Linux]);
    }

    #[test]
    fn test_numeric_column_from_str() {
        assert_eq!("peak-ccu".parse(), Ok(NumericColumn::PeakCcu));
        assert_eq!("Review score".parse(), Ok(NumericColumn::ReviewScore));
        assert_eq!(
            "Average playtime forever".parse(),
            Ok(NumericColumn::AveragePlaytime)
        );
        assert!("metacritic".parse::<NumericColumn>().is_err());
    }

    #[test]
    fn test_membership_keys_for() {
        let mut dataset = Dataset::new();
        dataset.insert_game(game(1));
        dataset.insert_membership(Dimension::Languages, "English", 1);
        dataset.insert_membership(Dimension::Languages, "German", 1);
        dataset.insert_membership(Dimension::Languages, "French", 2);

        let keys: Vec<_> = dataset.membership(Dimension::Languages).keys_for(1).collect();
        assert_eq!(keys, vec!["English", "German"]);
    }

    #[test]
    fn test_empty_queries() {
        let dataset = Dataset::new();
        assert!(dataset.get_game(999).is_none());
        assert!(dataset.membership(Dimension::Genres).ids("Action").is_none());
        assert!(dataset.release_index().year_range().is_none());
        assert_eq!(dataset.language_count(999), 0);
    }
}
