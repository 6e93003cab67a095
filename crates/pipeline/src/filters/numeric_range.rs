//! Filter to keep games whose numeric column lies inside a bound.

use crate::filter_state::Bound;
use crate::traits::Filter;
use data_loader::{Game, NumericColumn};

/// Keeps games with `bound.min <= value <= bound.max`.
///
/// A game without a value for the column is dropped, and an inverted bound
/// drops everything.
pub struct NumericRangeFilter {
    column: NumericColumn,
    bound: Bound,
    name: String,
}

impl NumericRangeFilter {
    pub fn new(column: NumericColumn, bound: Bound) -> Self {
        Self {
            column,
            bound,
            name: format!("NumericRangeFilter({column})"),
        }
    }
}

impl Filter for NumericRangeFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply<'a>(&self, games: Vec<&'a Game>) -> Vec<&'a Game> {
        games
            .into_iter()
            .filter(|game| {
                game.value(self.column)
                    .is_some_and(|value| self.bound.contains(value))
            })
            .collect()
    }
}
