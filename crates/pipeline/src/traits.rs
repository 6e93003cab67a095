//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a set of games.

use data_loader::Game;

/// Core trait for filtering games.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows a built pipeline to be shared between sessions
/// - Filters take ownership of the Vec and return the retained games in
///   their original order
/// - Filters never fail: a missing value or an unknown key simply matches
///   nothing
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Keep the games that satisfy this filter.
    fn apply<'a>(&self, games: Vec<&'a Game>) -> Vec<&'a Game>;
}
