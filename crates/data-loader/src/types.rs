//! Core domain types for the games dataset.
//!
//! This module defines the record type, the closed sets of numeric columns,
//! operating systems and membership dimensions, and the [`Dataset`] store
//! that owns everything after load.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a game (the store's `AppID`)
pub type GameId = u32;

/// Set of game identifiers, as stored in every membership index
pub type IdSet = HashSet<GameId>;

// =============================================================================
// Game
// =============================================================================

/// One game record.
///
/// Numeric metrics are stored as `f64` so that every filterable column shares
/// one bound type. `review_score` is the only metric that may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    /// `None` when the source date matched none of the accepted formats
    pub release_date: Option<NaiveDate>,
    pub price: f64,
    pub average_playtime: f64,
    pub peak_ccu: f64,
    pub reviews: f64,
    pub recommendations: f64,
    /// Fraction of positive reviews in `[0, 1]`
    pub review_score: Option<f64>,
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
}

impl Game {
    /// Value of a numeric column for this game
    pub fn value(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::Price => Some(self.price),
            NumericColumn::AveragePlaytime => Some(self.average_playtime),
            NumericColumn::PeakCcu => Some(self.peak_ccu),
            NumericColumn::Reviews => Some(self.reviews),
            NumericColumn::Recommendations => Some(self.recommendations),
            NumericColumn::ReviewScore => self.review_score,
        }
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    /// Calendar month, 1-based
    pub fn release_month(&self) -> Option<u32> {
        self.release_date.map(|d| d.month())
    }

    /// Calendar quarter, 1-based
    pub fn release_quarter(&self) -> Option<u32> {
        self.release_month().map(|m| (m - 1) / 3 + 1)
    }

    pub fn supports(&self, os: OperatingSystem) -> bool {
        match os {
            OperatingSystem::Windows => self.windows,
            OperatingSystem::Mac => self.mac,
            OperatingSystem::Linux => self.linux,
        }
    }

    /// Supported operating systems in canonical Windows, Mac, Linux order
    pub fn operating_systems(&self) -> impl Iterator<Item = OperatingSystem> + '_ {
        OperatingSystem::ALL
            .into_iter()
            .filter(move |os| self.supports(*os))
    }
}

// =============================================================================
// Closed vocabularies
// =============================================================================

/// The numeric columns a filter bound or a mean metric can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Price,
    AveragePlaytime,
    PeakCcu,
    Reviews,
    Recommendations,
    ReviewScore,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 6] = [
        NumericColumn::Price,
        NumericColumn::AveragePlaytime,
        NumericColumn::PeakCcu,
        NumericColumn::Reviews,
        NumericColumn::Recommendations,
        NumericColumn::ReviewScore,
    ];

    /// Column header as it appears in the games table
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Price => "Price",
            NumericColumn::AveragePlaytime => "Average playtime",
            NumericColumn::PeakCcu => "Peak CCU",
            NumericColumn::Reviews => "Reviews",
            NumericColumn::Recommendations => "Recommendations",
            NumericColumn::ReviewScore => "Review score",
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumericColumn {
    type Err = String;

    /// Accepts the header name or any case/separator variant of it
    /// (`peak-ccu`, `peak_ccu`, `PeakCCU`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        if wanted == "averageplaytimeforever" {
            return Ok(NumericColumn::AveragePlaytime);
        }
        NumericColumn::ALL
            .into_iter()
            .find(|c| squash(c.name()) == wanted)
            .ok_or_else(|| format!("unknown numeric column: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OperatingSystem {
    Windows,
    Mac,
    Linux,
}

impl OperatingSystem {
    /// Canonical order used by every OS-derived grouping
    pub const ALL: [OperatingSystem; 3] = [
        OperatingSystem::Windows,
        OperatingSystem::Mac,
        OperatingSystem::Linux,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OperatingSystem::Windows => "Windows",
            OperatingSystem::Mac => "Mac",
            OperatingSystem::Linux => "Linux",
        }
    }

    pub fn initial(self) -> char {
        match self {
            OperatingSystem::Windows => 'W',
            OperatingSystem::Mac => 'M',
            OperatingSystem::Linux => 'L',
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Categorical dimensions backed by a membership index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Genres,
    Tags,
    Categories,
    Languages,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Genres,
        Dimension::Tags,
        Dimension::Categories,
        Dimension::Languages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Genres => "Genres",
            Dimension::Tags => "Tags",
            Dimension::Categories => "Categories",
            Dimension::Languages => "Languages",
        }
    }

    /// File the index is read from inside the data directory
    pub fn file_name(self) -> &'static str {
        match self {
            Dimension::Genres => "genres.json",
            Dimension::Tags => "tags.json",
            Dimension::Categories => "categories.json",
            Dimension::Languages => "supported_languages.json",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "genre" | "genres" => Ok(Dimension::Genres),
            "tag" | "tags" => Ok(Dimension::Tags),
            "category" | "categories" => Ok(Dimension::Categories),
            "language" | "languages" => Ok(Dimension::Languages),
            _ => Err(format!("unknown membership dimension: {s}")),
        }
    }
}

/// Lowercase and drop everything but letters and digits
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// =============================================================================
// Column statistics
// =============================================================================

/// Observed `[min, max]` of a numeric column over the whole dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

// =============================================================================
// Indexes
// =============================================================================

/// Categorical key to the set of games possessing it
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    entries: BTreeMap<String, IdSet>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, id: GameId) {
        self.entries.entry(key.into()).or_default().insert(id);
    }

    /// Games listed under `key`, `None` for a key the index never saw
    pub fn ids(&self, key: &str) -> Option<&IdSet> {
        self.entries.get(key)
    }

    /// Keys in alphabetical order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IdSet)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys under which `id` is listed
    pub fn keys_for(&self, id: GameId) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, ids)| ids.contains(&id))
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `(year, month)` to the set of games released in that month
#[derive(Debug, Clone, Default)]
pub struct ReleaseIndex {
    entries: BTreeMap<(i32, u32), IdSet>,
}

impl ReleaseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, year: i32, month: u32, id: GameId) {
        self.entries.entry((year, month)).or_default().insert(id);
    }

    pub fn ids(&self, year: i32, month: u32) -> Option<&IdSet> {
        self.entries.get(&(year, month))
    }

    /// First and last year present in the index
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.entries.keys().next()?.0;
        let last = self.entries.keys().next_back()?.0;
        Some((first, last))
    }

    pub fn iter(&self) -> impl Iterator<Item = ((i32, u32), &IdSet)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Dataset - the immutable in-memory store
// =============================================================================

/// Games plus every index built over them.
///
/// Mutators exist for loading and for building fixtures; once handed out
/// behind an `Arc` the dataset is only read.
#[derive(Debug)]
pub struct Dataset {
    /// Ordered by id so that every derived subset is deterministic
    pub(crate) games: BTreeMap<GameId, Game>,
    pub(crate) memberships: HashMap<Dimension, MembershipIndex>,
    pub(crate) release_index: ReleaseIndex,

    // Derived at load time
    pub(crate) language_counts: HashMap<GameId, usize>,
    pub(crate) column_ranges: HashMap<NumericColumn, ColumnRange>,
}

impl Dataset {
    pub fn new() -> Self {
        Self {
            games: BTreeMap::new(),
            memberships: Dimension::ALL
                .into_iter()
                .map(|d| (d, MembershipIndex::new()))
                .collect(),
            release_index: ReleaseIndex::new(),
            language_counts: HashMap::new(),
            column_ranges: HashMap::new(),
        }
    }

    pub fn get_game(&self, id: GameId) -> Option<&Game> {
        self.games.get(&id)
    }

    pub fn contains(&self, id: GameId) -> bool {
        self.games.contains_key(&id)
    }

    /// All games in ascending id order
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    pub fn membership(&self, dimension: Dimension) -> &MembershipIndex {
        &self.memberships[&dimension]
    }

    pub fn release_index(&self) -> &ReleaseIndex {
        &self.release_index
    }

    /// Number of supported languages; 0 when the game is in no language list
    pub fn language_count(&self, id: GameId) -> usize {
        self.language_counts.get(&id).copied().unwrap_or(0)
    }

    /// Global range of a column, `None` when no game has a value for it
    pub fn column_range(&self, column: NumericColumn) -> Option<ColumnRange> {
        self.column_ranges.get(&column).copied()
    }

    /// Insert a game, returning the one it replaced if the id was taken
    pub fn insert_game(&mut self, game: Game) -> Option<Game> {
        self.games.insert(game.id, game)
    }

    pub fn insert_membership(&mut self, dimension: Dimension, key: impl Into<String>, id: GameId) {
        self.memberships
            .entry(dimension)
            .or_default()
            .insert(key, id);
    }

    pub fn insert_release(&mut self, year: i32, month: u32, id: GameId) {
        self.release_index.insert(year, month, id);
    }

    /// (games, membership keys across all dimensions, release buckets)
    pub fn counts(&self) -> (usize, usize, usize) {
        let keys = self.memberships.values().map(MembershipIndex::len).sum();
        (self.games.len(), keys, self.release_index.len())
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}
