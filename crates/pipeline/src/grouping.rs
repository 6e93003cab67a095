//! Grouping dimensions and the partition step of aggregation.
//!
//! Most groupings put each game into at most one group. Two are
//! deliberately one-to-many expansions:
//!
//! - [`GroupBy::OperatingSystem`]: a game supporting three systems is
//!   counted once in each of the three OS groups.
//! - [`GroupBy::Membership`]: a game is counted once under every genre,
//!   tag, category or language it is listed under.
//!
//! Group sizes under these groupings sum to more than the number of games.
//! That is the intended reading ("how many games support Linux"), not
//! double counting to be corrected.

use crate::binning::{LanguageCountBin, PriceBin, os_combination, os_combination_rank, os_count};
use data_loader::{Dataset, Dimension, Game};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GroupBy {
    PriceBin,
    LanguageCount,
    /// One-to-many: Windows, Mac, Linux
    OperatingSystem,
    OsCombination,
    OsCount,
    /// One-to-many over the keys of a membership index
    Membership(Dimension),
    ReleaseYear,
    ReleaseMonth,
    ReleaseQuarter,
}

/// A group's natural position and its display label.
///
/// Ordering is by `rank`, then `label`, which gives the canonical order of
/// binned dimensions and alphabetical order of membership keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    pub rank: i64,
    pub label: String,
}

impl GroupKey {
    pub fn new(rank: i64, label: impl Into<String>) -> Self {
        Self {
            rank,
            label: label.into(),
        }
    }
}

impl GroupBy {
    pub fn name(&self) -> String {
        match self {
            GroupBy::PriceBin => "Price Bin".to_string(),
            GroupBy::LanguageCount => "Language Count".to_string(),
            GroupBy::OperatingSystem => "Individual OS".to_string(),
            GroupBy::OsCombination => "OS Combination".to_string(),
            GroupBy::OsCount => "OS Count".to_string(),
            GroupBy::Membership(dimension) => dimension.name().to_string(),
            GroupBy::ReleaseYear => "Release Year".to_string(),
            GroupBy::ReleaseMonth => "Release Month".to_string(),
            GroupBy::ReleaseQuarter => "Release Quarter".to_string(),
        }
    }

    /// True when one game can land in several groups
    pub fn is_expanding(&self) -> bool {
        matches!(self, GroupBy::OperatingSystem | GroupBy::Membership(_))
    }

    /// Groups a single game belongs to.
    ///
    /// Empty when the game lacks the attribute (no release date, no
    /// language, no OS flag), so it is left out of this grouping only.
    pub fn keys(&self, game: &Game, dataset: &Dataset) -> Vec<GroupKey> {
        match self {
            GroupBy::PriceBin => {
                let bin = PriceBin::of(game.price);
                vec![GroupKey::new(bin.rank() as i64, bin.label())]
            }
            GroupBy::LanguageCount => LanguageCountBin::of(dataset.language_count(game.id))
                .map(|bin| GroupKey::new(bin.rank() as i64, bin.label()))
                .into_iter()
                .collect(),
            GroupBy::OperatingSystem => game
                .operating_systems()
                .map(|os| GroupKey::new(os as i64, os.name()))
                .collect(),
            GroupBy::OsCombination => os_combination(game)
                .map(|label| GroupKey::new(os_combination_rank(&label) as i64, label))
                .into_iter()
                .collect(),
            GroupBy::OsCount => {
                let count = os_count(game);
                vec![GroupKey::new(count as i64, count.to_string())]
            }
            GroupBy::Membership(dimension) => dataset
                .membership(*dimension)
                .keys_for(game.id)
                .map(|key| GroupKey::new(0, key))
                .collect(),
            GroupBy::ReleaseYear => game
                .release_year()
                .map(|year| GroupKey::new(year as i64, year.to_string()))
                .into_iter()
                .collect(),
            GroupBy::ReleaseMonth => game
                .release_month()
                .map(|month| GroupKey::new(month as i64, month.to_string()))
                .into_iter()
                .collect(),
            GroupBy::ReleaseQuarter => game
                .release_quarter()
                .map(|quarter| GroupKey::new(quarter as i64, format!("Q{quarter}")))
                .into_iter()
                .collect(),
        }
    }

    /// Partition a subset into groups, expanding one-to-many groupings.
    ///
    /// Membership groupings walk the index once instead of scanning it per
    /// game. Games inside each group stay in subset order.
    pub fn partition<'a>(
        &self,
        subset: &[&'a Game],
        dataset: &Dataset,
    ) -> BTreeMap<GroupKey, Vec<&'a Game>> {
        let mut groups: BTreeMap<GroupKey, Vec<&'a Game>> = BTreeMap::new();
        match self {
            GroupBy::Membership(dimension) => {
                let position: HashMap<_, _> = subset
                    .iter()
                    .enumerate()
                    .map(|(i, game)| (game.id, i))
                    .collect();
                for (key, ids) in dataset.membership(*dimension).iter() {
                    let mut members: Vec<usize> =
                        ids.iter().filter_map(|id| position.get(id).copied()).collect();
                    if members.is_empty() {
                        continue;
                    }
                    members.sort_unstable();
                    groups.insert(
                        GroupKey::new(0, key),
                        members.into_iter().map(|i| subset[i]).collect(),
                    );
                }
            }
            _ => {
                for &game in subset {
                    for key in self.keys(game, dataset) {
                        groups.entry(key).or_default().push(game);
                    }
                }
            }
        }
        groups
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match squashed.as_str() {
            "price" | "pricebin" => Ok(GroupBy::PriceBin),
            "languagecount" | "languagescount" => Ok(GroupBy::LanguageCount),
            "os" | "individualos" | "operatingsystem" => Ok(GroupBy::OperatingSystem),
            "oscombination" | "oscombinations" => Ok(GroupBy::OsCombination),
            "oscount" => Ok(GroupBy::OsCount),
            "releaseyear" | "year" => Ok(GroupBy::ReleaseYear),
            "releasemonth" | "month" => Ok(GroupBy::ReleaseMonth),
            "releasequarter" | "quarter" => Ok(GroupBy::ReleaseQuarter),
            _ => s
                .parse::<Dimension>()
                .map(GroupBy::Membership)
                .map_err(|_| format!("unknown grouping: {s}")),
        }
    }
}
