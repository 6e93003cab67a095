//! Filter to keep games possessing every selected key of one dimension.

use crate::traits::Filter;
use data_loader::{Dataset, Dimension, Game, IdSet};

/// Keeps games listed under ALL of the selected keys.
///
/// ## Algorithm
/// 1. Look up the index set of each key (an unknown key is an empty set)
/// 2. Intersect the sets, smallest first
/// 3. Keep games whose id is in the intersection
pub struct MembershipFilter {
    dimension: Dimension,
    keys: Vec<String>,
    ids: IdSet,
    name: String,
}

impl MembershipFilter {
    /// Create a new MembershipFilter.
    ///
    /// # Arguments
    /// * `dataset` - Dataset whose membership index is queried
    /// * `dimension` - Which index to use
    /// * `keys` - Selected keys
    ///
    /// Returns `None` when `keys` is empty: an empty selection is no
    /// constraint, so there is nothing to filter on.
    pub fn new<I, S>(dataset: &Dataset, dimension: Dimension, keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return None;
        }
        let ids = intersect(dataset, dimension, &keys);
        Some(Self {
            dimension,
            name: format!("MembershipFilter({dimension}: {})", keys.join(", ")),
            keys,
            ids,
        })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Games possessing every selected key
    pub fn ids(&self) -> &IdSet {
        &self.ids
    }
}

/// Intersection of the index sets of `keys`.
pub fn intersect(dataset: &Dataset, dimension: Dimension, keys: &[String]) -> IdSet {
    let index = dataset.membership(dimension);
    let mut sets = Vec::with_capacity(keys.len());
    for key in keys {
        match index.ids(key) {
            Some(ids) => sets.push(ids),
            None => return IdSet::new(),
        }
    }
    sets.sort_by_key(|ids| ids.len());

    let Some((smallest, rest)) = sets.split_first() else {
        return IdSet::new();
    };
    smallest
        .iter()
        .filter(|id| rest.iter().all(|ids| ids.contains(*id)))
        .copied()
        .collect()
}

impl Filter for MembershipFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply<'a>(&self, games: Vec<&'a Game>) -> Vec<&'a Game> {
        games
            .into_iter()
            .filter(|game| self.ids.contains(&game.id))
            .collect()
    }
}
