//! Ad hoc membership selections made inside one analysis view.
//!
//! Within a dimension every selected key must be present (AND); distinct
//! dimensions are combined with AND as well. An optional release-year window
//! narrows the selection further.

use data_loader::Dimension;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MembershipSelection {
    keys: BTreeMap<Dimension, BTreeSet<String>>,
    release_years: Option<(i32, i32)>,
}

impl MembershipSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add keys for a dimension (builder pattern)
    pub fn with<I, S>(mut self, dimension: Dimension, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.select(dimension, key);
        }
        self
    }

    /// Restrict to games released in `from..=to` (builder pattern)
    pub fn with_release_years(mut self, from: i32, to: i32) -> Self {
        self.release_years = Some((from, to));
        self
    }

    pub fn select(&mut self, dimension: Dimension, key: impl Into<String>) {
        self.keys.entry(dimension).or_default().insert(key.into());
    }

    pub fn deselect(&mut self, dimension: Dimension, key: &str) {
        if let Some(keys) = self.keys.get_mut(&dimension) {
            keys.remove(key);
            if keys.is_empty() {
                self.keys.remove(&dimension);
            }
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.release_years = None;
    }

    /// Selected keys of one dimension, alphabetical
    pub fn keys(&self, dimension: Dimension) -> impl Iterator<Item = &str> {
        self.keys
            .get(&dimension)
            .into_iter()
            .flat_map(|keys| keys.iter().map(String::as_str))
    }

    /// Dimensions with at least one selected key
    pub fn dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.keys.keys().copied()
    }

    pub fn release_years(&self) -> Option<(i32, i32)> {
        self.release_years
    }

    /// True when the selection constrains nothing
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.release_years.is_none()
    }

    /// Short legend label, e.g. `G: Action, Indie | T: Co-op`
    pub fn label(&self) -> String {
        if self.keys.is_empty() {
            return "All games".to_string();
        }
        self.keys
            .iter()
            .map(|(dimension, keys)| {
                let initial = &dimension.name()[..1];
                let joined = keys.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
                format!("{initial}: {joined}")
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
