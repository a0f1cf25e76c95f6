//! Category tallies.
//!
//! Grouping is split in two stages: [`CategoryCounts`] accumulates counts keyed by category in
//! first-seen order, then [`CategoryCounts::ranked`] / [`CategoryCounts::sorted_by_key`]
//! materialize the entries. Ties in a ranking keep first-seen order.

use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexMap;

/// Insertion-ordered map from category key to count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCounts<K: Hash + Eq> {
    counts: IndexMap<K, usize>,
}

impl<K: Hash + Eq> Default for CategoryCounts<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> CategoryCounts<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn increment(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Count one occurrence of a borrowed key; the key is cloned only the first time it is seen.
    pub fn increment_by_ref<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        match self.counts.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.to_owned(), 1);
            }
        }
    }

    /// Fold a tally built over *later* input into this one.
    ///
    /// Keys already present keep their position; new keys are appended in `other`'s order, so
    /// merging per-chunk tallies in chunk order gives the same result as a single pass.
    pub fn merge(&mut self, other: Self) {
        for (key, n) in other.counts {
            *self.counts.entry(key).or_insert(0) += n;
        }
    }

    /// Count for `key` (0 if never seen).
    pub fn get<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, n)| (k, *n))
    }

    /// Entries sorted by descending count, ties in first-seen order, truncated to `limit`.
    pub fn ranked(self, limit: usize) -> Vec<(K, usize)> {
        let mut entries: Vec<(K, usize)> = self.counts.into_iter().collect();
        // Stable sort: equal counts keep insertion order.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }

    /// Entries sorted ascending by key.
    pub fn sorted_by_key(self) -> Vec<(K, usize)>
    where
        K: Ord,
    {
        let mut entries: Vec<(K, usize)> = self.counts.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl<K: Hash + Eq> FromIterator<K> for CategoryCounts<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut out = Self::new();
        for key in iter {
            out.increment(key);
        }
        out
    }
}
