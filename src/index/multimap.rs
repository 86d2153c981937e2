//! Inverted index: every key maps to the list of values filed under it

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::index::btree::{BPlusTree, BTreeError, Cursor, TreeItem};

/// Key with its value list; ordering and equality look at the key only
#[derive(Debug, Clone)]
pub struct MultiPair<K, V> {
    pub key: K,
    pub values: Vec<V>,
}

impl<K, V> MultiPair<K, V> {
    pub fn new(key: K) -> Self {
        Self { key, values: Vec::new() }
    }
}

impl<K: PartialEq, V> PartialEq for MultiPair<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for MultiPair<K, V> {}

impl<K: Ord, V> PartialOrd for MultiPair<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for MultiPair<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> Borrow<K> for MultiPair<K, V> {
    fn borrow(&self) -> &K {
        &self.key
    }
}

impl<K: Ord + Clone, V: Clone> TreeItem for MultiPair<K, V> {
    fn separator(&self) -> Self {
        MultiPair::new(self.key.clone())
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for MultiPair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : [", self.key)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        write!(f, " ]")
    }
}

/// Ordered map from a key to every value inserted under it.
///
/// Values keep their insertion order within a key and duplicates are kept.
#[derive(Debug, Clone)]
pub struct MultiIndex<K, V> {
    tree: BPlusTree<MultiPair<K, V>>,
}

impl<K, V> Default for MultiIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MultiIndex<K, V> {
    pub fn new() -> Self {
        Self { tree: BPlusTree::new() }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<K: Ord + Clone, V: Clone> MultiIndex<K, V> {
    /// Append `value` to the list under `key`, creating the key if needed
    pub fn insert(&mut self, key: K, value: V) {
        self.values_mut(key).push(value);
    }

    /// Ensure `key` exists, with an empty list if it is new
    pub fn create_key(&mut self, key: K) {
        self.values_mut(key);
    }

    /// List under `key`, created empty on first access
    pub fn values_mut(&mut self, key: K) -> &mut Vec<V> {
        let probe = key.clone();
        &mut self.tree.get_or_insert_with(&probe, || MultiPair::new(key)).values
    }

    /// List under `key`; fails if the key was never created
    pub fn get(&self, key: &K) -> Result<&[V], BTreeError> {
        self.tree.get(key).map(|pair| pair.values.as_slice())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Drop `key` and its whole list
    pub fn erase(&mut self, key: &K) -> bool {
        self.tree.remove(key)
    }

    pub fn begin(&self) -> Cursor {
        self.tree.begin()
    }

    pub fn end(&self) -> Cursor {
        self.tree.end()
    }

    /// First key not less than `key`
    pub fn lower_bound(&self, key: &K) -> Cursor {
        self.tree.lower_bound(key)
    }

    /// First key greater than `key`
    pub fn upper_bound(&self, key: &K) -> Cursor {
        self.tree.upper_bound(key)
    }

    /// Key and list at a cursor
    pub fn entry_at(&self, cursor: Cursor) -> Option<(&K, &[V])> {
        self.tree
            .item_at(cursor)
            .map(|pair| (&pair.key, pair.values.as_slice()))
    }

    pub fn advance(&self, cursor: Cursor) -> Cursor {
        self.tree.advance(cursor)
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.range(self.begin(), self.end())
    }

    /// Entries from `from` up to but excluding `to`
    pub fn range(&self, from: Cursor, to: Cursor) -> impl Iterator<Item = (&K, &[V])> {
        self.tree
            .range(from, to)
            .map(|pair| (&pair.key, pair.values.as_slice()))
    }

    /// Every value filed under a key in `[from, to)`, concatenated in key order
    pub fn collect_values(&self, from: Cursor, to: Cursor) -> Vec<V> {
        self.range(from, to)
            .flat_map(|(_, values)| values.iter().cloned())
            .collect()
    }

    /// Self-check of the underlying tree
    pub fn validate(&self) -> Result<(), BTreeError> {
        self.tree.validate()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for MultiIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree)
    }
}
