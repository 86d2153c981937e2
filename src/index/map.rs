//! Unique-key map over the linked tree

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::index::btree::{BPlusTree, BTreeError, TreeItem};

/// Key and payload; ordering and equality look at the key only
#[derive(Debug, Clone)]
pub struct Pair<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Pair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: PartialEq, V> PartialEq for Pair<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Pair<K, V> {}

impl<K: Ord, V> PartialOrd for Pair<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for Pair<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> Borrow<K> for Pair<K, V> {
    fn borrow(&self) -> &K {
        &self.key
    }
}

impl<K: Ord + Clone, V: Clone + Default> TreeItem for Pair<K, V> {
    fn separator(&self) -> Self {
        Pair::new(self.key.clone(), V::default())
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Pair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.key, self.value)
    }
}

/// Map with at most one value per key
#[derive(Debug, Clone)]
pub struct KeyedIndex<K, V> {
    tree: BPlusTree<Pair<K, V>>,
}

impl<K, V> Default for KeyedIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyedIndex<K, V> {
    pub fn new() -> Self {
        Self { tree: BPlusTree::new() }
    }

    /// Number of keys
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

impl<K: Ord + Clone, V: Clone + Default> KeyedIndex<K, V> {
    /// Insert or overwrite the value under `key`
    pub fn insert(&mut self, key: K, value: V) {
        self.tree.insert(Pair::new(key, value));
    }

    /// Value under `key`, created with `V::default()` on first access
    pub fn get_or_create(&mut self, key: K) -> &mut V {
        let probe = key.clone();
        &mut self.tree.get_or_insert_with(&probe, || Pair::new(key, V::default())).value
    }

    /// Value under `key`; fails if the key is absent
    pub fn at(&self, key: &K) -> Result<&V, BTreeError> {
        self.tree.get(key).map(|pair| &pair.value)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, BTreeError> {
        self.tree.get_mut(key).map(|pair| &mut pair.value)
    }

    /// Remove `key`, returning whether it was present
    pub fn erase(&mut self, key: &K) -> bool {
        self.tree.remove(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.tree.contains(key)
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.tree.iter().map(|pair| (&pair.key, &pair.value))
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.tree.iter().map(|pair| &pair.key)
    }

    /// Self-check of the underlying tree
    pub fn validate(&self) -> Result<(), BTreeError> {
        self.tree.validate()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for KeyedIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree)
    }
}
