use std::borrow::Borrow;

use crate::index::btree::error::BTreeError;
use crate::index::btree::node::NodeId;
use crate::index::btree::Linked;
use super::BTree;

/// Position of an item in a linked tree: a leaf and a slot within it.
///
/// Cursors are plain values; any mutation of the tree invalidates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    leaf: Option<NodeId>,
    slot: usize,
}

impl Cursor {
    /// The past-the-end position
    pub const END: Cursor = Cursor { leaf: None, slot: 0 };

    pub fn is_end(&self) -> bool {
        self.leaf.is_none()
    }
}

impl<T: Ord> BTree<T, Linked> {
    /// Build a canonical cursor: a slot past the last item of a leaf moves to
    /// the start of the next leaf in the chain
    fn cursor_at(&self, leaf: NodeId, slot: usize) -> Cursor {
        let node = self.node(leaf);
        if slot < node.items.len() {
            Cursor { leaf: Some(leaf), slot }
        } else {
            match node.next {
                Some(next) => self.cursor_at(next, 0),
                None => Cursor::END,
            }
        }
    }

    /// Leaf where `key` is or would be stored
    fn leaf_for<Q>(&self, key: &Q) -> NodeId
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut id = self.root;
        while !self.node(id).is_leaf() {
            let node = self.node(id);
            id = node.children[node.find_child_index(key)];
        }
        id
    }

    /// Position of the smallest item
    pub fn begin(&self) -> Cursor {
        self.cursor_at(self.leftmost_leaf(self.root), 0)
    }

    pub fn end(&self) -> Cursor {
        Cursor::END
    }

    /// First position whose key is not less than `key`
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let leaf = self.leaf_for(key);
        self.cursor_at(leaf, self.node(leaf).first_ge(key))
    }

    /// First position whose key is greater than `key`
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let leaf = self.leaf_for(key);
        self.cursor_at(leaf, self.node(leaf).first_gt(key))
    }

    /// Position of the item stored under `key`
    pub fn position_of<Q>(&self, key: &Q) -> Result<Cursor, BTreeError>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let cursor = self.lower_bound(key);
        match self.item_at(cursor) {
            Some(item) if item.borrow() == key => Ok(cursor),
            _ => Err(BTreeError::KeyNotFound),
        }
    }

    /// Item at a cursor, `None` at the end or for a stale cursor
    pub fn item_at(&self, cursor: Cursor) -> Option<&T> {
        let leaf = cursor.leaf?;
        self.nodes.get(leaf)?.items.get(cursor.slot)
    }

    /// Mutable item at a cursor; the key part must not be changed
    pub fn item_at_mut(&mut self, cursor: Cursor) -> Option<&mut T> {
        let leaf = cursor.leaf?;
        self.nodes.get_mut(leaf)?.items.get_mut(cursor.slot)
    }

    /// Position following `cursor`
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        match cursor.leaf {
            Some(leaf) if leaf < self.nodes.len() => self.cursor_at(leaf, cursor.slot + 1),
            _ => Cursor::END,
        }
    }

    /// Ascending iteration over every item, following the leaf chain
    pub fn iter(&self) -> Iter<'_, T> {
        self.range(self.begin(), Cursor::END)
    }

    /// Items from `from` up to but excluding `to`
    pub fn range(&self, from: Cursor, to: Cursor) -> Iter<'_, T> {
        Iter {
            tree: self,
            at: from,
            stop: to,
        }
    }
}

/// Iterator over a linked tree's items in ascending order
pub struct Iter<'a, T> {
    tree: &'a BTree<T, Linked>,
    at: Cursor,
    stop: Cursor,
}

impl<'a, T: Ord> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at == self.stop {
            return None;
        }
        let item = self.tree.item_at(self.at)?;
        self.at = self.tree.advance(self.at);
        Some(item)
    }
}

impl<'a, T: Ord> IntoIterator for &'a BTree<T, Linked> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
