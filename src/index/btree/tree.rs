use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

use crate::index::btree::error::BTreeError;
use crate::index::btree::node::{Node, NodeId};
use crate::index::btree::{Layout, Linked, TreeItem};

mod cursor;
mod deletion;
mod insertion;
mod validation;

pub use cursor::{Cursor, Iter};

/// Balanced multiway search tree over items ordered by `Ord`.
///
/// Inserting an item equal to an existing one replaces it, so the tree
/// holds at most one item per key. Items that carry a payload should order
/// and compare by key only.
pub struct BTree<T, L: Layout = Linked> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeId>,
    root: NodeId,
    len: usize,
    _layout: PhantomData<L>,
}

impl<T, L: Layout> Default for BTree<T, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, L: Layout> BTree<T, L> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            free: Vec::new(),
            root: 0,
            len: 0,
            _layout: PhantomData,
        }
    }

    /// Number of items in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, a lone root leaf being height 1
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.root;
        while let Some(&child) = self.node(id).children.first() {
            height += 1;
            id = child;
        }
        height
    }

    /// Remove every item, releasing all nodes
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new());
        self.free.clear();
        self.root = 0;
        self.len = 0;
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id]
    }

    fn alloc(&mut self) -> NodeId {
        match self.free.pop() {
            Some(id) => id,
            None => {
                self.nodes.push(Node::new());
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id].reset();
        self.free.push(id);
    }

    /// Leftmost leaf of the subtree rooted at `id`
    fn leftmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&child) = self.node(id).children.first() {
            id = child;
        }
        id
    }

    /// Smallest item of the subtree rooted at `id`
    fn smallest(&self, id: NodeId) -> Option<&T> {
        self.node(self.leftmost_leaf(id)).items.first()
    }
}

impl<T: Ord, L: Layout> BTree<T, L> {
    /// Node and slot holding `key`, or the leaf slot where it would be
    /// inserted, with whether it was found
    fn descend<Q>(&self, key: &Q) -> (NodeId, usize, bool)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut id = self.root;
        loop {
            let node = self.node(id);
            let (index, found) = node.search(key);

            // plain layout keeps the item itself in the internal node
            if node.is_leaf() || (found && !L::LINKED) {
                return (id, index, found);
            }
            id = node.children[if found { index + 1 } else { index }];
        }
    }

    /// Node and slot holding the authoritative copy of `key`
    fn locate<Q>(&self, key: &Q) -> Option<(NodeId, usize)>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (id, index, found) = self.descend(key);
        found.then_some((id, index))
    }

    /// Check whether an item with this key is present
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Item stored under `key`
    pub fn get<Q>(&self, key: &Q) -> Result<&T, BTreeError>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (id, index) = self.locate(key).ok_or(BTreeError::KeyNotFound)?;
        Ok(&self.node(id).items[index])
    }

    /// Mutable access to the item stored under `key`.
    ///
    /// The key part of the item must not be changed through this reference.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut T, BTreeError>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (id, index) = self.locate(key).ok_or(BTreeError::KeyNotFound)?;
        Ok(&mut self.node_mut(id).items[index])
    }
}

impl<T: TreeItem, L: Layout> BTree<T, L> {
    /// Mutable access to the item under `key`, inserting `make()` first when
    /// the key is absent. `make` must build an item carrying `key`.
    pub fn get_or_insert_with<Q, F>(&mut self, key: &Q, make: F) -> &mut T
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce() -> T,
    {
        if !self.contains(key) {
            self.insert(make());
        }
        let (id, index, _) = self.descend(key);
        &mut self.node_mut(id).items[index]
    }
}

impl<T: Clone, L: Layout> Clone for BTree<T, L> {
    /// Deep copy into a compact arena, re-threading the leaf chain
    fn clone(&self) -> Self {
        let mut copy = Self {
            nodes: Vec::with_capacity(self.nodes.len() - self.free.len()),
            free: Vec::new(),
            root: 0,
            len: self.len,
            _layout: PhantomData,
        };
        let mut last_leaf = None;
        copy.root = copy.copy_subtree(self, self.root, &mut last_leaf);
        copy
    }
}

impl<T: Clone, L: Layout> BTree<T, L> {
    fn copy_subtree(&mut self, other: &Self, id: NodeId, last_leaf: &mut Option<NodeId>) -> NodeId {
        let source = other.node(id);
        let new_id = self.nodes.len();
        let mut node = Node::new();
        node.items.extend(source.items.iter().cloned());
        self.nodes.push(node);

        if source.is_leaf() {
            if L::LINKED {
                if let Some(previous) = last_leaf.replace(new_id) {
                    self.nodes[previous].next = Some(new_id);
                }
            }
        } else {
            for &child in &source.children {
                let copied = self.copy_subtree(other, child, last_leaf);
                self.nodes[new_id].children.push(copied);
            }
        }
        new_id
    }
}

impl<T: fmt::Debug, L: Layout> fmt::Debug for BTree<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("len", &self.len)
            .field("root", &self.node(self.root).items)
            .finish()
    }
}

impl<T: fmt::Display, L: Layout> BTree<T, L> {
    fn render(&self, id: NodeId, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node(id);
        let indent = level * 4;

        // sideways: largest keys on top, children indented under their separators
        if node.is_leaf() {
            for item in node.items.iter().rev() {
                writeln!(f, "{:indent$}{}", "", item, indent = indent)?;
            }
            return Ok(());
        }
        for (i, item) in node.items.iter().enumerate().rev() {
            self.render(node.children[i + 1], level + 1, f)?;
            writeln!(f, "{:indent$}{}", "", item, indent = indent)?;
        }
        self.render(node.children[0], level + 1, f)
    }
}

impl<T: fmt::Display, L: Layout> fmt::Display for BTree<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(self.root, 0, f)
    }
}
