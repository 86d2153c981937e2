use std::borrow::Borrow;

use super::MAXIMUM;

/// Arena slot of a tree node
pub type NodeId = usize;

/// Tree node
/// - Leaf nodes have no children
/// - Internal nodes have exactly `items.len() + 1` children when balanced
/// - `next` links a leaf to its right neighbour (linked layout only)
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub items: Vec<T>,
    pub children: Vec<NodeId>,
    pub next: Option<NodeId>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Node<T> {
    pub fn new() -> Self {
        Self {
            // one spare slot for the transient overflow before a split
            items: Vec::with_capacity(MAXIMUM + 1),
            children: Vec::new(),
            next: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Reset the node so its arena slot can be reused
    pub fn reset(&mut self) {
        self.items.clear();
        self.children.clear();
        self.next = None;
    }
}

impl<T: Ord> Node<T> {
    /// Index of the first item not less than `target`
    pub fn first_ge<Q>(&self, target: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.partition_point(|item| item.borrow() < target)
    }

    /// Index of the first item greater than `target`
    pub fn first_gt<Q>(&self, target: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.partition_point(|item| item.borrow() <= target)
    }

    /// Position of `target` among the items and whether it is present there
    pub fn search<Q>(&self, target: &Q) -> (usize, bool)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.first_ge(target);
        let found = index < self.items.len() && self.items[index].borrow() == target;
        (index, found)
    }

    /// Find the index of the child that should contain the key
    pub fn find_child_index<Q>(&self, target: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.search(target) {
            (i, true) => i + 1, // equal keys live in the right subtree
            (i, false) => i,
        }
    }
}
