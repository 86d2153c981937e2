use std::borrow::Borrow;

use log::debug;

use crate::index::btree::node::NodeId;
use crate::index::btree::{Layout, TreeItem, MINIMUM};
use super::BTree;

impl<T: TreeItem, L: Layout> BTree<T, L> {
    /// Remove the item with this key.
    /// Returns whether it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.root;
        if !self.loose_remove(root, key) {
            return false;
        }
        self.len -= 1;
        self.shrink_root();

        if L::LINKED {
            self.refresh_separator(key);
        }
        true
    }

    /// Remove without restoring the bound on the visited node itself.
    /// Undersized children are repaired on the way back up.
    fn loose_remove<Q>(&mut self, id: NodeId, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (index, found, is_leaf) = {
            let node = self.node(id);
            let (index, found) = node.search(key);
            (index, found, node.is_leaf())
        };

        if is_leaf {
            if found {
                self.node_mut(id).items.remove(index);
            }
            return found;
        }

        let slot = if found && L::LINKED { index + 1 } else { index };
        let child = self.node(id).children[slot];

        let removed = if found && !L::LINKED {
            // the item lives here: replace it with its in-order predecessor
            if let Some(predecessor) = self.remove_biggest(child) {
                self.node_mut(id).items[index] = predecessor;
            }
            true
        } else {
            self.loose_remove(child, key)
        };

        if removed && self.node(child).items.len() < MINIMUM {
            self.fix_shortage(id, slot);
        }
        removed
    }

    /// Remove and return the largest item of the subtree rooted at `id`
    fn remove_biggest(&mut self, id: NodeId) -> Option<T> {
        if self.node(id).is_leaf() {
            return self.node_mut(id).items.pop();
        }

        let last = self.node(id).children.len() - 1;
        let child = self.node(id).children[last];
        let biggest = self.remove_biggest(child);

        if self.node(child).items.len() < MINIMUM {
            self.fix_shortage(id, last);
        }
        biggest
    }

    /// Repair the undersized child at `slot`, trying in order: borrow from
    /// the left sibling, borrow from the right sibling, merge into the left
    /// sibling, merge with the right sibling.
    fn fix_shortage(&mut self, parent: NodeId, slot: usize) {
        let child_count = self.node(parent).children.len();
        let surplus = |tree: &Self, at: usize| {
            let sibling = tree.node(parent).children[at];
            tree.node(sibling).items.len() > MINIMUM
        };

        if slot > 0 && surplus(self, slot - 1) {
            self.rotate_from_left(parent, slot);
        } else if slot + 1 < child_count && surplus(self, slot + 1) {
            self.rotate_from_right(parent, slot);
        } else if slot > 0 {
            self.merge_with_next(parent, slot - 1);
        } else if slot + 1 < child_count {
            self.merge_with_next(parent, slot);
        }
    }

    /// Move the last item of the left sibling into the child at `slot`
    fn rotate_from_left(&mut self, parent: NodeId, slot: usize) {
        let left = self.node(parent).children[slot - 1];
        let child = self.node(parent).children[slot];
        let Some(moved) = self.node_mut(left).items.pop() else {
            return;
        };

        if L::LINKED && self.node(child).is_leaf() {
            self.node_mut(child).items.insert(0, moved);
            let first = self.node(child).items[0].separator();
            self.node_mut(parent).items[slot - 1] = first;
            return;
        }

        let separator = std::mem::replace(&mut self.node_mut(parent).items[slot - 1], moved);
        self.node_mut(child).items.insert(0, separator);
        if let Some(subtree) = self.node_mut(left).children.pop() {
            self.node_mut(child).children.insert(0, subtree);
        }
    }

    /// Move the first item of the right sibling into the child at `slot`
    fn rotate_from_right(&mut self, parent: NodeId, slot: usize) {
        let child = self.node(parent).children[slot];
        let right = self.node(parent).children[slot + 1];
        let moved = self.node_mut(right).items.remove(0);

        if L::LINKED && self.node(child).is_leaf() {
            self.node_mut(child).items.push(moved);
            let first = self.node(right).items[0].separator();
            self.node_mut(parent).items[slot] = first;
            return;
        }

        let separator = std::mem::replace(&mut self.node_mut(parent).items[slot], moved);
        self.node_mut(child).items.push(separator);
        if !self.node(right).is_leaf() {
            let subtree = self.node_mut(right).children.remove(0);
            self.node_mut(child).children.push(subtree);
        }
    }

    /// Fold the child at `slot + 1` into the child at `slot`, dropping the
    /// separator between them from `parent`
    fn merge_with_next(&mut self, parent: NodeId, slot: usize) {
        let (left, right, separator) = {
            let node = self.node_mut(parent);
            let right = node.children.remove(slot + 1);
            (node.children[slot], right, node.items.remove(slot))
        };
        let absorbed = std::mem::take(self.node_mut(right));

        let node = self.node_mut(left);
        let chained_leaf = L::LINKED && node.is_leaf();
        if !chained_leaf {
            node.items.push(separator);
        }
        node.items.extend(absorbed.items);
        node.children.extend(absorbed.children);
        if chained_leaf {
            node.next = absorbed.next;
        }
        self.release(right);
    }

    /// Drop a root left with no items and a single child by adopting the
    /// child's content, shrinking the tree by one level
    fn shrink_root(&mut self) {
        let root = self.root;
        let node = self.node(root);
        if !node.items.is_empty() || node.children.len() != 1 {
            return;
        }

        let child = node.children[0];
        let adopted = std::mem::take(self.node_mut(child));
        *self.node_mut(root) = adopted;
        self.release(child);

        debug!("tree shrank to height {}", self.height());
    }

    /// A removed key may survive as a navigation copy in an internal node;
    /// replace it with its successor, the first item of the leftmost leaf of
    /// the subtree to its right
    fn refresh_separator<Q>(&mut self, key: &Q)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut id = self.root;
        while !self.node(id).is_leaf() {
            let (index, found) = self.node(id).search(key);
            if found {
                let right = self.node(id).children[index + 1];
                if let Some(successor) = self.smallest(right).map(T::separator) {
                    self.node_mut(id).items[index] = successor;
                }
                return;
            }
            id = self.node(id).children[index];
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::index::btree::{BPlusTree, SetTree};

    #[test]
    fn test_remove_missing_key() {
        let mut tree = BPlusTree::new();
        for key in 1..10 {
            tree.insert(key);
        }
        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn test_remove_all_ascending() {
        let mut tree = BPlusTree::new();
        for key in 1..=64 {
            tree.insert(key);
        }
        for key in 1..=64 {
            assert!(tree.remove(&key));
            assert!(tree.validate().is_ok(), "invalid after removing {}", key);
            assert!(!tree.contains(&key));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_remove_all_descending_plain() {
        let mut tree = SetTree::new();
        for key in 1..=64 {
            tree.insert(key);
        }
        for key in (1..=64).rev() {
            assert!(tree.remove(&key));
            assert!(tree.validate().is_ok(), "invalid after removing {}", key);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_separator_key() {
        let mut tree = BPlusTree::new();
        for key in [10, 20, 30, 40, 50] {
            tree.insert(key);
        }
        // 20 was promoted as a separator by the first split
        assert!(tree.remove(&20));
        assert!(tree.validate().is_ok());
        assert!(!tree.contains(&20));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![10, 30, 40, 50]);
        assert_eq!(tree.lower_bound(&20), tree.position_of(&30).unwrap());
    }

    #[test]
    fn test_remove_middle_out() {
        let mut tree = BPlusTree::new();
        for key in 0..100 {
            tree.insert(key);
        }
        let order: Vec<i32> = (0..50).rev().chain(50..100).collect();
        for (removed, key) in order.iter().enumerate() {
            assert!(tree.remove(key));
            assert_eq!(tree.len(), 100 - removed - 1);
            assert!(tree.validate().is_ok(), "invalid after removing {}", key);
        }
    }

    #[test]
    fn test_height_shrinks() {
        let mut tree = SetTree::new();
        for key in 0..32 {
            tree.insert(key);
        }
        let tall = tree.height();
        for key in 0..30 {
            tree.remove(&key);
        }
        assert!(tree.height() < tall);
        assert!(tree.validate().is_ok());
    }
}
