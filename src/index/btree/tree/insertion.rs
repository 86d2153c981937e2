use log::debug;

use crate::index::btree::node::NodeId;
use crate::index::btree::{Layout, TreeItem, MAXIMUM};
use super::BTree;

impl<T: TreeItem, L: Layout> BTree<T, L> {
    /// Insert an item, replacing any item with an equal key
    pub fn insert(&mut self, item: T) {
        let root = self.root;
        if self.loose_insert(root, item) {
            self.len += 1;
        }

        if self.node(root).items.len() > MAXIMUM {
            self.grow_root();
        }
    }

    /// Insert without restoring the bound on the visited node itself.
    /// Oversized children are split on the way back up.
    /// Returns whether a new key was added.
    fn loose_insert(&mut self, id: NodeId, item: T) -> bool {
        let (index, found, is_leaf) = {
            let node = self.node(id);
            let (index, found) = node.search(&item);
            (index, found, node.is_leaf())
        };

        if is_leaf {
            let node = self.node_mut(id);
            if found {
                node.items[index] = item;
                return false;
            }
            node.items.insert(index, item);
            return true;
        }

        if found && !L::LINKED {
            self.node_mut(id).items[index] = item;
            return false;
        }

        let slot = if found { index + 1 } else { index };
        let child = self.node(id).children[slot];
        let added = self.loose_insert(child, item);

        if self.node(child).items.len() > MAXIMUM {
            self.fix_excess(id, slot);
        }
        added
    }

    /// Split the oversized child at `slot` about its median.
    ///
    /// The median moves up into `parent` and a new right sibling takes the
    /// upper half. In the linked layout a split leaf keeps the median as the
    /// sibling's first item, `parent` gets its separator, and the sibling is
    /// spliced into the leaf chain.
    fn fix_excess(&mut self, parent: NodeId, slot: usize) {
        let child = self.node(parent).children[slot];
        let median_at = (MAXIMUM + 1) / 2;

        let (median, mut right_items, right_children, is_leaf, next) = {
            let node = self.node_mut(child);
            let right_items = node.items.split_off(median_at + 1);
            let median = node.items.pop();
            let right_children = if node.is_leaf() {
                Vec::new()
            } else {
                node.children.split_off(median_at + 1)
            };
            (median, right_items, right_children, node.is_leaf(), node.next)
        };
        let Some(mut median) = median else {
            return;
        };
        let sibling = self.alloc();

        if is_leaf && L::LINKED {
            let separator = median.separator();
            right_items.insert(0, std::mem::replace(&mut median, separator));
            self.node_mut(child).next = Some(sibling);
        }

        {
            let node = self.node_mut(sibling);
            node.items = right_items;
            node.children = right_children;
            if is_leaf && L::LINKED {
                node.next = next;
            }
        }

        let node = self.node_mut(parent);
        node.items.insert(slot, median);
        node.children.insert(slot + 1, sibling);
    }

    /// Grow the tree by one level: the root's content moves into a single
    /// new child, which is then split.
    fn grow_root(&mut self) {
        let root = self.root;
        let child = self.alloc();

        let (items, children) = {
            let node = self.node_mut(root);
            (std::mem::take(&mut node.items), std::mem::take(&mut node.children))
        };
        {
            let node = self.node_mut(child);
            node.items = items;
            node.children = children;
        }
        self.node_mut(root).children.push(child);
        self.fix_excess(root, 0);

        debug!("tree grew to height {}", self.height());
    }
}
