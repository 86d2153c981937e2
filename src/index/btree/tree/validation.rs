use crate::index::btree::error::BTreeError;
use crate::index::btree::node::NodeId;
use crate::index::btree::{Layout, MAXIMUM, MINIMUM};
use super::BTree;

/// Smallest and largest item of a subtree
type Span<'a, T> = Option<(&'a T, &'a T)>;

impl<T: Ord, L: Layout> BTree<T, L> {
    /// Check every structural invariant of the tree.
    ///
    /// Fails with [`BTreeError::InvalidStructure`] describing the first
    /// violation found.
    pub fn validate(&self) -> Result<(), BTreeError> {
        let mut leaves = Vec::new();
        let mut count = 0;
        self.check_node(self.root, true, &mut leaves, &mut count)?;

        if count != self.len {
            return Err(invalid(format!("tree reports {} items but holds {}", self.len, count)));
        }
        if L::LINKED {
            self.check_chain(&leaves)?;
        }
        Ok(())
    }

    /// Returns the depth of the subtree's leaves and its span
    fn check_node<'a>(
        &'a self,
        id: NodeId,
        is_root: bool,
        leaves: &mut Vec<NodeId>,
        count: &mut usize,
    ) -> Result<(usize, Span<'a, T>), BTreeError> {
        let node = self.node(id);
        let items = &node.items;

        if items.len() > MAXIMUM {
            return Err(invalid(format!("node {} holds {} items", id, items.len())));
        }
        if !is_root && items.len() < MINIMUM {
            return Err(invalid(format!("node {} holds {} items", id, items.len())));
        }
        if items.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(invalid(format!("node {} is not strictly ascending", id)));
        }

        if node.is_leaf() {
            leaves.push(id);
            *count += items.len();
            return Ok((1, items.first().zip(items.last())));
        }

        if node.children.len() != items.len() + 1 {
            return Err(invalid(format!(
                "node {} has {} items but {} children",
                id,
                items.len(),
                node.children.len()
            )));
        }
        if !L::LINKED {
            *count += items.len();
        }

        let mut depth = None;
        let mut spans = Vec::with_capacity(node.children.len());
        for &child in &node.children {
            let (child_depth, span) = self.check_node(child, false, leaves, count)?;
            if *depth.get_or_insert(child_depth) != child_depth {
                return Err(invalid(format!("leaves under node {} sit at different depths", id)));
            }
            spans.push(span);
        }

        for (i, separator) in items.iter().enumerate() {
            let left_ok = spans[i].is_none_or(|(_, max)| max < separator);
            let right_ok = spans[i + 1].is_none_or(|(min, _)| {
                if L::LINKED { min >= separator } else { min > separator }
            });
            if !left_ok || !right_ok {
                return Err(invalid(format!("separator {} of node {} is misplaced", i, id)));
            }
        }

        let low = spans.first().copied().flatten().map(|(min, _)| min);
        let high = spans.last().copied().flatten().map(|(_, max)| max);
        let span = match (low, high) {
            (Some(min), Some(max)) if L::LINKED => Some((min, max)),
            (Some(min), Some(max)) => Some((min.min(&items[0]), max.max(&items[items.len() - 1]))),
            _ => None,
        };
        Ok((depth.unwrap_or(0) + 1, span))
    }

    /// The chain must visit every leaf exactly once, left to right, in
    /// ascending key order
    fn check_chain(&self, leaves: &[NodeId]) -> Result<(), BTreeError> {
        let mut walked = Vec::with_capacity(leaves.len());
        let mut at = leaves.first().copied();
        while let Some(id) = at {
            if walked.len() > leaves.len() {
                return Err(invalid("leaf chain does not terminate".to_string()));
            }
            walked.push(id);
            at = self.node(id).next;
        }
        if walked != leaves {
            return Err(invalid("leaf chain does not follow leaf order".to_string()));
        }

        let mut previous: Option<&T> = None;
        for &id in leaves {
            for item in &self.node(id).items {
                if previous.is_some_and(|prev| prev >= item) {
                    return Err(invalid("leaf chain is not ascending".to_string()));
                }
                previous = Some(item);
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> BTreeError {
    BTreeError::InvalidStructure(reason)
}
