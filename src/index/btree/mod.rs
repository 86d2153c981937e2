//! Balanced multiway search tree
//!
//! One tree core serves two layouts:
//! - [`Linked`]: B+ layout. Leaves hold every item, internal nodes hold
//!   navigation copies, and all leaves are chained in ascending order so
//!   cursors can walk the tree without re-descending.
//! - [`Plain`]: classic B-tree layout without a leaf chain, used as a
//!   throwaway ordered set for membership tests.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`].

mod error;
mod node;
mod tree;

pub use error::BTreeError;
pub use node::{Node, NodeId};
pub use tree::{BTree, Cursor, Iter};

/// Minimum number of items in every non-root node
pub const MINIMUM: usize = 1;

/// Maximum number of items in any node
pub const MAXIMUM: usize = 2 * MINIMUM;

/// Selects how a [`BTree`] arranges its items
pub trait Layout {
    /// Whether leaves carry every item and are chained left to right
    const LINKED: bool;
}

/// B+ layout with a leaf chain
#[derive(Debug, Clone, Copy)]
pub enum Linked {}

/// Classic B-tree layout, no leaf chain
#[derive(Debug, Clone, Copy)]
pub enum Plain {}

impl Layout for Linked {
    const LINKED: bool = true;
}

impl Layout for Plain {
    const LINKED: bool = false;
}

/// Items a tree can hold.
///
/// Internal nodes of the [`Linked`] layout keep separator copies that are
/// only ever compared, never read for their payload. Items carrying a
/// payload should return a key-only copy from [`TreeItem::separator`].
pub trait TreeItem: Ord + Clone {
    fn separator(&self) -> Self {
        self.clone()
    }
}

macro_rules! impl_tree_item {
    ($($ty:ty),*) => {
        $(impl TreeItem for $ty {})*
    };
}

impl_tree_item!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, bool, String);

impl TreeItem for &str {}

/// Ordered tree used by the keyed indices
pub type BPlusTree<T> = BTree<T, Linked>;

/// Ordered set used for one-shot membership tests
pub type SetTree<T> = BTree<T, Plain>;
