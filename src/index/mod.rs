pub mod btree;
pub mod map;
pub mod multimap;

pub use btree::{BPlusTree, BTreeError, Cursor, SetTree};
pub use map::KeyedIndex;
pub use multimap::MultiIndex;
