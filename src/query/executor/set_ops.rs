//! Row-set combination for `and` / `or`

use crate::common::types::{RecordNo, RowSet};
use crate::index::SetTree;

fn membership(rows: &[RecordNo]) -> SetTree<RecordNo> {
    let mut tree = SetTree::new();
    for &recno in rows {
        tree.insert(recno);
    }
    tree
}

/// Rows of `v1` also present in `v2`, in `v1` order
pub fn and_rows(v1: &[RecordNo], v2: &[RecordNo]) -> RowSet {
    let tree = membership(v2);
    v1.iter().copied().filter(|recno| tree.contains(recno)).collect()
}

/// Rows of `v1` missing from `v2`, followed by all of `v2`
pub fn or_rows(v1: &[RecordNo], v2: &[RecordNo]) -> RowSet {
    let tree = membership(v2);
    let mut rows: RowSet = v1.iter().copied().filter(|recno| !tree.contains(recno)).collect();
    rows.extend_from_slice(v2);
    rows
}
