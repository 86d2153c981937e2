// Kestrel Database Engine

pub mod catalog;
pub mod common;
pub mod index;
pub mod query;
pub mod storage;

// Re-export key items for convenient access
pub use catalog::{Database, Relation};
pub use common::DatabaseConfig;
pub use index::{BPlusTree, KeyedIndex, MultiIndex, SetTree};
pub use query::executor::result::{CommandOutcome, QueryError, QueryResult};
pub use query::{CommandKind, ExecutionEngine, ParsedCommand};
pub use storage::{Record, RowFile, StorageError};
