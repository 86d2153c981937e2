// Query Executor Module
//
// Turns parsed commands into table operations: condition compilation,
// row-set algebra and command dispatch.

pub mod condition;
pub mod engine;
pub mod result;
pub mod set_ops;

pub use self::engine::ExecutionEngine;
pub use self::result::{CommandOutcome, QueryError, QueryResult};
