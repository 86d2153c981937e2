// Query Module
//
// Parsed command boundary type and its execution.

pub mod command;
pub mod executor;

pub use command::{CommandKind, ParsedCommand};
pub use executor::engine::ExecutionEngine;
pub use executor::result::QueryResult;
