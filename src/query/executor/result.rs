// Query Result Implementation
//
// Error and outcome types returned by command execution.

use std::fmt;

use thiserror::Error;

use crate::catalog::Relation;
use crate::common::types::RecordNo;
use crate::index::BTreeError;
use crate::storage::StorageError;

/// Errors raised while executing a command
#[derive(Error, Debug)]
pub enum QueryError {
    /// Key absent from an index, or a table without a backing file
    #[error("Not found: {0}")]
    NotFound(String),
    /// Condition or column list that cannot be evaluated
    #[error("Malformed command: {0}")]
    MalformedCommand(String),
    /// Row or schema that does not fit the declared fields
    #[error("Schema violation: {0}")]
    SchemaViolation(String),
    /// Tree self-check failure
    #[error("Structural invariant violated: {0}")]
    StructuralInvariantViolation(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<BTreeError> for QueryError {
    fn from(err: BTreeError) -> Self {
        match err {
            BTreeError::KeyNotFound => QueryError::NotFound(err.to_string()),
            BTreeError::InvalidStructure(reason) => QueryError::StructuralInvariantViolation(reason),
        }
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// What a successfully executed command produced
#[derive(Debug)]
pub enum CommandOutcome {
    Created { table: String },
    Inserted { table: String, recno: RecordNo },
    Selected(Relation),
}

impl CommandOutcome {
    /// Text printed for this outcome; a selected relation's rows are read
    /// here so that I/O failures surface as errors
    pub fn render(&self) -> QueryResult<String> {
        match self {
            CommandOutcome::Selected(relation) => relation.render(),
            other => Ok(other.to_string()),
        }
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Created { table } => writeln!(f, "Created table {}", table),
            CommandOutcome::Inserted { table, recno } => {
                writeln!(f, "Inserted record {} into {}", recno, table)
            }
            CommandOutcome::Selected(relation) => write!(f, "{}", relation),
        }
    }
}
