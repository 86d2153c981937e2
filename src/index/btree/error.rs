use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    #[error("Key not found")]
    KeyNotFound,

    #[error("Invalid tree structure: {0}")]
    InvalidStructure(String),
}
