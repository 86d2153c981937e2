use thiserror::Error;

use crate::common::types::RecordNo;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Row has {count} fields, at most {max} fit")]
    TooManyFields { count: usize, max: usize },
    #[error("Field {field} is {len} bytes wide, at most {max} fit")]
    FieldTooWide { field: usize, len: usize, max: usize },
    #[error("Field {field} contains a NUL byte")]
    EmbeddedNul { field: usize },
    #[error("Record {recno} is not valid UTF-8")]
    InvalidEncoding { recno: RecordNo },
}
