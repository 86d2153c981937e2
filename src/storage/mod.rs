//! Row storage: fixed-width record codec and record-number-addressed files

pub mod error;
pub mod record;
pub mod row_file;

pub use error::StorageError;
pub use record::Record;
pub use row_file::RowFile;
