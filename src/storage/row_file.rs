use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::common::types::{RecordNo, HEADER_RECNO, ROW_BYTES};
use crate::storage::error::StorageError;
use crate::storage::record::Record;

/// Binary file of fixed-width rows addressed by record number.
///
/// Record `n` starts at byte `n * ROW_BYTES`; record 0 is the header. The file
/// is opened for each operation and closed again afterwards.
#[derive(Debug, Clone)]
pub struct RowFile {
    path: PathBuf,
}

impl RowFile {
    /// Create or truncate the file at `path` and write `header` as record 0
    pub fn create(path: impl AsRef<Path>, header: &Record) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(&header.encode())?;
        file.flush()?;

        debug!("created row file {}", path.display());
        Ok(Self { path })
    }

    /// Attach to an existing file; fails if it cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        File::open(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header row holding the field names
    pub fn header(&self) -> Result<Option<Record>, StorageError> {
        self.read(HEADER_RECNO)
    }

    /// Write `record` after the last whole row and return its record number
    pub fn append(&self, record: &Record) -> Result<RecordNo, StorageError> {
        let mut file = OpenOptions::new().write(true).open(&self.path)?;

        let file_size = file.metadata()?.len();
        let recno = (file_size / ROW_BYTES as u64) as RecordNo;

        file.seek(SeekFrom::Start(Self::offset(recno)))?;
        file.write_all(&record.encode())?;
        file.flush()?;

        debug!("appended record {} to {}", recno, self.path.display());
        Ok(recno)
    }

    /// Read record `recno`; `None` when the file holds no whole row there
    pub fn read(&self, recno: RecordNo) -> Result<Option<Record>, StorageError> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(Self::offset(recno)))?;

        let mut buffer = Vec::with_capacity(ROW_BYTES);
        file.take(ROW_BYTES as u64).read_to_end(&mut buffer)?;
        if buffer.len() < ROW_BYTES {
            return Ok(None);
        }
        Record::decode(&buffer, recno).map(Some)
    }

    fn offset(recno: RecordNo) -> u64 {
        (recno * ROW_BYTES) as u64
    }
}
