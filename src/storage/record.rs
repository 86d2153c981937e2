//! Fixed-width row codec.
//!
//! A row is `ROW_MAX` slots of `COL_MAX` bytes each. A value is stored at the
//! start of its slot and the rest of the slot is NUL filled, so a value can
//! use at most `COL_MAX - 1` bytes and may not contain NUL itself. Unused
//! slots are all NUL and decode as empty strings.

use crate::common::types::{RecordNo, COL_MAX, ROW_BYTES, ROW_MAX};
use crate::storage::error::StorageError;

/// Largest value that fits in a slot
pub const VALUE_MAX: usize = COL_MAX - 1;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    /// Build a record, checking that it fits the row geometry
    pub fn new(fields: Vec<String>) -> Result<Self, StorageError> {
        if fields.len() > ROW_MAX {
            return Err(StorageError::TooManyFields {
                count: fields.len(),
                max: ROW_MAX,
            });
        }
        if let Some((field, value)) = fields.iter().enumerate().find(|(_, v)| v.len() > VALUE_MAX) {
            return Err(StorageError::FieldTooWide {
                field,
                len: value.len(),
                max: VALUE_MAX,
            });
        }
        if let Some(field) = fields.iter().position(|v| v.contains('\0')) {
            return Err(StorageError::EmbeddedNul { field });
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize into exactly `ROW_BYTES` bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; ROW_BYTES];
        for (i, value) in self.fields.iter().enumerate() {
            let start = i * COL_MAX;
            buffer[start..start + value.len()].copy_from_slice(value.as_bytes());
        }
        buffer
    }

    /// Decode a full row image; always yields `ROW_MAX` fields
    pub fn decode(bytes: &[u8], recno: RecordNo) -> Result<Self, StorageError> {
        let fields = bytes
            .chunks(COL_MAX)
            .take(ROW_MAX)
            .map(|slot| {
                let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
                String::from_utf8(slot[..end].to_vec())
                    .map_err(|_| StorageError::InvalidEncoding { recno })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields })
    }

    /// Keep only the first `width` fields, padding with empty strings if short
    pub fn fit_to(mut self, width: usize) -> Self {
        self.fields.resize(width, String::new());
        self
    }
}
