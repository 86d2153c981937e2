//! Field list of a relation and the name to ordinal mapping

use crate::common::types::ROW_MAX;
use crate::index::KeyedIndex;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::storage::record::{Record, VALUE_MAX};

/// Wildcard column selecting every field
pub const WILDCARD: &str = "*";

/// Ordered field names of a relation
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<String>,
    ordinals: KeyedIndex<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting empty, duplicate, oversized or NUL bearing names
    pub fn new(fields: Vec<String>) -> QueryResult<Self> {
        if fields.len() > ROW_MAX {
            return Err(QueryError::SchemaViolation(format!(
                "{} fields declared, at most {} allowed",
                fields.len(),
                ROW_MAX
            )));
        }

        let mut ordinals = KeyedIndex::new();
        for (ordinal, name) in fields.iter().enumerate() {
            if name.is_empty() || name.len() > VALUE_MAX {
                return Err(QueryError::SchemaViolation(format!(
                    "field {} must be 1 to {} bytes long",
                    ordinal, VALUE_MAX
                )));
            }
            if name.contains('\0') {
                return Err(QueryError::SchemaViolation(format!(
                    "field {} contains a NUL byte",
                    ordinal
                )));
            }
            if ordinals.contains(name) {
                return Err(QueryError::SchemaViolation(format!("duplicate field {}", name)));
            }
            ordinals.insert(name.clone(), ordinal);
        }
        Ok(Self { fields, ordinals })
    }

    /// Rebuild a schema from a header row; the names run up to the first empty slot
    pub fn from_header(header: Record) -> QueryResult<Self> {
        let fields = header
            .into_fields()
            .into_iter()
            .take_while(|name| !name.is_empty())
            .collect();
        Self::new(fields)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of declared fields
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn ordinal(&self, field: &str) -> Option<usize> {
        self.ordinals.at(&field.to_string()).ok().copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.ordinal(field).is_some()
    }

    /// Map a column list to ordinals. An empty list or `*` selects every
    /// field. An undeclared column, or a field named twice (directly or
    /// through `*`), is malformed.
    pub fn resolve(&self, columns: &[String]) -> QueryResult<Vec<usize>> {
        if columns.is_empty() {
            return Ok((0..self.width()).collect());
        }

        let mut ordinals: Vec<usize> = Vec::with_capacity(columns.len());
        for column in columns {
            let expanded = if column == WILDCARD {
                (0..self.width()).collect()
            } else {
                let ordinal = self.ordinal(column).ok_or_else(|| {
                    QueryError::MalformedCommand(format!("unknown column {}", column))
                })?;
                vec![ordinal]
            };

            for ordinal in expanded {
                if ordinals.contains(&ordinal) {
                    return Err(QueryError::MalformedCommand(format!(
                        "column {} selected twice",
                        self.fields[ordinal]
                    )));
                }
                ordinals.push(ordinal);
            }
        }
        Ok(ordinals)
    }

    /// Header row written as record 0
    pub fn header(&self) -> QueryResult<Record> {
        Ok(Record::new(self.fields.clone())?)
    }
}
