//! Relation Module
//!
//! A relation is a schema, a row file and one inverted index per field. The
//! indices live in memory only: opening a relation replays its row file to
//! rebuild them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

use super::schema::Schema;
use crate::common::config::DatabaseConfig;
use crate::common::types::{RecordNo, RowSet};
use crate::index::{KeyedIndex, MultiIndex};
use crate::query::executor::condition;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::storage::{Record, RowFile, StorageError};

/// Serial appended to result relation names
static NEXT_RESULT_ID: AtomicU64 = AtomicU64::new(1);

/// Inverted index of one field: value to the records holding it
pub type FieldIndex = MultiIndex<String, RecordNo>;

#[derive(Debug)]
pub struct Relation {
    name: String,
    path: PathBuf,
    config: DatabaseConfig,
    schema: Schema,
    indices: KeyedIndex<String, FieldIndex>,
    row_count: usize,
    /// `None` when the backing file could not be opened
    file: Option<RowFile>,
}

impl Relation {
    /// Create a fresh relation, truncating any file of the same name
    pub fn create(name: &str, fields: Vec<String>, config: &DatabaseConfig) -> QueryResult<Self> {
        let schema = Schema::new(fields)?;
        let path = config.table_path(name);
        let file = RowFile::create(&path, &schema.header()?)?;

        let mut indices = KeyedIndex::new();
        for field in schema.fields() {
            indices.insert(field.clone(), FieldIndex::new());
        }

        debug!("created table {} with fields {:?}", name, schema.fields());
        Ok(Self {
            name: name.to_string(),
            path,
            config: config.clone(),
            schema,
            indices,
            row_count: 0,
            file: Some(file),
        })
    }

    /// Open an existing relation and rebuild its indices from the row file.
    ///
    /// A file that cannot be opened yields an empty relation with a warning.
    pub fn open(name: &str, config: &DatabaseConfig) -> QueryResult<Self> {
        let path = config.table_path(name);
        let file = match RowFile::open(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!("{} does not exist: {}", path.display(), err);
                return Ok(Self::detached(name, path, config));
            }
        };
        let Some(header) = file.header()? else {
            warn!("{} has no header row", path.display());
            return Ok(Self::detached(name, path, config));
        };

        let mut relation = Self {
            name: name.to_string(),
            path,
            config: config.clone(),
            schema: Schema::from_header(header)?,
            indices: KeyedIndex::new(),
            row_count: 0,
            file: None,
        };
        for field in relation.schema.fields() {
            relation.indices.insert(field.clone(), FieldIndex::new());
        }

        let mut recno = 1;
        while let Some(record) = file.read(recno)? {
            let record = record.fit_to(relation.schema.width());
            relation.index_row(recno, record.fields());
            relation.row_count = recno;
            recno += 1;
        }
        relation.file = Some(file);

        debug!("opened table {} with {} records", name, relation.row_count);
        Ok(relation)
    }

    fn detached(name: &str, path: PathBuf, config: &DatabaseConfig) -> Self {
        Self {
            name: name.to_string(),
            path,
            config: config.clone(),
            schema: Schema::default(),
            indices: KeyedIndex::new(),
            row_count: 0,
            file: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing row file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn field_names(&self) -> &[String] {
        self.schema.fields()
    }

    /// Number of records, also the highest record number in use
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Inverted index of `field`, if declared
    pub fn field_index(&self, field: &str) -> Option<&FieldIndex> {
        self.indices.at(&field.to_string()).ok()
    }

    /// Append a row and index every value; returns the new record number.
    ///
    /// Rows shorter than the schema are padded with empty values.
    pub fn insert_into(&mut self, mut values: Vec<String>) -> QueryResult<RecordNo> {
        let file = self.file.as_ref().ok_or_else(|| {
            QueryError::NotFound(format!("table {} has no backing file", self.name))
        })?;
        if values.len() > self.schema.width() {
            return Err(QueryError::SchemaViolation(format!(
                "{} values for {} fields of {}",
                values.len(),
                self.schema.width(),
                self.name
            )));
        }

        values.resize(self.schema.width(), String::new());
        let record = Record::new(values).map_err(|err| match err {
            StorageError::TooManyFields { .. }
            | StorageError::FieldTooWide { .. }
            | StorageError::EmbeddedNul { .. } => {
                QueryError::SchemaViolation(err.to_string())
            }
            other => QueryError::Storage(other),
        })?;
        let recno = file.append(&record)?;

        self.index_row(recno, record.fields());
        self.row_count = recno;
        Ok(recno)
    }

    fn index_row(&mut self, recno: RecordNo, values: &[String]) {
        for (field, value) in self.schema.fields().iter().zip(values) {
            self.indices
                .get_or_create(field.clone())
                .insert(value.clone(), recno);
        }
    }

    /// Project `columns` of the rows matching `conditions` into a new result
    /// relation. No conditions selects every row.
    pub fn select(&self, columns: &[String], conditions: &[String]) -> QueryResult<Relation> {
        let ordinals = self.schema.resolve(columns)?;
        let rows: RowSet = if conditions.is_empty() {
            (1..=self.row_count).collect()
        } else {
            condition::matching_rows(conditions, self)?
        };

        let fields = ordinals
            .iter()
            .map(|&ordinal| self.schema.fields()[ordinal].clone())
            .collect();
        let result_name = format!(
            "{}_temp{}",
            self.name,
            NEXT_RESULT_ID.fetch_add(1, Ordering::SeqCst)
        );
        let mut result = Relation::create(&result_name, fields, &self.config.scratch_config())?;

        for recno in rows {
            let record = self.read_row(recno)?;
            let projected = ordinals
                .iter()
                .map(|&ordinal| record.fields()[ordinal].clone())
                .collect();
            result.insert_into(projected)?;
        }

        debug!("selected {} records from {} into {}", result.row_count, self.name, result.name);
        Ok(result)
    }

    /// Every row and column, by reopening the relation from its file
    pub fn select_all(&self) -> QueryResult<Relation> {
        Relation::open(&self.name, &self.config)
    }

    /// All rows in record order, each as wide as the schema
    pub fn rows(&self) -> QueryResult<Vec<Vec<String>>> {
        (1..=self.row_count)
            .map(|recno| self.read_row(recno).map(Record::into_fields))
            .collect()
    }

    fn read_row(&self, recno: RecordNo) -> QueryResult<Record> {
        let missing = || QueryError::NotFound(format!("record {} of {}", recno, self.name));
        let file = self.file.as_ref().ok_or_else(missing)?;
        let record = file.read(recno)?.ok_or_else(missing)?;
        Ok(record.fit_to(self.schema.width()))
    }

    /// Check the index trees and that every field's index lists each record
    /// exactly once
    pub fn check_integrity(&self) -> QueryResult<()> {
        self.indices.validate()?;
        for field in self.schema.fields() {
            let index = self.field_index(field).ok_or_else(|| {
                QueryError::StructuralInvariantViolation(format!("field {} has no index", field))
            })?;
            index.validate()?;

            let mut seen: Vec<RecordNo> = index.iter().flat_map(|(_, rows)| rows.iter().copied()).collect();
            seen.sort_unstable();
            if seen != (1..=self.row_count).collect::<Vec<_>>() {
                return Err(QueryError::StructuralInvariantViolation(format!(
                    "index of {} does not cover records 1..={} exactly once",
                    field, self.row_count
                )));
            }
        }
        Ok(())
    }
}

impl Relation {
    /// Table listing of every row; fails if the row file cannot be read
    pub fn render(&self) -> QueryResult<String> {
        let rows = self.rows()?;
        Ok(TableView { relation: self, rows: &rows }.to_string())
    }
}

struct TableView<'a> {
    relation: &'a Relation,
    rows: &'a [Vec<String>],
}

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relation = self.relation;
        write!(f, "\n\nTable name: {}, records: {}\n\n", relation.name, relation.row_count)?;
        write!(f, "{:<11}", "  Record ")?;
        for name in relation.schema.fields() {
            write!(f, "{:<16}", name)?;
        }
        writeln!(f, "\n  {}", "-".repeat(85))?;
        writeln!(f)?;

        for (i, row) in self.rows.iter().enumerate() {
            write!(f, "{:>7}{:<4}", i + 1, ".")?;
            for value in row {
                write!(f, "{:<16}", value)?;
            }
            writeln!(f)?;
        }
        write!(f, "\n\n\n")
    }
}

/// Same listing as [`Relation::render`]; an unreadable row file is reported
/// inline instead of failing the formatter
impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rows() {
            Ok(rows) => write!(f, "{}", TableView { relation: self, rows: &rows }),
            Err(err) => writeln!(f, "Table name: {}, rows unavailable: {}", self.name, err),
        }
    }
}
