//! Catalog Management Module
//!
//! Tables are located by name under the configured data directory.

pub mod schema;
pub mod table;

pub use self::schema::Schema;
pub use self::table::{FieldIndex, Relation};

use crate::common::config::DatabaseConfig;
use crate::query::executor::result::QueryResult;

/// Entry point for creating and opening tables
#[derive(Debug, Clone, Default)]
pub struct Database {
    config: DatabaseConfig,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Create `name` with the given fields, replacing any existing table
    pub fn create_table(&self, name: &str, fields: Vec<String>) -> QueryResult<Relation> {
        Relation::create(name, fields, &self.config)
    }

    /// Open `name`, rebuilding its indices. A missing table opens empty.
    pub fn open_table(&self, name: &str) -> QueryResult<Relation> {
        Relation::open(name, &self.config)
    }
}
