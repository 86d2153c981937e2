//! Parsed command: the boundary type handed over by a parser front end

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Create,
    /// Synonym of `Create`
    Make,
    Insert,
    Select,
}

/// One command with its table, field list and condition tokens.
///
/// `fields` holds the field names for create, the row values for insert and
/// the projected columns for select. `conditions` is the infix token stream
/// of a select's filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    pub table: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl ParsedCommand {
    pub fn new(kind: CommandKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            fields: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn create(table: impl Into<String>, fields: &[&str]) -> Self {
        Self::new(CommandKind::Create, table).with_fields(fields)
    }

    pub fn insert(table: impl Into<String>, values: &[&str]) -> Self {
        Self::new(CommandKind::Insert, table).with_fields(values)
    }

    pub fn select(table: impl Into<String>, columns: &[&str]) -> Self {
        Self::new(CommandKind::Select, table).with_fields(columns)
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Set the condition tokens by splitting `condition` on whitespace
    pub fn with_condition(mut self, condition: &str) -> Self {
        self.conditions = condition.split_whitespace().map(str::to_string).collect();
        self
    }
}
