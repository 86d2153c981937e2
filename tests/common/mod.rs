#![allow(dead_code)]

use anyhow::Result;
use tempfile::TempDir;

use kestreldb::{Database, DatabaseConfig, Relation};

// Create a database rooted in a fresh temporary directory
pub fn create_test_database() -> Result<(Database, TempDir)> {
    let dir = tempfile::tempdir()?;
    let database = Database::new(DatabaseConfig::new(dir.path()));
    Ok((database, dir))
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub const EMPLOYEE_FIELDS: [&str; 3] = ["fname", "lname", "dept"];

pub const EMPLOYEE_ROWS: [[&str; 3]; 4] = [
    ["10", "Doe", "CS"],
    ["20", "Miller", "Math"],
    ["30", "Harrison", "English"],
    ["40", "Danson", "Geology"],
];

// Create the employee table and fill it with the four fixture rows
pub fn create_employee_table(database: &Database) -> Result<Relation> {
    let mut table = database.create_table("employee", strings(&EMPLOYEE_FIELDS))?;
    for row in EMPLOYEE_ROWS {
        table.insert_into(strings(&row))?;
    }
    Ok(table)
}

// Run a select with a whitespace separated condition
pub fn select_where(table: &Relation, columns: &[&str], condition: &str) -> Result<Relation> {
    let conditions: Vec<String> = condition.split_whitespace().map(str::to_string).collect();
    Ok(table.select(&strings(columns), &conditions)?)
}
