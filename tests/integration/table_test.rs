use anyhow::Result;
use rand::prelude::*;

use kestreldb::common::types::ROW_BYTES;
use kestreldb::QueryError;

#[path = "../common/mod.rs"]
mod common;
use common::{create_employee_table, create_test_database, strings, EMPLOYEE_FIELDS};

#[test]
fn test_reopen_reproduces_rows_and_indices() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let mut table = database.create_table("people", strings(&["id", "city", "team"]))?;

    let cities = ["Austin", "Boston", "Chicago", "Denver"];
    let mut rng = StdRng::seed_from_u64(42);
    let mut expected = Vec::new();
    for id in 0..60 {
        let row = vec![
            id.to_string(),
            cities[rng.gen_range(0..cities.len())].to_string(),
            format!("t{}", rng.gen_range(0..5)),
        ];
        let recno = table.insert_into(row.clone())?;
        assert_eq!(recno, id + 1);
        expected.push(row);
    }

    let reopened = database.open_table("people")?;
    assert_eq!(reopened.row_count(), 60);
    assert_eq!(reopened.field_names(), table.field_names());
    assert_eq!(reopened.rows()?, expected);
    reopened.check_integrity()?;

    // every value maps to exactly the records holding it
    let city_index = reopened.field_index("city").expect("city is declared");
    for city in cities {
        let holders: Vec<usize> = expected
            .iter()
            .enumerate()
            .filter(|(_, row)| row[1] == city)
            .map(|(i, _)| i + 1)
            .collect();
        match city_index.get(&city.to_string()) {
            Ok(recnos) => assert_eq!(recnos, &holders[..]),
            Err(_) => assert!(holders.is_empty()),
        }
    }
    Ok(())
}

#[test]
fn test_file_layout() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let path = database.config().table_path("employee");
    assert_eq!(table.path(), path.as_path());
    assert_eq!(std::fs::metadata(&path)?.len(), (5 * ROW_BYTES) as u64);
    Ok(())
}

#[test]
fn test_open_missing_table_is_empty() -> Result<()> {
    let (database, _dir) = create_test_database()?;

    let mut table = database.open_table("ghost")?;
    assert!(table.is_empty());
    assert!(table.field_names().is_empty());
    assert!(table.rows()?.is_empty());

    let result = table.insert_into(strings(&["x"]));
    assert!(matches!(result, Err(QueryError::NotFound(_))));
    Ok(())
}

#[test]
fn test_create_replaces_existing_table() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    create_employee_table(&database)?;

    let table = database.create_table("employee", strings(&["id"]))?;
    assert!(table.is_empty());

    let reopened = database.open_table("employee")?;
    assert_eq!(reopened.field_names(), &strings(&["id"])[..]);
    assert_eq!(reopened.row_count(), 0);
    Ok(())
}

#[test]
fn test_schema_violations() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let mut table = create_employee_table(&database)?;

    let too_long = table.insert_into(strings(&["50", "Lee", "Art", "extra"]));
    assert!(matches!(too_long, Err(QueryError::SchemaViolation(_))));

    let too_wide = table.insert_into(vec!["x".repeat(500)]);
    assert!(matches!(too_wide, Err(QueryError::SchemaViolation(_))));

    let duplicate = database.create_table("bad", strings(&["a", "a"]));
    assert!(matches!(duplicate, Err(QueryError::SchemaViolation(_))));

    // nothing was written by the rejected rows
    assert_eq!(table.row_count(), 4);
    assert_eq!(database.open_table("employee")?.row_count(), 4);
    Ok(())
}

#[test]
fn test_nul_in_value_is_rejected() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let mut table = database.create_table("t", strings(&["a"]))?;

    let result = table.insert_into(strings(&["x\0y"]));
    assert!(matches!(result, Err(QueryError::SchemaViolation(_))));
    assert!(table.field_index("a").expect("a is declared").is_empty());

    table.insert_into(strings(&["xy"]))?;
    let reopened = database.open_table("t")?;
    assert_eq!(reopened.rows()?, table.rows()?);
    assert_eq!(reopened.rows()?, vec![strings(&["xy"])]);
    reopened.check_integrity()?;
    Ok(())
}

#[test]
fn test_short_rows_are_padded() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let mut table = database.create_table("employee", strings(&EMPLOYEE_FIELDS))?;

    table.insert_into(strings(&["50"]))?;
    let reopened = database.open_table("employee")?;
    assert_eq!(reopened.rows()?, vec![strings(&["50", "", ""])]);
    reopened.check_integrity()?;
    Ok(())
}

#[test]
fn test_display_lists_records() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let text = table.to_string();
    assert!(text.contains("Table name: employee, records: 4"));
    assert!(text.contains(&format!("      4.   {:<16}{:<16}{:<16}", "40", "Danson", "Geology")));
    Ok(())
}
