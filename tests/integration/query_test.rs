use anyhow::Result;

use kestreldb::QueryError;

#[path = "../common/mod.rs"]
mod common;
use common::{create_employee_table, create_test_database, select_where, strings, EMPLOYEE_ROWS};

#[test]
fn test_and_binds_tighter_than_or() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    // Danson works in Geology, so the `and` branch matches nothing
    let result = select_where(
        &table,
        &["lname", "dept"],
        "dept = Math or lname = Danson and dept = English",
    )?;

    assert_eq!(result.field_names(), &strings(&["lname", "dept"])[..]);
    assert_eq!(result.rows()?, vec![strings(&["Miller", "Math"])]);
    Ok(())
}

#[test]
fn test_or_of_two_equalities() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let result = select_where(&table, &["lname", "dept"], "dept = Math or lname = Danson")?;

    assert_eq!(
        result.rows()?,
        vec![strings(&["Miller", "Math"]), strings(&["Danson", "Geology"])]
    );
    Ok(())
}

#[test]
fn test_parentheses_override_precedence() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let result = select_where(
        &table,
        &["fname"],
        "( dept = Math or lname = Doe ) and fname > 15",
    )?;
    assert_eq!(result.rows()?, vec![strings(&["20"])]);

    let result = select_where(&table, &["fname"], "dept = Math or lname = Doe and fname > 15")?;
    assert_eq!(result.rows()?, vec![strings(&["20"])]);

    let result = select_where(&table, &["fname"], "lname = Doe and fname > 15 or dept = Math")?;
    assert_eq!(result.rows()?, vec![strings(&["20"])]);
    Ok(())
}

#[test]
fn test_select_all_returns_every_row() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let all = table.select_all()?;
    assert_eq!(all.row_count(), 4);
    let expected: Vec<Vec<String>> = EMPLOYEE_ROWS.iter().map(|row| strings(row)).collect();
    assert_eq!(all.rows()?, expected);
    Ok(())
}

#[test]
fn test_select_without_conditions() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let everything = table.select(&strings(&["*"]), &[])?;
    assert_eq!(everything.field_names(), table.field_names());
    assert_eq!(everything.row_count(), 4);

    let no_columns = table.select(&[], &[])?;
    assert_eq!(no_columns.field_names(), table.field_names());

    let reordered = table.select(&strings(&["dept", "fname"]), &[])?;
    assert_eq!(reordered.rows()?[0], strings(&["CS", "10"]));
    Ok(())
}

#[test]
fn test_repeated_columns_are_malformed() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    for columns in [&["lname", "lname"][..], &["*", "dept"]] {
        let result = table.select(&strings(columns), &[]);
        assert!(matches!(result, Err(QueryError::MalformedCommand(_))), "{:?}", columns);
    }
    Ok(())
}

#[test]
fn test_range_predicates() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let fnames = |condition: &str| -> Result<Vec<String>> {
        let result = select_where(&table, &["fname"], condition)?;
        Ok(result.rows()?.into_iter().flatten().collect())
    };

    assert_eq!(fnames("fname > 20")?, strings(&["30", "40"]));
    assert_eq!(fnames("fname >= 20")?, strings(&["20", "30", "40"]));
    assert_eq!(fnames("fname < 30")?, strings(&["10", "20"]));
    assert_eq!(fnames("fname <= 30")?, strings(&["10", "20", "30"]));
    assert_eq!(fnames("fname > 40")?, Vec::<String>::new());
    assert_eq!(fnames("lname < H")?, strings(&["40", "10"]));
    Ok(())
}

#[test]
fn test_comparisons_are_lexicographic() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let mut table = database.create_table("sizes", strings(&["n"]))?;
    for n in ["9", "100", "25"] {
        table.insert_into(strings(&[n]))?;
    }

    let result = select_where(&table, &["n"], "n < 25")?;
    assert_eq!(result.rows()?, vec![strings(&["100"])]);
    Ok(())
}

#[test]
fn test_equality_with_absent_literal() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let result = select_where(&table, &["*"], "dept = Art")?;
    assert!(result.is_empty());
    assert_eq!(result.field_names(), table.field_names());
    Ok(())
}

#[test]
fn test_logical_keywords_ignore_case() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let result = select_where(&table, &["lname"], "dept = CS OR dept = Math AND fname = 20")?;
    assert_eq!(result.rows()?, vec![strings(&["Doe"]), strings(&["Miller"])]);
    Ok(())
}

#[test]
fn test_malformed_conditions() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    for condition in [
        "salary = 10",
        "dept =",
        "dept = Math or",
        "dept Math",
        "and",
        "( dept = Math",
        "dept = Math )",
    ] {
        let outcome = select_where(&table, &["*"], condition);
        let err = outcome.expect_err(condition);
        assert!(
            matches!(err.downcast_ref::<QueryError>(), Some(QueryError::MalformedCommand(_))),
            "{} gave {:?}",
            condition,
            err
        );
    }
    Ok(())
}

#[test]
fn test_unknown_column_is_malformed() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let result = table.select(&strings(&["salary"]), &[]);
    assert!(matches!(result, Err(QueryError::MalformedCommand(_))));
    Ok(())
}

#[test]
fn test_results_are_independent_tables() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let table = create_employee_table(&database)?;

    let first = select_where(&table, &["lname"], "dept = CS")?;
    let second = select_where(&table, &["lname"], "dept = Math")?;

    assert_ne!(first.name(), second.name());
    assert!(first.name().starts_with("employee_temp"));
    assert!(first.path().starts_with(database.config().scratch_dir()));
    assert_eq!(first.rows()?, vec![strings(&["Doe"])]);
    assert_eq!(second.rows()?, vec![strings(&["Miller"])]);

    // a result can be queried like any other table
    let nested = select_where(&second, &["lname"], "lname = Miller")?;
    assert_eq!(nested.row_count(), 1);
    Ok(())
}
