use anyhow::Result;

use kestreldb::{CommandKind, CommandOutcome, ExecutionEngine, ParsedCommand, QueryError};

#[path = "../common/mod.rs"]
mod common;
use common::{create_test_database, strings};

#[test]
fn test_create_insert_select() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let engine = ExecutionEngine::new(database);

    let created = engine.execute(&ParsedCommand::create("employee", &["fname", "lname", "dept"]))?;
    assert!(matches!(created, CommandOutcome::Created { ref table } if table == "employee"));

    for (i, row) in [["10", "Doe", "CS"], ["20", "Miller", "Math"]].iter().enumerate() {
        let inserted = engine.execute(&ParsedCommand::insert("employee", row))?;
        assert!(matches!(inserted, CommandOutcome::Inserted { recno, .. } if recno == i + 1));
    }

    let selected = engine.execute(&ParsedCommand::select("employee", &["lname"]).with_condition("dept = Math"))?;
    let text = selected.render()?;
    assert!(text.contains("records: 1"));
    assert!(text.contains("Miller"));
    match selected {
        CommandOutcome::Selected(result) => assert_eq!(result.rows()?, vec![strings(&["Miller"])]),
        other => panic!("unexpected outcome {:?}", other),
    }
    Ok(())
}

#[test]
fn test_make_is_create() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let engine = ExecutionEngine::new(database);

    let make = ParsedCommand::new(CommandKind::Make, "t").with_fields(&["a"]);
    engine.execute(&make)?;
    assert_eq!(engine.database().open_table("t")?.field_names(), &strings(&["a"])[..]);
    Ok(())
}

#[test]
fn test_batch_stops_at_first_error() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let engine = ExecutionEngine::new(database);

    let commands = vec![
        ParsedCommand::create("t", &["a"]),
        ParsedCommand::insert("t", &["1"]),
        ParsedCommand::insert("t", &["2", "too many"]),
        ParsedCommand::insert("t", &["3"]),
    ];
    let result = engine.execute_batch(&commands);
    assert!(matches!(result, Err(QueryError::SchemaViolation(_))));
    assert_eq!(engine.database().open_table("t")?.row_count(), 1);

    let outcomes = engine.execute_batch(&commands[..2])?;
    assert_eq!(outcomes.len(), 2);
    Ok(())
}

#[test]
fn test_json_commands() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let engine = ExecutionEngine::new(database);

    let lines = [
        r#"{"kind":"create","table":"emp","fields":["fname","dept"]}"#,
        r#"{"kind":"insert","table":"emp","fields":["10","CS"]}"#,
        r#"{"kind":"insert","table":"emp","fields":["20","Math"]}"#,
        r#"{"kind":"select","table":"emp","fields":["*"],"conditions":["dept",">=","D"]}"#,
    ];
    let commands = lines
        .iter()
        .map(|line| serde_json::from_str::<ParsedCommand>(line))
        .collect::<Result<Vec<_>, _>>()?;

    let mut outcomes = engine.execute_batch(&commands)?;
    match outcomes.pop() {
        Some(CommandOutcome::Selected(result)) => {
            assert_eq!(result.rows()?, vec![strings(&["20", "Math"])]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    Ok(())
}

#[test]
fn test_select_from_missing_table() -> Result<()> {
    let (database, _dir) = create_test_database()?;
    let engine = ExecutionEngine::new(database);

    match engine.execute(&ParsedCommand::select("nothing", &["*"]))? {
        CommandOutcome::Selected(result) => assert!(result.is_empty()),
        other => panic!("unexpected outcome {:?}", other),
    }

    let insert = engine.execute(&ParsedCommand::insert("nothing", &["1"]));
    assert!(matches!(insert, Err(QueryError::NotFound(_))));
    Ok(())
}
