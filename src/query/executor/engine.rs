// Query Execution Engine Implementation
//
// Dispatches parsed commands to the catalog.

use log::info;

use crate::catalog::Database;
use crate::query::command::{CommandKind, ParsedCommand};
use crate::query::executor::result::{CommandOutcome, QueryResult};

pub struct ExecutionEngine {
    database: Database,
}

impl ExecutionEngine {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Execute one command
    pub fn execute(&self, command: &ParsedCommand) -> QueryResult<CommandOutcome> {
        info!("executing {:?} on {}", command.kind, command.table);

        match command.kind {
            CommandKind::Create | CommandKind::Make => {
                self.database
                    .create_table(&command.table, command.fields.clone())?;
                Ok(CommandOutcome::Created {
                    table: command.table.clone(),
                })
            }
            CommandKind::Insert => {
                let mut relation = self.database.open_table(&command.table)?;
                let recno = relation.insert_into(command.fields.clone())?;
                Ok(CommandOutcome::Inserted {
                    table: command.table.clone(),
                    recno,
                })
            }
            CommandKind::Select => {
                let relation = self.database.open_table(&command.table)?;
                let result = relation.select(&command.fields, &command.conditions)?;
                info!("{} returned {} records", command.table, result.row_count());
                Ok(CommandOutcome::Selected(result))
            }
        }
    }

    /// Execute commands in order, stopping at the first failure
    pub fn execute_batch<'a, I>(&self, commands: I) -> QueryResult<Vec<CommandOutcome>>
    where
        I: IntoIterator<Item = &'a ParsedCommand>,
    {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }
}
