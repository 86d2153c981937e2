use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kestreldb::catalog::Database;
use kestreldb::common::DatabaseConfig;
use kestreldb::query::executor::engine::ExecutionEngine;
use kestreldb::query::{CommandKind, ParsedCommand};

#[derive(Parser)]
#[command(author, version, about = "Kestrel CLI - create, fill and query kestreldb tables")]
struct Cli {
    /// Directory holding the table files
    #[arg(short, long, default_value = "bin")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a table, replacing any table of the same name
    Create {
        table: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Append one row to a table
    Insert {
        table: String,
        values: Vec<String>,
    },

    /// Select rows from a table
    Select {
        table: String,
        /// Comma separated columns, or `*`
        #[arg(short, long, default_value = "*")]
        fields: String,
        /// Condition tokens separated by spaces, e.g. "dept = CS or dept = Math"
        #[arg(short = 'w', long = "where")]
        condition: Option<String>,
    },

    /// Execute one JSON encoded command
    Exec { json: String },

    /// Execute a file of JSON encoded commands, one per line
    Batch { file: PathBuf },
}

fn to_command(command: &Commands) -> Result<Vec<ParsedCommand>> {
    let parsed = match command {
        Commands::Create { table, fields } => ParsedCommand {
            fields: fields.clone(),
            ..ParsedCommand::new(CommandKind::Create, table.as_str())
        },
        Commands::Insert { table, values } => ParsedCommand {
            fields: values.clone(),
            ..ParsedCommand::new(CommandKind::Insert, table.as_str())
        },
        Commands::Select { table, fields, condition } => {
            let columns: Vec<&str> = fields.split(',').map(str::trim).filter(|c| !c.is_empty()).collect();
            ParsedCommand::select(table.as_str(), &columns)
                .with_condition(condition.as_deref().unwrap_or(""))
        }
        Commands::Exec { json } => {
            serde_json::from_str(json).context("Failed to decode command")?
        }
        Commands::Batch { file } => return read_batch(file),
    };
    Ok(vec![parsed])
}

/// One JSON command per line; blank lines and `//` comments are skipped
fn read_batch(file: &Path) -> Result<Vec<ParsedCommand>> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read batch file {}", file.display()))?;

    text.lines()
        .enumerate()
        .map(|(number, line)| (number + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"))
        .map(|(number, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Bad command on line {}", number))
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let engine = ExecutionEngine::new(Database::new(DatabaseConfig::new(&cli.data_dir)));
    let commands = to_command(&cli.command)?;

    for command in &commands {
        let outcome = engine
            .execute(command)
            .with_context(|| format!("Failed to execute {:?} on {}", command.kind, command.table))?;
        print!("{}", outcome.render()?);
    }

    Ok(())
}
