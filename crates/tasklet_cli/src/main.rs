//! Command-line probe for the Tasklet core.
//!
//! # Responsibility
//! - Expose each todo operation as a subcommand for local checks.
//! - Print results as JSON so output stays script-friendly.
//!
//! # Invariants
//! - Exit code 2 means invalid input, 3 means not found, 1 anything else.

use clap::{Parser, Subcommand};
use log::info;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use tasklet_core::db::migrations::latest_version;
use tasklet_core::db::{open_db, DbError};
use tasklet_core::{
    core_version, init_logging, logging_status, NewTodo, RepoError, SqliteTodoRepository,
    TaskletConfig, TodoErrorKind, TodoId, TodoListQuery, TodoPatch, TodoService,
    TodoServiceError,
};

#[derive(Parser)]
#[command(name = "tasklet")]
#[command(about = "Tasklet todo store CLI")]
#[command(version)]
struct Cli {
    /// SQLite database file; overrides TASKLET_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a todo.
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = false)]
        completed: bool,
    },
    /// List todos, newest first.
    List {
        #[arg(long)]
        completed: Option<bool>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one todo.
    Get { id: TodoId },
    /// Change supplied fields of a todo.
    Update {
        id: TodoId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long, default_value_t = false)]
        clear_description: bool,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip the completed flag.
    Toggle { id: TodoId },
    /// Permanently remove a todo.
    Delete { id: TodoId },
    /// Print version, schema and configuration details.
    Info,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::List { .. } => "list",
            Self::Get { .. } => "get",
            Self::Update { .. } => "update",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::Info => "info",
        }
    }
}

#[derive(Debug)]
enum CliError {
    Open(DbError),
    Repo(RepoError),
    Service(TodoServiceError),
    Render(serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Service(err) => match err.kind() {
                TodoErrorKind::InvalidInput => ExitCode::from(2),
                TodoErrorKind::NotFound => ExitCode::from(3),
                TodoErrorKind::Persistence => ExitCode::FAILURE,
            },
            _ => ExitCode::FAILURE,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "failed to open database: {err}"),
            Self::Repo(err) => write!(f, "failed to prepare store: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "failed to render output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Open(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<TodoServiceError> for CliError {
    fn from(value: TodoServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = TaskletConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let rendered = run(cli.command, &config)
        .and_then(|value| serde_json::to_string_pretty(&value).map_err(CliError::from));
    match rendered {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

fn run(command: Commands, config: &TaskletConfig) -> Result<Value, CliError> {
    info!(
        "event=cli_command module=cli status=start command={}",
        command.name()
    );
    let conn = open_db(&config.db_path)?;
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn)?);
    let value = match command {
        Commands::Add {
            title,
            description,
            completed,
        } => {
            let input = NewTodo {
                title,
                description,
                completed,
            };
            serde_json::to_value(service.create_todo(input)?)?
        }
        Commands::List { completed, limit } => {
            let query = TodoListQuery { completed, limit };
            serde_json::to_value(service.list_todos(&query)?)?
        }
        Commands::Get { id } => match service.get_todo(id)? {
            Some(todo) => serde_json::to_value(todo)?,
            None => Value::Null,
        },
        Commands::Update {
            id,
            title,
            description,
            clear_description,
            completed,
        } => {
            let patch = TodoPatch {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                completed,
            };
            serde_json::to_value(service.update_todo(id, &patch)?)?
        }
        Commands::Toggle { id } => serde_json::to_value(service.toggle_completed(id)?)?,
        Commands::Delete { id } => {
            service.delete_todo(id)?;
            json!({ "deleted": id })
        }
        Commands::Info => info_value(config),
    };

    Ok(value)
}

fn info_value(config: &TaskletConfig) -> Value {
    let (log_level, log_dir) = logging_status()
        .map(|(level, dir)| (Some(level), Some(dir)))
        .unwrap_or((None, None));
    json!({
        "version": core_version(),
        "schema_version": latest_version(),
        "db_path": config.db_path,
        "log_level": log_level,
        "log_dir": log_dir,
    })
}
