//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate their input before any SQL mutation.
//! - Every mutation is a single SQL statement, so no caller observes a
//!   partially applied change.
//! - Create, update and toggle return the row produced by their own
//!   statement (`RETURNING`), never a later re-read.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::todo::{Todo, TodoDraft, TodoId, TodoPatch};
use crate::model::validation::TodoValidationError;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    completed,
    created_at,
    updated_at
FROM todos";

const TODO_RETURNING_SQL: &str =
    "RETURNING uuid, title, description, completed, created_at, updated_at";

/// Current time as epoch milliseconds, evaluated once per statement.
const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

const TODO_REQUIRED_COLUMNS: [&str; 7] = [
    "seq",
    "uuid",
    "title",
    "description",
    "completed",
    "created_at",
    "updated_at",
];

/// Result cap applied when a list query does not name one.
pub const TODO_LIST_DEFAULT_LIMIT: u32 = 100;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Stable machine-readable code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_input",
            Self::Db(err) => err.error_code(),
            Self::NotFound(_) => "not_found",
            Self::InvalidData(_) => "invalid_persisted_data",
            Self::UninitializedConnection { .. } => "uninitialized_connection",
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => "schema_mismatch",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    /// Exact-match filter on the completed flag; `None` lists everything.
    pub completed: Option<bool>,
    /// Maximum rows to return. `None` and `Some(0)` fall back to
    /// `TODO_LIST_DEFAULT_LIMIT`.
    pub limit: Option<u32>,
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    /// Inserts the draft and returns the stored record.
    fn create_todo(&self, draft: &TodoDraft) -> RepoResult<Todo>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Lists todos newest first.
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>>;
    /// Applies supplied patch fields and returns the record as written;
    /// returns `NotFound` for unknown ids.
    fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Todo>;
    /// Inverts the completed flag and returns the record as written.
    fn toggle_completed(&self, id: TodoId) -> RepoResult<Todo>;
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
///
/// Borrows an explicit store handle; the repository owns no connection state.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Rejects connections that skipped migrations or carry an incompatible
    /// `todos` table.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_todo_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Runs a statement yielding at most one todo row and parses it.
    fn query_one(&self, sql: &str, params: impl Params) -> RepoResult<Option<Todo>> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let mut rows = stmt.query(params)?;
        let todo = match rows.next()? {
            Some(row) => Some(parse_todo_row(row)?),
            None => None,
        };
        Ok(todo)
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, draft: &TodoDraft) -> RepoResult<Todo> {
        draft.validate()?;

        let inserted = self.query_one(
            &format!(
                "INSERT INTO todos (
                    uuid,
                    title,
                    description,
                    completed,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, {NOW_MS_SQL}, {NOW_MS_SQL})
                {TODO_RETURNING_SQL};"
            ),
            params![
                draft.id.to_string(),
                draft.title.as_str(),
                draft.description.as_deref(),
                bool_to_int(draft.completed),
            ],
        )?;

        inserted.ok_or_else(|| {
            RepoError::InvalidData(format!("insert of todo {} returned no row", draft.id))
        })
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        self.query_one(
            &format!("{TODO_SELECT_SQL} WHERE uuid = ?1;"),
            [id.to_string()],
        )
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let mut sql = String::from(TODO_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(completed) = query.completed {
            sql.push_str(" WHERE completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        sql.push_str(" ORDER BY seq DESC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_list_limit(
            query.limit,
        ))));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Todo> {
        let patch = patch.normalized()?;

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = patch.title {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title));
        }
        if let Some(description) = patch.description {
            assignments.push("description = ?");
            bind_values.push(description.map_or(Value::Null, Value::Text));
        }
        if let Some(completed) = patch.completed {
            assignments.push("completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        if assignments.is_empty() {
            return self.get_todo(id)?.ok_or(RepoError::NotFound(id));
        }

        let sql = format!(
            "UPDATE todos SET {}, updated_at = {NOW_MS_SQL} WHERE uuid = ? {TODO_RETURNING_SQL};",
            assignments.join(", ")
        );
        bind_values.push(Value::Text(id.to_string()));

        self.query_one(&sql, params_from_iter(bind_values))?
            .ok_or(RepoError::NotFound(id))
    }

    fn toggle_completed(&self, id: TodoId) -> RepoResult<Todo> {
        self.query_one(
            &format!(
                "UPDATE todos
                 SET
                    completed = 1 - completed,
                    updated_at = {NOW_MS_SQL}
                 WHERE uuid = ?1
                 {TODO_RETURNING_SQL};"
            ),
            [id.to_string()],
        )?
        .ok_or(RepoError::NotFound(id))
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

/// Normalizes a list limit: absent or zero means the default cap.
pub fn normalize_list_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => TODO_LIST_DEFAULT_LIMIT,
        Some(value) => value,
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    let todo = Todo {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        completed,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    // A stored record that breaks field rules is a storage fault, not bad input.
    todo.validate()
        .map_err(|err| RepoError::InvalidData(format!("todo {id}: {err}")))?;
    Ok(todo)
}

fn ensure_todo_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "todos")? {
        return Err(RepoError::MissingRequiredTable("todos"));
    }

    for column in TODO_REQUIRED_COLUMNS {
        if !table_has_column(conn, "todos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

#[cfg(test)]
mod tests {
    use super::{normalize_list_limit, TODO_LIST_DEFAULT_LIMIT};

    #[test]
    fn list_limit_defaults_when_absent_or_zero() {
        assert_eq!(normalize_list_limit(None), TODO_LIST_DEFAULT_LIMIT);
        assert_eq!(normalize_list_limit(Some(0)), TODO_LIST_DEFAULT_LIMIT);
    }

    #[test]
    fn list_limit_keeps_positive_values() {
        assert_eq!(normalize_list_limit(Some(1)), 1);
        assert_eq!(normalize_list_limit(Some(5_000)), 5_000);
    }
}
