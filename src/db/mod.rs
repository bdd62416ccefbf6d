use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Todo, TodoInput};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to open database at {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    #[error("todo not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

struct Migration {
    version: u32,
    sql: &'static str,
}

/// Schema migrations, applied in order. Versions are mirrored to `PRAGMA user_version`.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "
        CREATE TABLE IF NOT EXISTS todos (
            oid        TEXT PRIMARY KEY NOT NULL,
            task       TEXT NOT NULL,
            completed  INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at);
    ",
}];

const TODO_COLUMNS: &str = "oid, task, completed, created_at";

/// Latest schema version this binary can migrate to.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::configure(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DbError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Database { conn })
    }

    /// Apply every pending migration in a single transaction.
    pub fn migrate(&mut self) -> DbResult<()> {
        let current = self.schema_version()?;
        let latest = latest_version();

        if current > latest {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: current,
                latest_supported: latest,
            });
        }
        if current == latest {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
            tx.execute_batch(migration.sql)?;
            tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn schema_version(&self) -> DbResult<u32> {
        let version = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        Ok(version)
    }

    // -- Todos --

    pub fn list_todos(&self) -> DbResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at ASC, rowid ASC"
        ))?;
        let rows = stmt.query_map([], row_to_todo)?;

        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }

    pub fn insert_todo(&self, input: &TodoInput) -> DbResult<Todo> {
        let todo = Todo::new(input.task.clone(), input.completed);
        self.conn.execute(
            "INSERT INTO todos (oid, task, completed, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                todo.id.to_string(),
                todo.task,
                todo.completed,
                format_timestamp(&todo.created_at),
            ],
        )?;
        Ok(todo)
    }

    pub fn get_todo(&self, id: Uuid) -> DbResult<Option<Todo>> {
        let todo = self
            .conn
            .query_row(
                &format!("SELECT {TODO_COLUMNS} FROM todos WHERE oid = ?1"),
                params![id.to_string()],
                row_to_todo,
            )
            .optional()?;
        Ok(todo)
    }

    /// Replace the writable fields of a todo and return the stored row.
    pub fn update_todo(&self, id: Uuid, input: &TodoInput) -> DbResult<Todo> {
        self.conn
            .query_row(
                &format!(
                    "UPDATE todos SET task = ?1, completed = ?2 WHERE oid = ?3 RETURNING {TODO_COLUMNS}"
                ),
                params![input.task, input.completed, id.to_string()],
                row_to_todo,
            )
            .optional()?
            .ok_or(DbError::NotFound(id))
    }

    pub fn delete_todo(&self, id: Uuid) -> DbResult<()> {
        let rows_changed = self
            .conn
            .execute("DELETE FROM todos WHERE oid = ?1", params![id.to_string()])?;
        if rows_changed == 0 {
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_todo(row: &rusqlite::Row) -> rusqlite::Result<Todo> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(3)?;

    let id = Uuid::parse_str(&id_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Todo {
        id,
        task: row.get(1)?,
        completed: row.get(2)?,
        created_at,
    })
}
