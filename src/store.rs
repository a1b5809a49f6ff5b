use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection,
};

use crate::book::{Book, BookChanges, NewBook};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    year INTEGER NOT NULL
)
"#;

const SELECT_ALL: &str = "SELECT id, title, author, year FROM books ORDER BY id";

const SELECT_BY_ID: &str = "SELECT id, title, author, year FROM books WHERE id = ?";

const INSERT: &str = r#"
INSERT INTO books (title, author, year)
VALUES (?, ?, ?)
RETURNING id, title, author, year
"#;

// Existence check and merge happen in the same statement.
const UPDATE_BY_ID: &str = r#"
UPDATE books
SET title = COALESCE(?, title),
    author = COALESCE(?, author),
    year = COALESCE(?, year)
WHERE id = ?
RETURNING id, title, author, year
"#;

const DELETE_BY_ID: &str = "DELETE FROM books WHERE id = ?";

fn default_create_if_missing() -> bool {
    true
}

fn default_busy_timeout_in_millis() -> u64 {
    5_000
}

/// Connection parameters for the book database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
    /// Create the database file on first connect if it does not exist.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
    /// How long a statement waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_in_millis")]
    pub busy_timeout_in_millis: u64,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_if_missing: default_create_if_missing(),
            busy_timeout_in_millis: default_busy_timeout_in_millis(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to execute statement: {0}")]
    Query(#[source] sqlx::Error),
}

/// Data access for the `books` table.
///
/// Every operation opens its own connection, executes exactly one statement and closes the
/// connection before returning. There is no pooling.
#[derive(Debug, Clone)]
pub struct BookStore {
    options: SqliteConnectOptions,
}

impl BookStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(config.create_if_missing)
            .busy_timeout(Duration::from_millis(config.busy_timeout_in_millis));

        Self { options }
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        SqliteConnection::connect_with(&self.options)
            .await
            .map_err(StoreError::Connect)
    }

    async fn release(connection: SqliteConnection) {
        if let Err(err) = connection.close().await {
            tracing::warn!(%err, "Failed to close database connection");
        }
    }

    /// Creates the `books` table if it does not exist yet.
    #[tracing::instrument(skip_all)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut connection = self.connect().await?;
        let result = sqlx::query(CREATE_TABLE).execute(&mut connection).await;
        Self::release(connection).await;

        result.map_err(StoreError::Query)?;

        tracing::debug!("Schema ready");

        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let mut connection = self.connect().await?;
        let result = sqlx::query_as::<_, Book>(SELECT_ALL)
            .fetch_all(&mut connection)
            .await;
        Self::release(connection).await;

        result.map_err(StoreError::Query)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let mut connection = self.connect().await?;
        let result = sqlx::query_as::<_, Book>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&mut connection)
            .await;
        Self::release(connection).await;

        result.map_err(StoreError::Query)
    }

    #[tracing::instrument(skip_all)]
    pub async fn create(&self, book: &NewBook) -> Result<Book, StoreError> {
        let mut connection = self.connect().await?;
        let result = sqlx::query_as::<_, Book>(INSERT)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.year)
            .fetch_one(&mut connection)
            .await;
        Self::release(connection).await;

        result.map_err(StoreError::Query)
    }

    /// Returns `None` if no book with `id` exists.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update(&self, id: i64, changes: &BookChanges) -> Result<Option<Book>, StoreError> {
        let mut connection = self.connect().await?;
        let result = sqlx::query_as::<_, Book>(UPDATE_BY_ID)
            .bind(changes.title.as_deref())
            .bind(changes.author.as_deref())
            .bind(changes.year)
            .bind(id)
            .fetch_optional(&mut connection)
            .await;
        Self::release(connection).await;

        result.map_err(StoreError::Query)
    }

    /// Returns `false` if no book with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut connection = self.connect().await?;
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id)
            .execute(&mut connection)
            .await;
        Self::release(connection).await;

        let deleted = result.map_err(StoreError::Query)?.rows_affected() > 0;

        Ok(deleted)
    }
}
