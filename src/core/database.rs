//! Persistence adapter - thin wrapper over the embedded SQLite database
//!
//! Exposes the three primitives the repositories need (`execute`, `query_all`,
//! `query_one`) on the shared pool; writes that must be read back run through
//! `execute`/`query_one` inside a transaction.
//! The `resources` table is created on connect if it does not exist yet.

use super::error::StorageError;
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteQueryResult, SqliteRow,
};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

pub const IN_MEMORY_PATH: &str = ":memory:";

const CREATE_RESOURCES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS resources (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Positional parameter bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Null,
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Integer(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

/// Outcome of a mutating statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub last_insert_id: i64,
    pub rows_affected: u64,
}

fn bind_query<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params.iter().fold(sqlx::query(sql), |query, param| match param {
        SqlParam::Text(value) => query.bind(value.as_str()),
        SqlParam::Integer(value) => query.bind(*value),
        SqlParam::Null => query.bind(None::<String>),
    })
}

fn bind_query_as<'q, T>(
    sql: &'q str,
    params: &'q [SqlParam],
) -> QueryAs<'q, Sqlite, T, SqliteArguments<'q>>
where
    T: for<'r> FromRow<'r, SqliteRow>,
{
    params
        .iter()
        .fold(sqlx::query_as::<_, T>(sql), |query, param| match param {
            SqlParam::Text(value) => query.bind(value.as_str()),
            SqlParam::Integer(value) => query.bind(*value),
            SqlParam::Null => query.bind(None::<String>),
        })
}

fn exec_result(result: SqliteQueryResult) -> ExecResult {
    ExecResult {
        last_insert_id: result.last_insert_rowid(),
        rows_affected: result.rows_affected(),
    }
}

/// Handle to the embedded database. Cloning is cheap and shares the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if missing) the database file at `path` and ensures the schema.
    /// `:memory:` is routed to [`Database::in_memory`].
    #[instrument(skip(path), fields(path = %path))]
    pub async fn connect(path: &str, max_connections: u32) -> Result<Self, StorageError> {
        if path == IN_MEMORY_PATH {
            return Self::in_memory().await;
        }

        let started_at = Instant::now();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Error connecting to the database: {}", e);
                e
            })?;

        let db = Self { pool };
        db.ensure_schema().await?;

        info!(
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Connected to the SQLite database"
        );
        Ok(db)
    }

    /// Private in-memory database pinned to a single connection,
    /// so its content lives exactly as long as the returned handle.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;
        debug!("In-memory database ready");
        Ok(db)
    }

    async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_RESOURCES_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Runs a mutating statement
    pub async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<ExecResult, StorageError> {
        let result = bind_query(sql, params).execute(&self.pool).await?;
        Ok(exec_result(result))
    }

    /// Runs a read statement; no rows is an empty vec, never an error
    pub async fn query_all<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<T>, StorageError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        Ok(bind_query_as::<T>(sql, params).fetch_all(&self.pool).await?)
    }

    /// Runs a read statement and returns the first row, if any
    pub async fn query_one<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Option<T>, StorageError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        Ok(bind_query_as::<T>(sql, params)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn begin(&self) -> Result<DbTransaction, StorageError> {
        Ok(DbTransaction {
            tx: self.pool.begin().await?,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Open transaction. Dropping it without `commit` rolls back.
pub struct DbTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl DbTransaction {
    pub async fn execute(&mut self, sql: &str, params: &[SqlParam]) -> Result<ExecResult, StorageError> {
        let result = bind_query(sql, params).execute(&mut *self.tx).await?;
        Ok(exec_result(result))
    }

    pub async fn query_one<T>(&mut self, sql: &str, params: &[SqlParam]) -> Result<Option<T>, StorageError>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        Ok(bind_query_as::<T>(sql, params)
            .fetch_optional(&mut *self.tx)
            .await?)
    }

    pub async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        Ok(())
    }
}
