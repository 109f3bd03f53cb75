//! Keyed SQLite storage for locations and weather readings.
//!
//! Store functions are free functions generic over a sqlx [`Executor`], so a
//! service can run them against the pool for plain reads or against an open
//! transaction when a check and a write must commit together. Nothing here
//! enforces business rules.
//!
//! [`Executor`]: sqlx::Executor

use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::schema;

pub mod locations;
pub mod weather;

/// How long a writer waits for the database lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

// ---

/// Open a connection pool for `db_url` and make sure the schema exists.
///
/// Foreign keys are switched on so readings can only reference a location
/// row that was created first.
pub async fn connect(db_url: &str, max_connections: u32) -> Result<SqlitePool> {
    // ---
    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("Invalid database URL '{db_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to database '{db_url}'"))?;

    schema::create_schema(&pool).await?;
    Ok(pool)
}

/// Open a private in-memory database with the schema applied.
///
/// Every SQLite connection to `:memory:` sees its own database, so the pool
/// is pinned to a single connection that is never recycled.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    // ---
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Failed to open in-memory database")?;

    schema::create_schema(&pool).await?;
    Ok(pool)
}

/// Open a transaction that holds the write lock from its first statement.
///
/// A deferred `BEGIN` lets two writers both read, after which the second
/// one fails to upgrade its lock with `SQLITE_BUSY`. `BEGIN IMMEDIATE`
/// makes later writers wait (up to the busy timeout) until the first one
/// commits, so their own checks see its row.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    // ---
    pool.begin_with("BEGIN IMMEDIATE").await
}
