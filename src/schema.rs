//! Database schema management for `weather-service`.
//!
//! Ensures required tables, indexes and views exist before serving requests.
//! Applied once on startup from `main.rs` and by the test pools.

use anyhow::Result;
use sqlx::SqlitePool;

// ---

/// Create or update the database schema (idempotent).
///
/// Creates `locations`, the `visible_locations` view over non-trashed rows,
/// and the `hourly_weather` / `daily_weather` reading tables. Safe to call on
/// every startup; no-op if objects already exist.
///
/// Errors are propagated if any SQL execution fails.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            code          TEXT    PRIMARY KEY NOT NULL,
            city_name     TEXT    NOT NULL,
            region_name   TEXT,
            country_name  TEXT    NOT NULL,
            country_code  TEXT    NOT NULL,
            enabled       BOOLEAN NOT NULL,
            trashed       BOOLEAN NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Every read path that must hide trashed rows selects from this view
    sqlx::query(
        r#"
        CREATE VIEW IF NOT EXISTS visible_locations AS
            SELECT code, city_name, region_name, country_name,
                   country_code, enabled, trashed
              FROM locations
             WHERE trashed = 0;
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hourly_weather (
            location_code TEXT    NOT NULL REFERENCES locations (code),
            hour_of_day   INTEGER NOT NULL,
            temperature   INTEGER NOT NULL,
            precipitation INTEGER NOT NULL,
            status        TEXT    NOT NULL,
            PRIMARY KEY (location_code, hour_of_day)
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_weather (
            location_code TEXT    NOT NULL REFERENCES locations (code),
            month         INTEGER NOT NULL,
            day_of_month  INTEGER NOT NULL,
            min_temp      INTEGER NOT NULL,
            max_temp      INTEGER NOT NULL,
            precipitation INTEGER NOT NULL,
            status        TEXT    NOT NULL,
            PRIMARY KEY (location_code, month, day_of_month)
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_locations_trashed
            ON locations (trashed);
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
