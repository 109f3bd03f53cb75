//! Location rows keyed by `code`.

use sqlx::{Executor, Sqlite};

use crate::models::{Location, LocationStatus};

// ---

#[derive(sqlx::FromRow)]
struct LocationRow {
    code: String,
    city_name: String,
    region_name: Option<String>,
    country_name: String,
    country_code: String,
    enabled: bool,
    trashed: bool,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            code: row.code,
            city_name: row.city_name,
            region_name: row.region_name,
            country_name: row.country_name,
            country_code: row.country_code,
            enabled: row.enabled,
            status: LocationStatus::from_trashed(row.trashed),
        }
    }
}

/// True if any row holds `code`, trashed or not.
pub async fn exists<'e, E>(exec: E, code: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations WHERE code = ?")
        .bind(code)
        .fetch_one(exec)
        .await?;

    Ok(count > 0)
}

/// Point lookup regardless of lifecycle status.
pub async fn find_by_code<'e, E>(exec: E, code: &str) -> Result<Option<Location>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let row = sqlx::query_as::<_, LocationRow>(
        r#"
        SELECT code, city_name, region_name, country_name,
               country_code, enabled, trashed
          FROM locations
         WHERE code = ?
        "#,
    )
    .bind(code)
    .fetch_optional(exec)
    .await?;

    Ok(row.map(Location::from))
}

/// Point lookup restricted to active rows.
pub async fn find_visible_by_code<'e, E>(
    exec: E,
    code: &str,
) -> Result<Option<Location>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let row = sqlx::query_as::<_, LocationRow>(
        r#"
        SELECT code, city_name, region_name, country_name,
               country_code, enabled, trashed
          FROM visible_locations
         WHERE code = ?
        "#,
    )
    .bind(code)
    .fetch_optional(exec)
    .await?;

    Ok(row.map(Location::from))
}

/// All active rows. Callers must not rely on the order.
pub async fn find_all_visible<'e, E>(exec: E) -> Result<Vec<Location>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let rows = sqlx::query_as::<_, LocationRow>(
        r#"
        SELECT code, city_name, region_name, country_name,
               country_code, enabled, trashed
          FROM visible_locations
        "#,
    )
    .fetch_all(exec)
    .await?;

    Ok(rows.into_iter().map(Location::from).collect())
}

/// Insert a new row. A duplicate `code` surfaces as a unique violation from
/// the primary key.
pub async fn insert<'e, E>(exec: E, location: &Location) -> Result<Location, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let row = sqlx::query_as::<_, LocationRow>(
        r#"
        INSERT INTO locations (
            code, city_name, region_name, country_name,
            country_code, enabled, trashed
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING code, city_name, region_name, country_name,
                  country_code, enabled, trashed
        "#,
    )
    .bind(&location.code)
    .bind(&location.city_name)
    .bind(&location.region_name)
    .bind(&location.country_name)
    .bind(&location.country_code)
    .bind(location.enabled)
    .bind(location.status.is_trashed())
    .fetch_one(exec)
    .await?;

    Ok(row.into())
}

/// Upsert keyed by `code`, returning the row as stored.
pub async fn save<'e, E>(exec: E, location: &Location) -> Result<Location, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let row = sqlx::query_as::<_, LocationRow>(
        r#"
        INSERT INTO locations (
            code, city_name, region_name, country_name,
            country_code, enabled, trashed
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (code) DO UPDATE SET
            city_name    = excluded.city_name,
            region_name  = excluded.region_name,
            country_name = excluded.country_name,
            country_code = excluded.country_code,
            enabled      = excluded.enabled,
            trashed      = excluded.trashed
        RETURNING code, city_name, region_name, country_name,
                  country_code, enabled, trashed
        "#,
    )
    .bind(&location.code)
    .bind(&location.city_name)
    .bind(&location.region_name)
    .bind(&location.country_name)
    .bind(&location.country_code)
    .bind(location.enabled)
    .bind(location.status.is_trashed())
    .fetch_one(exec)
    .await?;

    Ok(row.into())
}

/// Mark an active row as trashed. Returns false when no active row matched.
pub async fn soft_delete<'e, E>(exec: E, code: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let result = sqlx::query("UPDATE locations SET trashed = 1 WHERE code = ? AND trashed = 0")
        .bind(code)
        .execute(exec)
        .await?;

    Ok(result.rows_affected() > 0)
}
