//! Hourly and daily readings keyed by their composite value keys.
//!
//! Read queries join `visible_locations`, so readings of a trashed location
//! are never returned even though the rows remain.

use sqlx::{Executor, Sqlite};

use crate::models::{DailyKey, DailyWeatherReading, HourlyKey, HourlyWeatherReading};

// ---

#[derive(sqlx::FromRow)]
struct HourlyRow {
    location_code: String,
    hour_of_day: u8,
    temperature: i32,
    precipitation: i32,
    status: String,
}

impl From<HourlyRow> for HourlyWeatherReading {
    fn from(row: HourlyRow) -> Self {
        HourlyWeatherReading {
            key: HourlyKey::new(row.location_code, row.hour_of_day),
            temperature: row.temperature,
            precipitation: row.precipitation,
            status: row.status,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DailyRow {
    location_code: String,
    month: u8,
    day_of_month: u8,
    min_temp: i32,
    max_temp: i32,
    precipitation: i32,
    status: String,
}

impl From<DailyRow> for DailyWeatherReading {
    fn from(row: DailyRow) -> Self {
        DailyWeatherReading {
            key: DailyKey::new(row.location_code, row.month, row.day_of_month),
            min_temp: row.min_temp,
            max_temp: row.max_temp,
            precipitation: row.precipitation,
            status: row.status,
        }
    }
}

/// Upsert one hourly reading by its key.
pub async fn save_hourly<'e, E>(exec: E, reading: &HourlyWeatherReading) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    sqlx::query(
        r#"
        INSERT INTO hourly_weather (
            location_code, hour_of_day, temperature, precipitation, status
        ) VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (location_code, hour_of_day) DO UPDATE SET
            temperature   = excluded.temperature,
            precipitation = excluded.precipitation,
            status        = excluded.status
        "#,
    )
    .bind(&reading.key.location_code)
    .bind(reading.key.hour_of_day)
    .bind(reading.temperature)
    .bind(reading.precipitation)
    .bind(&reading.status)
    .execute(exec)
    .await?;

    Ok(())
}

/// Remove every hourly reading of a location.
pub async fn delete_hourly<'e, E>(exec: E, location_code: &str) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let result = sqlx::query("DELETE FROM hourly_weather WHERE location_code = ?")
        .bind(location_code)
        .execute(exec)
        .await?;

    Ok(result.rows_affected())
}

/// Hourly readings of a visible location with `hour_of_day > after_hour`,
/// ascending by hour. Pass `None` for the whole day.
pub async fn find_hourly_after<'e, E>(
    exec: E,
    location_code: &str,
    after_hour: Option<u8>,
) -> Result<Vec<HourlyWeatherReading>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let after_hour = after_hour.map_or(-1, i32::from);

    let rows = sqlx::query_as::<_, HourlyRow>(
        r#"
        SELECT h.location_code, h.hour_of_day, h.temperature,
               h.precipitation, h.status
          FROM hourly_weather h
          JOIN visible_locations l ON l.code = h.location_code
         WHERE h.location_code = ?
           AND h.hour_of_day > ?
         ORDER BY h.hour_of_day ASC
        "#,
    )
    .bind(location_code)
    .bind(after_hour)
    .fetch_all(exec)
    .await?;

    Ok(rows.into_iter().map(HourlyWeatherReading::from).collect())
}

/// Upsert one daily reading by its key.
pub async fn save_daily<'e, E>(exec: E, reading: &DailyWeatherReading) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    sqlx::query(
        r#"
        INSERT INTO daily_weather (
            location_code, month, day_of_month,
            min_temp, max_temp, precipitation, status
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (location_code, month, day_of_month) DO UPDATE SET
            min_temp      = excluded.min_temp,
            max_temp      = excluded.max_temp,
            precipitation = excluded.precipitation,
            status        = excluded.status
        "#,
    )
    .bind(&reading.key.location_code)
    .bind(reading.key.month)
    .bind(reading.key.day_of_month)
    .bind(reading.min_temp)
    .bind(reading.max_temp)
    .bind(reading.precipitation)
    .bind(&reading.status)
    .execute(exec)
    .await?;

    Ok(())
}

/// Remove every daily reading of a location.
pub async fn delete_daily<'e, E>(exec: E, location_code: &str) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let result = sqlx::query("DELETE FROM daily_weather WHERE location_code = ?")
        .bind(location_code)
        .execute(exec)
        .await?;

    Ok(result.rows_affected())
}

/// Daily readings of a visible location, ordered by month then day.
pub async fn find_daily<'e, E>(
    exec: E,
    location_code: &str,
) -> Result<Vec<DailyWeatherReading>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // ---
    let rows = sqlx::query_as::<_, DailyRow>(
        r#"
        SELECT d.location_code, d.month, d.day_of_month, d.min_temp,
               d.max_temp, d.precipitation, d.status
          FROM daily_weather d
          JOIN visible_locations l ON l.code = d.location_code
         WHERE d.location_code = ?
         ORDER BY d.month ASC, d.day_of_month ASC
        "#,
    )
    .bind(location_code)
    .fetch_all(exec)
    .await?;

    Ok(rows.into_iter().map(DailyWeatherReading::from).collect())
}
