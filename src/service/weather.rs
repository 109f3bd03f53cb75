//! Forecast queries and replacement scoped to visible locations.

use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::{DailyKey, DailyWeatherReading, HourlyKey, HourlyWeatherReading};
use crate::store::{self, locations, weather};

// ---

/// Reads and replaces hourly and daily forecasts.
///
/// Queries for a trashed or unknown location return an empty list instead
/// of failing; only the replace operations require the location to exist.
#[derive(Debug, Clone)]
pub struct WeatherService {
    pool: SqlitePool,
}

impl WeatherService {
    // ---
    pub fn new(pool: SqlitePool) -> Self {
        WeatherService { pool }
    }

    /// Hourly readings strictly after `current_hour`, ascending by hour.
    pub async fn list_upcoming_hourly(
        &self,
        location_code: &str,
        current_hour: u8,
    ) -> Result<Vec<HourlyWeatherReading>> {
        // ---
        Ok(weather::find_hourly_after(&self.pool, location_code, Some(current_hour)).await?)
    }

    /// Every hourly reading of the location, ascending by hour.
    pub async fn list_hourly(&self, location_code: &str) -> Result<Vec<HourlyWeatherReading>> {
        // ---
        Ok(weather::find_hourly_after(&self.pool, location_code, None).await?)
    }

    /// Daily readings ordered by month, then day of month.
    pub async fn list_daily(&self, location_code: &str) -> Result<Vec<DailyWeatherReading>> {
        // ---
        Ok(weather::find_daily(&self.pool, location_code).await?)
    }

    /// Replace the whole hourly forecast of an active location.
    ///
    /// Readings are re-keyed to `location_code`; when two share an hour the
    /// later one is kept. Returns the stored forecast.
    pub async fn replace_hourly(
        &self,
        location_code: &str,
        readings: Vec<HourlyWeatherReading>,
    ) -> Result<Vec<HourlyWeatherReading>> {
        // ---
        let mut tx = store::begin_write(&self.pool).await?;

        if locations::find_visible_by_code(&mut *tx, location_code)
            .await?
            .is_none()
        {
            return Err(Error::LocationNotFound(location_code.to_string()));
        }

        weather::delete_hourly(&mut *tx, location_code).await?;
        for reading in readings {
            let reading = HourlyWeatherReading {
                key: HourlyKey::new(location_code, reading.key.hour_of_day),
                ..reading
            };
            weather::save_hourly(&mut *tx, &reading).await?;
        }

        let stored = weather::find_hourly_after(&mut *tx, location_code, None).await?;
        tx.commit().await?;

        Ok(stored)
    }

    /// Replace the whole daily forecast of an active location.
    pub async fn replace_daily(
        &self,
        location_code: &str,
        readings: Vec<DailyWeatherReading>,
    ) -> Result<Vec<DailyWeatherReading>> {
        // ---
        let mut tx = store::begin_write(&self.pool).await?;

        if locations::find_visible_by_code(&mut *tx, location_code)
            .await?
            .is_none()
        {
            return Err(Error::LocationNotFound(location_code.to_string()));
        }

        weather::delete_daily(&mut *tx, location_code).await?;
        for reading in readings {
            let reading = DailyWeatherReading {
                key: DailyKey::new(location_code, reading.key.month, reading.key.day_of_month),
                ..reading
            };
            weather::save_daily(&mut *tx, &reading).await?;
        }

        let stored = weather::find_daily(&mut *tx, location_code).await?;
        tx.commit().await?;

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::{Location, LocationStatus};
    use crate::service::LocationService;
    use crate::store::connect_in_memory;

    async fn create_test_services() -> (LocationService, WeatherService) {
        // ---
        let pool = connect_in_memory().await.unwrap();
        let locations = LocationService::new(pool.clone());
        locations
            .add_location(Location {
                code: "LACA_US".to_string(),
                city_name: "Los Angeles".to_string(),
                region_name: Some("California".to_string()),
                country_name: "United States Of America".to_string(),
                country_code: "US".to_string(),
                enabled: true,
                status: LocationStatus::Active,
            })
            .await
            .unwrap();

        (locations, WeatherService::new(pool))
    }

    fn hourly(hour: u8, temperature: i32) -> HourlyWeatherReading {
        // ---
        HourlyWeatherReading {
            key: HourlyKey::new("LACA_US", hour),
            temperature,
            precipitation: 40,
            status: "Light Rain".to_string(),
        }
    }

    fn daily(month: u8, day: u8, max_temp: i32) -> DailyWeatherReading {
        // ---
        DailyWeatherReading {
            key: DailyKey::new("LACA_US", month, day),
            min_temp: 10,
            max_temp,
            precipitation: 5,
            status: "Clear".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upcoming_hourly_after_current_hour() {
        // ---
        let (_, service) = create_test_services().await;
        service
            .replace_hourly("LACA_US", vec![hourly(9, 18), hourly(14, 24), hourly(20, 19)])
            .await
            .unwrap();

        let upcoming = service.list_upcoming_hourly("LACA_US", 10).await.unwrap();
        let hours: Vec<u8> = upcoming.iter().map(|r| r.key.hour_of_day).collect();
        assert_eq!(hours, vec![14, 20]);

        // Strictly greater than the current hour
        let upcoming = service.list_upcoming_hourly("LACA_US", 14).await.unwrap();
        assert_eq!(upcoming, vec![hourly(20, 19)]);
    }

    #[tokio::test]
    async fn test_upcoming_hourly_empty_for_trashed_or_absent() {
        // ---
        let (locations, service) = create_test_services().await;
        service
            .replace_hourly("LACA_US", vec![hourly(23, 15)])
            .await
            .unwrap();

        assert!(service
            .list_upcoming_hourly("NOWHERE", 0)
            .await
            .unwrap()
            .is_empty());

        locations.delete_location_by_code("LACA_US").await.unwrap();
        assert!(service
            .list_upcoming_hourly("LACA_US", 0)
            .await
            .unwrap()
            .is_empty());
        assert!(service.list_hourly("LACA_US").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_hourly_discards_previous_forecast() {
        // ---
        let (_, service) = create_test_services().await;
        service
            .replace_hourly("LACA_US", vec![hourly(1, 10), hourly(2, 11)])
            .await
            .unwrap();

        let stored = service
            .replace_hourly("LACA_US", vec![hourly(5, 12), hourly(5, 13)])
            .await
            .unwrap();

        assert_eq!(stored, vec![hourly(5, 13)]);
        assert_eq!(service.list_hourly("LACA_US").await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_replace_rekeys_to_target_location() {
        // ---
        let (_, service) = create_test_services().await;
        let mut foreign = hourly(7, 16);
        foreign.key.location_code = "ELSEWHERE".to_string();

        let stored = service.replace_hourly("LACA_US", vec![foreign]).await.unwrap();
        assert_eq!(stored, vec![hourly(7, 16)]);
    }

    #[tokio::test]
    async fn test_replace_requires_visible_location() {
        // ---
        let (locations, service) = create_test_services().await;

        let err = service
            .replace_daily("NOWHERE", vec![daily(1, 1, 20)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));

        locations.delete_location_by_code("LACA_US").await.unwrap();
        let err = service
            .replace_hourly("LACA_US", vec![hourly(1, 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));
    }

    #[tokio::test]
    async fn test_daily_forecast_round_trip() {
        // ---
        let (_, service) = create_test_services().await;

        let stored = service
            .replace_daily("LACA_US", vec![daily(6, 2, 30), daily(6, 1, 28)])
            .await
            .unwrap();

        assert_eq!(stored, vec![daily(6, 1, 28), daily(6, 2, 30)]);
        assert_eq!(service.list_daily("LACA_US").await.unwrap(), stored);
    }
}
