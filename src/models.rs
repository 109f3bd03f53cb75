//! Data models for locations and their weather readings.
//!
//! Readings point at their location through the location code only. That
//! reference is used for lookups and visibility filtering, never for
//! ownership: trashing a location leaves its readings in place.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---

/// Lifecycle of a location row. Rows are never physically removed; a
/// "deleted" location is `Trashed` and invisible to every read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationStatus {
    // ---
    #[default]
    Active,
    Trashed,
}

impl LocationStatus {
    // ---
    pub fn from_trashed(trashed: bool) -> Self {
        if trashed {
            Self::Trashed
        } else {
            Self::Active
        }
    }

    pub fn is_trashed(self) -> bool {
        self == Self::Trashed
    }
}

/// A named place weather is tracked for, keyed by its immutable `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    // ---
    pub code: String,
    pub city_name: String,
    pub region_name: Option<String>,
    pub country_name: String,
    pub country_code: String,
    /// Feature flag, independent of the lifecycle status.
    pub enabled: bool,
    pub status: LocationStatus,
}

/// Replacement values for an existing location.
///
/// Every field except `code` overwrites the stored value, so a `None`
/// region clears it. `enabled` is the exception: `None` keeps whatever is
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationUpdate {
    // ---
    pub code: String,
    pub city_name: String,
    pub region_name: Option<String>,
    pub country_name: String,
    pub country_code: String,
    pub enabled: Option<bool>,
}

impl From<Location> for LocationUpdate {
    fn from(location: Location) -> Self {
        LocationUpdate {
            code: location.code,
            city_name: location.city_name,
            region_name: location.region_name,
            country_name: location.country_name,
            country_code: location.country_code,
            enabled: Some(location.enabled),
        }
    }
}

/// Identity of an hourly reading: one row per location and hour of day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourlyKey {
    // ---
    pub location_code: String,
    pub hour_of_day: u8,
}

impl HourlyKey {
    pub fn new(location_code: impl Into<String>, hour_of_day: u8) -> Self {
        HourlyKey {
            location_code: location_code.into(),
            hour_of_day,
        }
    }
}

/// Identity of a daily reading: one row per location, month and day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DailyKey {
    // ---
    pub location_code: String,
    pub month: u8,
    pub day_of_month: u8,
}

impl DailyKey {
    pub fn new(location_code: impl Into<String>, month: u8, day_of_month: u8) -> Self {
        DailyKey {
            location_code: location_code.into(),
            month,
            day_of_month,
        }
    }
}

/// Forecast for one hour of the day at a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyWeatherReading {
    // ---
    pub key: HourlyKey,
    /// Celsius.
    pub temperature: i32,
    /// Percentage chance of precipitation.
    pub precipitation: i32,
    pub status: String,
}

/// Forecast for one calendar day at a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyWeatherReading {
    // ---
    pub key: DailyKey,
    pub min_temp: i32,
    pub max_temp: i32,
    pub precipitation: i32,
    pub status: String,
}

/// Hourly forecast entry as it travels over the wire. The location is
/// implied by the request path.
///
/// Key fields are plain integers so out-of-range values reach validation
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyForecast {
    // ---
    pub hour_of_day: i32,
    pub temperature: i32,
    pub precipitation: i32,
    pub status: String,
}

impl HourlyForecast {
    pub fn into_reading(self, location_code: &str) -> Result<HourlyWeatherReading> {
        // ---
        let hour_of_day = key_part(self.hour_of_day, 0, 23, "hour_of_day")?;

        Ok(HourlyWeatherReading {
            key: HourlyKey::new(location_code, hour_of_day),
            temperature: self.temperature,
            precipitation: self.precipitation,
            status: self.status,
        })
    }
}

impl From<HourlyWeatherReading> for HourlyForecast {
    fn from(reading: HourlyWeatherReading) -> Self {
        HourlyForecast {
            hour_of_day: i32::from(reading.key.hour_of_day),
            temperature: reading.temperature,
            precipitation: reading.precipitation,
            status: reading.status,
        }
    }
}

/// Daily forecast entry as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecast {
    // ---
    pub day_of_month: i32,
    pub month: i32,
    pub min_temp: i32,
    pub max_temp: i32,
    pub precipitation: i32,
    pub status: String,
}

impl DailyForecast {
    pub fn into_reading(self, location_code: &str) -> Result<DailyWeatherReading> {
        // ---
        let month = key_part(self.month, 1, 12, "month")?;
        let day_of_month = key_part(self.day_of_month, 1, 31, "day_of_month")?;

        Ok(DailyWeatherReading {
            key: DailyKey::new(location_code, month, day_of_month),
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            precipitation: self.precipitation,
            status: self.status,
        })
    }
}

impl From<DailyWeatherReading> for DailyForecast {
    fn from(reading: DailyWeatherReading) -> Self {
        DailyForecast {
            day_of_month: i32::from(reading.key.day_of_month),
            month: i32::from(reading.key.month),
            min_temp: reading.min_temp,
            max_temp: reading.max_temp,
            precipitation: reading.precipitation,
            status: reading.status,
        }
    }
}

/// Narrow a wire integer to a key component within `min..=max`.
fn key_part(value: i32, min: u8, max: u8, field: &str) -> Result<u8> {
    // ---
    u8::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| Error::Invalid(format!("{field} must be between {min}-{max}, got {value}")))
}
