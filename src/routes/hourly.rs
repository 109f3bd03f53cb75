//! Hourly forecast endpoints under `/api/v1/hourly/{code}`.
//!
//! The upcoming-hours query needs the caller's local hour, which arrives in
//! the `x-current-hour` header since time-zone handling stays client side.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use super::{check_length, check_range, validation_failed, AppState};
use crate::HourlyForecast;

const CURRENT_HOUR_HEADER: &str = "x-current-hour";

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route(
        "/api/v1/hourly/{code}",
        get(upcoming_hourly).put(replace_hourly),
    )
}

#[derive(Debug, Serialize)]
struct HourlyWeatherResponse {
    location: String,
    hourly_forecast: Vec<HourlyForecast>,
}

/// Read the caller's hour of day from the request headers.
fn current_hour(headers: &HeaderMap) -> Option<u8> {
    // ---
    headers
        .get(CURRENT_HOUR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u8>().ok())
        .filter(|hour| *hour <= 23)
}

fn validate(forecasts: &[HourlyForecast]) -> Vec<String> {
    // ---
    let mut errors = Vec::new();
    if forecasts.is_empty() {
        errors.push("Hourly forecast data cannot be empty".to_string());
    }

    for f in forecasts {
        check_range(
            &mut errors,
            f.hour_of_day,
            0,
            23,
            "Hour of day must be between 0-23",
        );
        check_range(
            &mut errors,
            f.temperature,
            -50,
            50,
            "Temperature must be in the range of -50 to 50 Celsius degree",
        );
        check_range(
            &mut errors,
            f.precipitation,
            0,
            100,
            "Precipitation must be in the range of 0 to 100 percentage",
        );
        check_length(&mut errors, &f.status, 3, 50, "Status must be in between 3-50 characters");
    }
    errors
}

/// Handle `GET /api/v1/hourly/{code}`.
///
/// Returns readings after the hour in the `x-current-hour` header, or
/// `204 No Content` when nothing is left for the day.
async fn upcoming_hourly(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> Response {
    // ---
    let Some(hour) = current_hour(&headers) else {
        return validation_failed(vec![format!(
            "{CURRENT_HOUR_HEADER} header must be an hour between 0-23"
        )]);
    };

    match state.weather.list_upcoming_hourly(&code, hour).await {
        Ok(readings) if readings.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(readings) => {
            let body = HourlyWeatherResponse {
                location: code,
                hourly_forecast: readings.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Handle `PUT /api/v1/hourly/{code}`, replacing the stored forecast.
async fn replace_hourly(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(forecasts): Json<Vec<HourlyForecast>>,
) -> Response {
    // ---
    let errors = validate(&forecasts);
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    let readings = match forecasts
        .into_iter()
        .map(|f| f.into_reading(&code))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(readings) => readings,
        Err(e) => return e.into_response(),
    };
    match state.weather.replace_hourly(&code, readings).await {
        Ok(stored) => {
            info!("PUT /api/v1/hourly/{} - stored {} readings", code, stored.len());
            let body = HourlyWeatherResponse {
                location: code,
                hourly_forecast: stored.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_current_hour_header() {
        // ---
        let mut headers = HeaderMap::new();
        assert_eq!(current_hour(&headers), None);

        headers.insert(CURRENT_HOUR_HEADER, HeaderValue::from_static("10"));
        assert_eq!(current_hour(&headers), Some(10));

        headers.insert(CURRENT_HOUR_HEADER, HeaderValue::from_static("24"));
        assert_eq!(current_hour(&headers), None);

        headers.insert(CURRENT_HOUR_HEADER, HeaderValue::from_static("noon"));
        assert_eq!(current_hour(&headers), None);
    }

    #[test]
    fn test_forecast_ranges() {
        // ---
        let forecast = HourlyForecast {
            hour_of_day: 25,
            temperature: 60,
            precipitation: 50,
            status: "Sunny".to_string(),
        };

        let errors = validate(&[forecast]);
        assert_eq!(errors.len(), 2);
        assert!(validate(&[]).contains(&"Hourly forecast data cannot be empty".to_string()));
    }

    #[test]
    fn test_hour_outside_key_range_is_reported() {
        // ---
        let create_test_forecast = |hour_of_day| HourlyForecast {
            hour_of_day,
            temperature: 20,
            precipitation: 10,
            status: "Sunny".to_string(),
        };

        for hour in [-1, 300] {
            let errors = validate(&[create_test_forecast(hour)]);
            assert_eq!(errors, vec!["Hour of day must be between 0-23".to_string()]);
        }
        assert!(validate(&[create_test_forecast(0), create_test_forecast(23)]).is_empty());
    }
}
