//! Daily forecast endpoints under `/api/v1/daily/{code}`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use super::{check_length, check_range, validation_failed, AppState};
use crate::DailyForecast;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/v1/daily/{code}", get(list_daily).put(replace_daily))
}

#[derive(Debug, Serialize)]
struct DailyWeatherResponse {
    location: String,
    daily_forecast: Vec<DailyForecast>,
}

fn validate(forecasts: &[DailyForecast]) -> Vec<String> {
    // ---
    let mut errors = Vec::new();
    if forecasts.is_empty() {
        errors.push("Daily forecast data cannot be empty".to_string());
    }

    for f in forecasts {
        check_range(
            &mut errors,
            f.day_of_month,
            1,
            31,
            "Day of month must be between 1-31",
        );
        check_range(&mut errors, f.month, 1, 12, "Month must be between 1-12");
        check_range(
            &mut errors,
            f.min_temp,
            -50,
            50,
            "Minimum temperature must be in the range of -50 to 50 Celsius degree",
        );
        check_range(
            &mut errors,
            f.max_temp,
            -50,
            50,
            "Maximum temperature must be in the range of -50 to 50 Celsius degree",
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

/// Handle `GET /api/v1/daily/{code}`, ordered by month then day.
async fn list_daily(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    // ---
    match state.weather.list_daily(&code).await {
        Ok(readings) if readings.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(readings) => {
            let body = DailyWeatherResponse {
                location: code,
                daily_forecast: readings.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Handle `PUT /api/v1/daily/{code}`, replacing the stored forecast.
async fn replace_daily(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(forecasts): Json<Vec<DailyForecast>>,
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
    match state.weather.replace_daily(&code, readings).await {
        Ok(stored) => {
            info!("PUT /api/v1/daily/{} - stored {} readings", code, stored.len());
            let body = DailyWeatherResponse {
                location: code,
                daily_forecast: stored.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
