use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{Error, LocationService, WeatherService};

mod daily;
mod health;
mod hourly;
mod locations;

// ---

/// Services shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    // ---
    pub locations: LocationService,
    pub weather: WeatherService,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        AppState {
            locations: LocationService::new(pool.clone()),
            weather: WeatherService::new(pool),
        }
    }
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(locations::router())
        .merge(hourly::router())
        .merge(daily::router())
        .merge(health::router())
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // ---
        let status = match &self {
            Error::LocationNotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicateResource(_) => StatusCode::CONFLICT,
            Error::Invalid(_) => StatusCode::BAD_REQUEST,
            Error::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal storage error" })),
                )
                    .into_response();
            }
        };

        tracing::debug!("Request failed: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// 400 response listing every field constraint the request broke.
fn validation_failed(errors: Vec<String>) -> Response {
    // ---
    tracing::debug!("Validation failed: {:?}", errors);
    (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
}

/// Push `message` unless `value` has between `min` and `max` characters.
fn check_length(errors: &mut Vec<String>, value: &str, min: usize, max: usize, message: &str) {
    // ---
    let len = value.chars().count();
    if len < min || len > max {
        errors.push(message.to_string());
    }
}

/// Push `message` unless `value` lies in `min..=max`.
fn check_range(errors: &mut Vec<String>, value: i32, min: i32, max: i32, message: &str) {
    // ---
    if value < min || value > max {
        errors.push(message.to_string());
    }
}
