//! Location endpoints under `/api/v1/locations`.
//!
//! Sibling module of the `routes` gateway: the handlers, request and
//! response types stay private, and only the subrouter is exported for
//! `mod.rs` to merge. Request bodies are validated here before they reach
//! the [`LocationService`](crate::LocationService); service errors are
//! turned into status codes by `IntoResponse for Error`.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{check_length, validation_failed, AppState};
use crate::{Location, LocationStatus, LocationUpdate};

const ENDPOINT_URI: &str = "/api/v1/locations";

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route(
            "/api/v1/locations",
            get(list_locations).post(add_location).put(update_location),
        )
        .route(
            "/api/v1/locations/{code}",
            get(get_location).delete(delete_location),
        )
}

/// Location as sent by clients. Every field is optional so missing values
/// are reported as validation errors instead of a body rejection.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    code: Option<String>,
    city_name: Option<String>,
    region_name: Option<String>,
    country_name: Option<String>,
    country_code: Option<String>,
    enabled: Option<bool>,
}

/// Location as returned to clients.
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    code: String,
    city_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    region_name: Option<String>,
    country_code: String,
    country_name: String,
    enabled: bool,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        LocationResponse {
            code: location.code,
            city_name: location.city_name,
            region_name: location.region_name,
            country_code: location.country_code,
            country_name: location.country_name,
            enabled: location.enabled,
        }
    }
}

impl LocationRequest {
    /// Check field constraints and convert into a replacement record.
    fn validate(self) -> Result<LocationUpdate, Vec<String>> {
        // ---
        let mut errors = Vec::new();

        let code = required(&mut errors, self.code, "Location code cannot be null");
        let city_name = required(&mut errors, self.city_name, "City name cannot be null");
        let country_name = required(&mut errors, self.country_name, "Country name cannot be null");
        let country_code = required(&mut errors, self.country_code, "Country code cannot be null");

        if let Some(code) = &code {
            check_length(&mut errors, code, 3, 12, "Location code must have 3-12 characters");
        }
        if let Some(city_name) = &city_name {
            check_length(&mut errors, city_name, 3, 128, "City name must have 3-128 characters");
        }
        if let Some(region_name) = &self.region_name {
            check_length(&mut errors, region_name, 3, 128, "Region name must have 3-128 characters");
        }
        if let Some(country_name) = &country_name {
            check_length(&mut errors, country_name, 3, 64, "Country name must have 3-64 characters");
        }
        if let Some(country_code) = &country_code {
            check_length(&mut errors, country_code, 2, 2, "Country code must have 2 characters");
        }

        match (code, city_name, country_name, country_code) {
            (Some(code), Some(city_name), Some(country_name), Some(country_code))
                if errors.is_empty() =>
            {
                Ok(LocationUpdate {
                    code,
                    city_name,
                    region_name: self.region_name,
                    country_name,
                    country_code,
                    enabled: self.enabled,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(errors: &mut Vec<String>, value: Option<String>, message: &str) -> Option<String> {
    // ---
    if value.is_none() {
        errors.push(message.to_string());
    }
    value
}

/// Handle `GET /api/v1/locations`.
///
/// Lists active locations, or `204 No Content` when there are none.
async fn list_locations(State(state): State<AppState>) -> Response {
    // ---
    match state.locations.get_locations().await {
        Ok(locations) if locations.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(locations) => {
            let body: Vec<LocationResponse> = locations.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Handle `GET /api/v1/locations/{code}`.
async fn get_location(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    // ---
    match state.locations.get_location_by_code(&code).await {
        Ok(location) => (StatusCode::OK, Json(LocationResponse::from(location))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Handle `POST /api/v1/locations`.
///
/// Answers `201 Created` with a `Location` header pointing at the new
/// resource, or `409 Conflict` when the code is already taken.
async fn add_location(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> Response {
    // ---
    let update = match request.validate() {
        Ok(update) => update,
        Err(errors) => return validation_failed(errors),
    };

    let candidate = Location {
        code: update.code,
        city_name: update.city_name,
        region_name: update.region_name,
        country_name: update.country_name,
        country_code: update.country_code,
        enabled: update.enabled.unwrap_or(false),
        status: LocationStatus::Active,
    };

    match state.locations.add_location(candidate).await {
        Ok(location) => {
            info!("POST {} - added location {}", ENDPOINT_URI, location.code);
            let uri = format!("{}/{}", ENDPOINT_URI, location.code);
            (
                StatusCode::CREATED,
                [(header::LOCATION, uri)],
                Json(LocationResponse::from(location)),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Handle `PUT /api/v1/locations`.
///
/// The body's code selects the location to replace.
async fn update_location(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> Response {
    // ---
    let update = match request.validate() {
        Ok(update) => update,
        Err(errors) => return validation_failed(errors),
    };

    match state.locations.update_location_by_code(update).await {
        Ok(location) => {
            info!("PUT {} - updated location {}", ENDPOINT_URI, location.code);
            (StatusCode::OK, Json(LocationResponse::from(location))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Handle `DELETE /api/v1/locations/{code}`; the row is trashed, not removed.
async fn delete_location(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    // ---
    match state.locations.delete_location_by_code(&code).await {
        Ok(()) => {
            info!("DELETE {}/{} - location trashed", ENDPOINT_URI, code);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => e.into_response(),
    }
}
