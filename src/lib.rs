//! Location registry and weather forecast store for `weather-service`.
//!
//! The crate is split along the Explicit Module Boundary Pattern (EMBP):
//! - `models` holds the location and reading types with their composite keys
//! - `store` is keyed SQLite persistence with no business rules
//! - `service` enforces uniqueness, soft-delete visibility and wholesale
//!   replacement on top of the stores
//! - `routes` is the thin axum adapter mapping HTTP onto the services
//!
//! Sibling modules import each other only through the re-exports below.

mod config;
mod error;
mod models;
mod routes;
mod schema;
mod service;

pub mod store;

pub use config::{load_from_env, Config};
pub use error::{Error, Result};
pub use models::{
    DailyForecast, DailyKey, DailyWeatherReading, HourlyForecast, HourlyKey,
    HourlyWeatherReading, Location, LocationStatus, LocationUpdate,
};
pub use routes::{router, AppState};
pub use schema::create_schema;
pub use service::{LocationService, WeatherService};
