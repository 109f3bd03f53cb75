//! Business rules over the stores.
//!
//! The services own the pool and decide where transactions begin and end.
//! Every mutation that checks state before writing runs both steps in one
//! transaction.

mod locations;
mod weather;

pub use locations::LocationService;
pub use weather::WeatherService;
