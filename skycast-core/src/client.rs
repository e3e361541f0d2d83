//! HTTP client capability.
//!
//! The session controller talks to the weather source through the
//! [`WeatherClient`] trait so tests and embedders can substitute their own
//! transport. The shipped implementation targets OpenWeatherMap.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::FetchError;
use crate::forecast::ForecastSample;
use crate::model::CurrentConditions;

pub mod openweather;

pub use openweather::OpenWeatherClient;

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Current conditions for a city name as typed by the user.
    async fn current_by_name(&self, city: &str) -> Result<CurrentConditions, FetchError>;

    /// Current conditions for a coordinate pair.
    async fn current_by_coords(&self, lat: f64, lon: f64)
    -> Result<CurrentConditions, FetchError>;

    /// The 3-hour forecast feed for a city name.
    async fn forecast_by_name(&self, city: &str) -> Result<Vec<ForecastSample>, FetchError>;
}
