//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - The weather data model and display-unit conversion
//! - Aggregation of the 3-hour forecast feed into a fixed weekday strip
//! - Recent-search history and the cached-response fallback
//! - The session controller that drives a weather client and owns all
//!   per-session state
//! - Abstractions over the HTTP and persistence capabilities
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod session;
pub mod storage;

pub use cache::ResponseCache;
pub use client::{OpenWeatherClient, WeatherClient};
pub use config::{Config, SavedLocation};
pub use error::{FetchError, SessionError};
pub use forecast::{DailyForecastSummary, ForecastSample, WEEKDAY_LABELS, aggregate};
pub use history::RecentSearches;
pub use model::{ConditionKind, CurrentConditions, DisplayUnit, WeatherQuery};
pub use session::{SessionState, WeatherSession, WeatherView};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, SharedStore};
