//! The session controller.
//!
//! Owns all per-session state explicitly: the active display unit, the
//! current state-machine state, the recent-search history, the response
//! cache, and the client/store handles. The UI layer calls [`WeatherSession`]
//! methods and re-reads the session after each one; nothing lives in
//! ambient globals.

use chrono::Local;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::client::WeatherClient;
use crate::error::{FetchError, SessionError};
use crate::forecast::{DailyForecastSummary, ForecastSample, aggregate};
use crate::history::RecentSearches;
use crate::model::{CurrentConditions, DisplayUnit, WeatherQuery, visibility_km, wind_kmh};
use crate::storage::SharedStore;

/// Notice shown alongside a payload served from the cache.
pub const CACHED_NOTICE: &str = "Showing cached weather data due to connection issues.";

#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Fetching,
    Displaying(DisplayedWeather),
    Failed(SessionError),
}

/// The payload behind a `Displaying` state, plus what the view needs to
/// know about where it came from.
#[derive(Debug, Clone)]
pub struct DisplayedWeather {
    pub payload: CurrentConditions,
    pub forecast: Option<[DailyForecastSummary; 7]>,
    pub from_cache: bool,
    /// Which fetch produced this display. Forecast results for any other
    /// token are stale and get discarded.
    token: u64,
}

/// Display-ready projection of the current state, built on demand under the
/// active display unit. Temperatures here are integers in that unit; the
/// stored payload stays in Celsius.
#[derive(Debug, Clone)]
pub struct WeatherView {
    pub location: String,
    pub temperature: i32,
    pub feels_like: i32,
    pub unit: DisplayUnit,
    pub description: String,
    pub glyph: &'static str,
    pub humidity_pct: u8,
    pub wind_kmh: i32,
    pub pressure_hpa: u32,
    pub visibility_km: Option<i32>,
    pub updated: String,
    pub cached_notice: Option<String>,
    pub forecast: Option<Vec<ForecastCell>>,
}

/// One column of the weekly strip.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCell {
    pub label: &'static str,
    pub glyph: &'static str,
    pub min: i32,
    pub max: i32,
}

#[derive(Debug)]
pub struct WeatherSession {
    client: Box<dyn WeatherClient>,
    unit: DisplayUnit,
    state: SessionState,
    history: RecentSearches,
    cache: ResponseCache,
    fetch_seq: u64,
    input_echo: Option<String>,
}

impl WeatherSession {
    pub fn new(client: Box<dyn WeatherClient>, store: SharedStore) -> Self {
        Self {
            client,
            unit: DisplayUnit::default(),
            state: SessionState::Idle,
            history: RecentSearches::load(store.clone()),
            cache: ResponseCache::open(store),
            fetch_seq: 0,
            input_echo: None,
        }
    }

    /// Look up a city by name.
    ///
    /// An empty (after trimming) input is rejected without touching the
    /// session state. A submit while a request is in flight is ignored.
    pub async fn submit(&mut self, input: &str) -> Result<(), SessionError> {
        let city = input.trim();
        if city.is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        self.run_fetch(WeatherQuery::City(city.to_string())).await
    }

    /// Look up a coordinate pair. Same transitions as [`submit`], except the
    /// response cache is never consulted and the resolved city name from the
    /// payload feeds the history and the input echo.
    ///
    /// [`submit`]: WeatherSession::submit
    pub async fn submit_coords(&mut self, lat: f64, lon: f64) -> Result<(), SessionError> {
        self.run_fetch(WeatherQuery::Coords { lat, lon }).await
    }

    /// Flip the display unit. A displayed payload re-renders under the new
    /// unit on the next [`view`] call; no fetch is issued.
    ///
    /// [`view`]: WeatherSession::view
    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
    }

    pub fn unit(&self) -> DisplayUnit {
        self.unit
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Recent searches, most recent first.
    pub fn recent(&self) -> &[String] {
        self.history.list()
    }

    /// Resolved city name of the last coordinate lookup, for pre-filling the
    /// input field. Cleared by a successful name lookup.
    pub fn input_echo(&self) -> Option<&str> {
        self.input_echo.as_deref()
    }

    /// Project the current payload into a display-ready view under the
    /// active unit. `None` unless the session is displaying something.
    pub fn view(&self) -> Option<WeatherView> {
        let SessionState::Displaying(shown) = &self.state else {
            return None;
        };
        let p = &shown.payload;

        Some(WeatherView {
            location: format!("{}, {}", p.city, p.country),
            temperature: self.unit.convert(p.temperature_c),
            feels_like: self.unit.convert(p.feels_like_c),
            unit: self.unit,
            description: p.description.clone(),
            glyph: p.condition.glyph(p.is_day),
            humidity_pct: p.humidity_pct,
            wind_kmh: wind_kmh(p.wind_speed_mps),
            pressure_hpa: p.pressure_hpa,
            visibility_km: p.visibility_m.map(visibility_km),
            updated: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            cached_notice: shown.from_cache.then(|| CACHED_NOTICE.to_string()),
            forecast: shown
                .forecast
                .as_ref()
                .map(|days| days.iter().map(|day| self.cell(day)).collect()),
        })
    }

    fn cell(&self, day: &DailyForecastSummary) -> ForecastCell {
        ForecastCell {
            label: day.label,
            glyph: day.condition.glyph(day.is_day),
            min: self.unit.convert(day.min_c),
            max: self.unit.convert(day.max_c),
        }
    }

    async fn run_fetch(&mut self, query: WeatherQuery) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Fetching) {
            debug!(%query, "submit ignored, a request is already in flight");
            return Ok(());
        }
        self.state = SessionState::Fetching;
        self.fetch_seq += 1;
        let token = self.fetch_seq;
        debug!(%query, token, "fetching current conditions");

        let fetched = match &query {
            WeatherQuery::City(name) => self.client.current_by_name(name).await,
            WeatherQuery::Coords { lat, lon } => self.client.current_by_coords(*lat, *lon).await,
        };

        match fetched {
            Ok(payload) => {
                let resolved = payload.city.clone();
                self.state = SessionState::Displaying(DisplayedWeather {
                    payload: payload.clone(),
                    forecast: None,
                    from_cache: false,
                    token,
                });

                match &query {
                    WeatherQuery::City(name) => {
                        self.fetch_forecast(name, token).await;
                        self.history.record(name);
                        self.cache.put(name, &payload);
                        self.input_echo = None;
                    }
                    WeatherQuery::Coords { .. } => {
                        self.fetch_forecast(&resolved, token).await;
                        self.history.record(&resolved);
                        self.input_echo = Some(resolved);
                    }
                }
                Ok(())
            }
            Err(FetchError::Api { message }) => {
                let err = SessionError::from_api_message(message);
                self.state = SessionState::Failed(err.clone());
                Err(err)
            }
            Err(FetchError::Transport { reason }) => {
                warn!(%query, %reason, "current-weather fetch failed");
                match query.literal_key().and_then(|key| self.cache.get(key)) {
                    Some(cached) => {
                        self.state = SessionState::Displaying(DisplayedWeather {
                            payload: cached,
                            forecast: None,
                            from_cache: true,
                            token,
                        });
                        Ok(())
                    }
                    None => {
                        self.state = SessionState::Failed(SessionError::Offline);
                        Err(SessionError::Offline)
                    }
                }
            }
        }
    }

    /// The forecast is a non-critical enhancement: its failure is logged and
    /// swallowed, and the strip simply does not render.
    async fn fetch_forecast(&mut self, city: &str, token: u64) {
        match self.client.forecast_by_name(city).await {
            Ok(samples) => self.apply_forecast(token, &samples),
            Err(err) => debug!(%err, city, "forecast fetch failed, strip not rendered"),
        }
    }

    fn apply_forecast(&mut self, token: u64, samples: &[ForecastSample]) {
        if let SessionState::Displaying(shown) = &mut self.state
            && shown.token == token
        {
            shown.forecast = Some(aggregate(samples));
            return;
        }
        debug!(token, "discarding forecast for a superseded query");
    }
}
