use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single lookup request: a city name as typed, or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coords { lat: f64, lon: f64 },
}

impl WeatherQuery {
    /// The literal cache key for this query, if it has one.
    ///
    /// Coordinate lookups have no literal key and never touch the
    /// response cache.
    pub fn literal_key(&self) -> Option<&str> {
        match self {
            WeatherQuery::City(name) => Some(name.as_str()),
            WeatherQuery::Coords { .. } => None,
        }
    }
}

impl std::fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherQuery::City(name) => f.write_str(name),
            WeatherQuery::Coords { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
        }
    }
}

/// Condition groups reported by the weather source.
///
/// `Mist` covers the source's mist/fog/haze family; any group outside the
/// table maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Other,
}

impl ConditionKind {
    /// Parse the source's condition group name, case-insensitively.
    pub fn from_group(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "clear" => ConditionKind::Clear,
            "clouds" => ConditionKind::Clouds,
            "rain" => ConditionKind::Rain,
            "drizzle" => ConditionKind::Drizzle,
            "thunderstorm" => ConditionKind::Thunderstorm,
            "snow" => ConditionKind::Snow,
            "mist" | "fog" | "haze" => ConditionKind::Mist,
            _ => ConditionKind::Other,
        }
    }

    /// Icon name, with day/night variants where the source distinguishes
    /// them (clear and cloudy skies).
    pub fn icon_name(&self, is_day: bool) -> &'static str {
        match (self, is_day) {
            (ConditionKind::Clear, true) => "sun",
            (ConditionKind::Clear, false) => "moon",
            (ConditionKind::Clouds, true) => "cloud-sun",
            (ConditionKind::Clouds, false) => "cloud-moon",
            (ConditionKind::Rain, _) => "cloud-rain",
            (ConditionKind::Drizzle, _) => "cloud-drizzle",
            (ConditionKind::Thunderstorm, _) => "cloud-lightning",
            (ConditionKind::Snow, _) => "cloud-snow",
            (ConditionKind::Mist, _) => "cloud-fog",
            (ConditionKind::Other, _) => "cloud",
        }
    }

    /// Terminal glyph for the condition.
    pub fn glyph(&self, is_day: bool) -> &'static str {
        match (self, is_day) {
            (ConditionKind::Clear, true) => "☀",
            (ConditionKind::Clear, false) => "🌙",
            (ConditionKind::Clouds, true) => "⛅",
            (ConditionKind::Clouds, false) => "☁",
            (ConditionKind::Rain, _) => "🌧",
            (ConditionKind::Drizzle, _) => "🌦",
            (ConditionKind::Thunderstorm, _) => "⛈",
            (ConditionKind::Snow, _) => "🌨",
            (ConditionKind::Mist, _) => "🌫",
            (ConditionKind::Other, _) => "☁",
        }
    }
}

/// Temperature unit used for rendering.
///
/// Payloads always carry Celsius; conversion happens at display time and is
/// never written back into a payload or the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    /// Convert a raw Celsius reading into the integer shown to the user.
    pub fn convert(self, celsius: f64) -> i32 {
        match self {
            DisplayUnit::Celsius => celsius.round() as i32,
            DisplayUnit::Fahrenheit => (celsius * 9.0 / 5.0 + 32.0).round() as i32,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayUnit::Celsius => DisplayUnit::Fahrenheit,
            DisplayUnit::Fahrenheit => DisplayUnit::Celsius,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "°C",
            DisplayUnit::Fahrenheit => "°F",
        }
    }
}

/// Wind speed is delivered in m/s and shown in km/h.
pub fn wind_kmh(mps: f64) -> i32 {
    (mps * 3.6).round() as i32
}

/// Visibility is delivered in metres and shown in km.
pub fn visibility_km(metres: u32) -> i32 {
    (f64::from(metres) / 1000.0).round() as i32
}

/// One successful current-weather observation.
///
/// This is the payload the response cache stores, so it round-trips through
/// serde. Temperatures are Celsius regardless of the active display unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: u32,
    /// Absent when the source omits it.
    pub visibility_m: Option<u32>,
    pub condition: ConditionKind,
    pub description: String,
    pub is_day: bool,
    pub observed_at: DateTime<Utc>,
}
