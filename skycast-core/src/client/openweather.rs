use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::FetchError;
use crate::forecast::ForecastSample;
use crate::model::{ConditionKind, CurrentConditions};

use super::WeatherClient;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeatherMap client over the 2.5 `/weather` and `/forecast` endpoints,
/// always requesting metric units so payloads stay in Celsius.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn get_body(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<String, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                reason: format!("failed to reach the weather service: {e}"),
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::Transport {
            reason: format!("failed to read the response body: {e}"),
        })?;

        if !status.is_success() {
            // Error bodies look like {"cod":"404","message":"city not found"}.
            return Err(FetchError::Api {
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    async fn fetch_current(
        &self,
        params: &[(&str, String)],
    ) -> Result<CurrentConditions, FetchError> {
        let body = self.get_body("weather", params).await?;

        let parsed: OwCurrent = serde_json::from_str(&body).map_err(|e| FetchError::Transport {
            reason: format!("failed to parse the current-weather payload: {e}"),
        })?;

        Ok(parsed.into_conditions())
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current_by_name(&self, city: &str) -> Result<CurrentConditions, FetchError> {
        self.fetch_current(&[("q", city.to_string())]).await
    }

    async fn current_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, FetchError> {
        self.fetch_current(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            .await
    }

    async fn forecast_by_name(&self, city: &str) -> Result<Vec<ForecastSample>, FetchError> {
        let body = self.get_body("forecast", &[("q", city.to_string())]).await?;

        let parsed: OwForecast =
            serde_json::from_str(&body).map_err(|e| FetchError::Transport {
                reason: format!("failed to parse the forecast payload: {e}"),
            })?;

        // Timestamps carry the queried location's offset so weekday buckets
        // do not depend on the machine timezone.
        let offset =
            FixedOffset::east_opt(parsed.city.timezone).unwrap_or_else(|| Utc.fix());

        let samples = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (condition, _, is_day) = summarize(&entry.weather);
                ForecastSample {
                    timestamp: unix_to_utc(entry.dt).with_timezone(&offset),
                    temperature_c: entry.main.temp,
                    condition,
                    is_day,
                }
            })
            .collect();

        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    name: String,
    dt: i64,
    #[serde(default)]
    visibility: Option<u32>,
    sys: OwSys,
    main: OwMain,
    wind: OwWind,
    weather: Vec<OwWeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeatherEntry {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    city: OwForecastCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwForecastCity {
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

impl OwCurrent {
    fn into_conditions(self) -> CurrentConditions {
        let (condition, description, is_day) = summarize(&self.weather);
        CurrentConditions {
            city: self.name,
            country: self.sys.country.unwrap_or_default(),
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            pressure_hpa: self.main.pressure,
            visibility_m: self.visibility,
            condition,
            description,
            is_day,
            observed_at: unix_to_utc(self.dt),
        }
    }
}

/// Condition group, free-text description, and day/night flag from the
/// payload's weather array. The icon code ends in `d` for daytime.
fn summarize(entries: &[OwWeatherEntry]) -> (ConditionKind, String, bool) {
    match entries.first() {
        Some(w) => (
            ConditionKind::from_group(&w.main),
            w.description.clone(),
            w.icon.contains('d'),
        ),
        None => (ConditionKind::Other, "unknown".to_string(), true),
    }
}

fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_extracted_from_the_error_body() {
        assert_eq!(
            error_message(r#"{"cod":"404","message":"city not found"}"#),
            Some("city not found".to_string())
        );
        assert_eq!(error_message(r#"{"cod":"404"}"#), None);
        assert_eq!(error_message("<html>bad gateway</html>"), None);
    }

    fn entry(main: &str, icon: &str) -> OwWeatherEntry {
        OwWeatherEntry {
            main: main.to_string(),
            description: "clear sky".to_string(),
            icon: icon.to_string(),
        }
    }

    #[test]
    fn day_night_flag_comes_from_the_icon_code() {
        assert!(summarize(&[entry("Clear", "01d")]).2);
        assert!(!summarize(&[entry("Clear", "01n")]).2);
    }

    #[test]
    fn condition_group_maps_through_the_icon_table() {
        assert_eq!(summarize(&[entry("Thunderstorm", "11d")]).0, ConditionKind::Thunderstorm);
        assert_eq!(summarize(&[entry("Haze", "50d")]).0, ConditionKind::Mist);
    }

    #[test]
    fn missing_weather_array_falls_back_to_other() {
        let (condition, description, is_day) = summarize(&[]);
        assert_eq!(condition, ConditionKind::Other);
        assert_eq!(description, "unknown");
        assert!(is_day);
    }
}
