//! Terminal rendering of view models.

use skycast_core::session::WeatherView;

/// Current conditions plus the weekly strip, as a printable block.
pub fn weather_report(view: &WeatherView) -> String {
    let unit = view.unit.symbol();
    let mut out = String::new();

    out.push_str(&format!("📍 {}\n", view.location));
    out.push_str(&format!(
        "{} {}{}  {}\n",
        view.glyph, view.temperature, unit, view.description
    ));
    out.push_str(&format!(
        "Feels like {}{}  Humidity {}%  Wind {} km/h  Pressure {} hPa\n",
        view.feels_like, unit, view.humidity_pct, view.wind_kmh, view.pressure_hpa
    ));
    match view.visibility_km {
        Some(km) => out.push_str(&format!("Visibility {km} km\n")),
        None => out.push_str("Visibility N/A\n"),
    }
    out.push_str(&format!("Updated: {}\n", view.updated));

    if let Some(strip) = &view.forecast {
        out.push('\n');
        for cell in strip {
            out.push_str(&format!(
                "{} {}  {}° / {}°\n",
                cell.label, cell.glyph, cell.min, cell.max
            ));
        }
    }

    if let Some(notice) = &view.cached_notice {
        out.push_str(&format!("\n⚠ {notice}\n"));
    }

    out
}

/// The recent-search list, or a hint when it is empty.
pub fn recent_list(cities: &[String]) -> String {
    if cities.is_empty() {
        return "No recent searches yet.".to_string();
    }

    let mut out = String::from("Recent searches:");
    for city in cities {
        out.push_str(&format!("\n  {city}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::model::DisplayUnit;
    use skycast_core::session::ForecastCell;

    fn view() -> WeatherView {
        WeatherView {
            location: "Paris, FR".to_string(),
            temperature: 21,
            feels_like: 20,
            unit: DisplayUnit::Celsius,
            description: "clear sky".to_string(),
            glyph: "☀",
            humidity_pct: 60,
            wind_kmh: 18,
            pressure_hpa: 1012,
            visibility_km: Some(10),
            updated: "2026-08-30 12:00".to_string(),
            cached_notice: None,
            forecast: None,
        }
    }

    #[test]
    fn report_carries_the_headline_fields() {
        let out = weather_report(&view());

        assert!(out.contains("Paris, FR"));
        assert!(out.contains("21°C"));
        assert!(out.contains("clear sky"));
        assert!(out.contains("Wind 18 km/h"));
        assert!(out.contains("Visibility 10 km"));
        assert!(!out.contains("cached"));
    }

    #[test]
    fn missing_visibility_renders_as_not_available() {
        let mut v = view();
        v.visibility_km = None;

        assert!(weather_report(&v).contains("Visibility N/A"));
    }

    #[test]
    fn cached_notice_and_strip_render_when_present() {
        let mut v = view();
        v.cached_notice = Some("Showing cached weather data due to connection issues.".to_string());
        v.forecast = Some(vec![ForecastCell {
            label: "Sun",
            glyph: "☀",
            min: 2,
            max: 8,
        }]);

        let out = weather_report(&v);
        assert!(out.contains("Sun ☀  2° / 8°"));
        assert!(out.contains("⚠ Showing cached weather data"));
    }

    #[test]
    fn recent_list_handles_empty_and_filled() {
        assert_eq!(recent_list(&[]), "No recent searches yet.");

        let cities = vec!["Paris".to_string(), "London".to_string()];
        let out = recent_list(&cities);
        assert!(out.contains("Paris"));
        assert!(out.contains("London"));
    }
}
