//! Per-weekday aggregation of the source's 3-hour forecast feed.
//!
//! The feed is a flat list of samples covering roughly five days. Display
//! wants a stable 7-column strip, one column per weekday, so aggregation
//! always emits exactly seven summaries in Sun..Sat order and substitutes a
//! neutral placeholder for weekdays the feed does not cover.

use chrono::{DateTime, Datelike, FixedOffset};

use crate::model::ConditionKind;

/// Fixed weekday labels, in bucket order.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One raw 3-hour forecast point.
///
/// The timestamp carries the queried location's UTC offset, so the weekday
/// a sample lands in does not depend on the machine the tool runs on.
#[derive(Debug, Clone)]
pub struct ForecastSample {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub condition: ConditionKind,
    pub is_day: bool,
}

/// Derived summary for one weekday column.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastSummary {
    pub label: &'static str,
    pub min_c: f64,
    pub max_c: f64,
    pub condition: ConditionKind,
    pub is_day: bool,
}

impl DailyForecastSummary {
    fn placeholder(label: &'static str) -> Self {
        Self {
            label,
            min_c: 0.0,
            max_c: 0.0,
            condition: ConditionKind::Clear,
            is_day: true,
        }
    }
}

/// Group samples into the fixed Sun..Sat strip.
///
/// Temperatures are aggregated raw and rounded only at display time. The
/// representative condition of a day is taken from the sample at index
/// `len / 2` of that day's bucket, in arrival order.
pub fn aggregate(samples: &[ForecastSample]) -> [DailyForecastSummary; 7] {
    let mut buckets: [Vec<&ForecastSample>; 7] = Default::default();
    for sample in samples {
        let day = sample.timestamp.weekday().num_days_from_sunday() as usize;
        buckets[day].push(sample);
    }

    std::array::from_fn(|day| {
        let label = WEEKDAY_LABELS[day];
        let bucket = &buckets[day];
        if bucket.is_empty() {
            return DailyForecastSummary::placeholder(label);
        }

        let (min_c, max_c) = bucket.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), sample| (min.min(sample.temperature_c), max.max(sample.temperature_c)),
        );
        let median = bucket[bucket.len() / 2];

        DailyForecastSummary {
            label,
            min_c,
            max_c,
            condition: median.condition,
            is_day: median.is_day,
        }
    })
}
