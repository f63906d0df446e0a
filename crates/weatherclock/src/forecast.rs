//! Forecast table construction and windowing.
//!
//! A forecast service reports overlapping periods (one hour, six hours, ...)
//! for the same instants. Every period is keyed by its midpoint, and when two
//! periods share a midpoint the shorter one is kept since it is the more
//! specific prediction.

use serde::Serialize;
use std::collections::BTreeMap;

/// Seconds since the Unix epoch.
pub type EpochSeconds = i64;

const SECONDS_PER_HOUR: i64 = 3600;

/// Forecasts are shown starting this long after "now".
pub const WINDOW_START_SECS: i64 = 45 * 60;

/// Forecasts are shown up to this long after "now".
pub const WINDOW_END_SECS: i64 = 11 * SECONDS_PER_HOUR + 45 * 60;

/// One forecast period as reported by the forecast service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawForecast {
    pub from: EpochSeconds,
    pub to: EpochSeconds,
    pub celsius: Option<f64>,
    pub wind_m_s: Option<f64>,
    pub symbol: Option<u32>,
}

impl RawForecast {
    /// A period with no weather data attached.
    pub fn new(from: EpochSeconds, to: EpochSeconds) -> Self {
        Self {
            from,
            to,
            ..Default::default()
        }
    }

    /// Duration of the period in hours.
    pub fn span_hours(&self) -> f64 {
        (i128::from(self.to) - i128::from(self.from)) as f64 / SECONDS_PER_HOUR as f64
    }

    /// Midpoint of the period, rounded down to the whole second.
    pub fn midpoint(&self) -> EpochSeconds {
        // The mean of two i64 values always fits back into an i64.
        (i128::from(self.from) + i128::from(self.to)).div_euclid(2) as EpochSeconds
    }
}

/// Weather predicted for one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    /// Length of the period this forecast was taken from.
    pub span_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celsius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_m_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<u32>,
}

/// Forecasts keyed by midpoint timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    entries: BTreeMap<EpochSeconds, Forecast>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, timestamp: EpochSeconds) -> Option<&Forecast> {
        self.entries.get(&timestamp)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EpochSeconds, &Forecast)> + '_ {
        self.entries.iter().map(|(ts, f)| (*ts, f))
    }

    /// Merge one reported period into the table.
    ///
    /// An entry already stored at the same midpoint with a span no longer
    /// than `raw`'s wins and `raw` is dropped. Otherwise the span is replaced
    /// and only the fields present in `raw` overwrite the stored ones.
    pub fn merge(&mut self, raw: &RawForecast) {
        let span_hours = raw.span_hours();
        let forecast = self.entries.entry(raw.midpoint()).or_insert_with(|| Forecast {
            span_hours: f64::INFINITY,
            ..Default::default()
        });

        if forecast.span_hours <= span_hours {
            return;
        }

        forecast.span_hours = span_hours;
        if raw.celsius.is_some() {
            forecast.celsius = raw.celsius;
        }
        if raw.wind_m_s.is_some() {
            forecast.wind_m_s = raw.wind_m_s;
        }
        if raw.symbol.is_some() {
            forecast.symbol = raw.symbol;
        }
    }

    /// Forecasts with midpoints between 45 minutes and 11h45m after `now`,
    /// both ends inclusive.
    pub fn select_window(
        &self,
        now: EpochSeconds,
    ) -> impl Iterator<Item = (EpochSeconds, &Forecast)> + Clone + '_ {
        let start = now.saturating_add(WINDOW_START_SECS);
        let end = now.saturating_add(WINDOW_END_SECS);
        self.entries.range(start..=end).map(|(ts, f)| (*ts, f))
    }
}

impl<'a> FromIterator<&'a RawForecast> for ForecastTable {
    fn from_iter<I: IntoIterator<Item = &'a RawForecast>>(iter: I) -> Self {
        let mut table = Self::new();
        for raw in iter {
            table.merge(raw);
        }
        table
    }
}

impl FromIterator<RawForecast> for ForecastTable {
    fn from_iter<I: IntoIterator<Item = RawForecast>>(iter: I) -> Self {
        let mut table = Self::new();
        for raw in iter {
            table.merge(&raw);
        }
        table
    }
}
