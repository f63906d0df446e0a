//! Clock face geometry.
//!
//! Positions are relative to the clock center with 12 o'clock pointing up and
//! angles growing clockwise, in the same units as the radius.

use crate::forecast::{EpochSeconds, Forecast, ForecastTable};
use chrono::{DateTime, TimeZone, Timelike};
use serde::Serialize;
use std::f64::consts::PI;

/// Position of a point on the dial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    /// Upper left corner of a square of the requested size centered on (x, y).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner: Option<(f64, f64)>,
}

/// Reduce an hour of day to the 12-hour dial.
pub fn normalize_hour(hour: f64) -> f64 {
    hour.rem_euclid(12.0)
}

/// Fractional hour of day (0-24) of a point in time.
pub fn hour_of_day<Tz: TimeZone>(time: &DateTime<Tz>) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

/// Point at `hour` on a circle of `radius` around the clock center.
///
/// With `square_size`, also computes the corner that centers a square glyph
/// of that size on the point.
pub fn angular_position(hour: f64, radius: f64, square_size: Option<f64>) -> Coordinates {
    let a = 2.0 * PI * (hour / 12.0);

    let x = round_half_up(a.sin() * radius);
    let y = -round_half_up(a.cos() * radius);
    // Keep 12 o'clock at y = 0 rather than -0.
    let x = x + 0.0;
    let y = y + 0.0;

    Coordinates {
        x,
        y,
        corner: square_size.map(|size| (x - (size - 1.0) / 2.0, y - (size - 1.0) / 2.0)),
    }
}

/// Fixed day/night split used to pick symbol variants.
pub fn is_night(hour_of_day: f64) -> bool {
    hour_of_day < 7.0 || hour_of_day > 20.0
}

/// Rounds halves towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rotation in degrees of the hour hand.
pub fn hour_hand_degrees(hour: u32, minute: u32) -> f64 {
    f64::from((hour % 12) * 60 + minute) * 360.0 / (12.0 * 60.0)
}

/// Rotation in degrees of the minute hand.
pub fn minute_hand_degrees(minute: u32) -> f64 {
    f64::from(minute) * 360.0 / 60.0
}

/// A forecast ready to be drawn on the dial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherPlacement {
    pub timestamp: EpochSeconds,
    /// Local hour of day (0-24) of the forecast.
    pub hour: f64,
    pub forecast: Forecast,
}

impl WeatherPlacement {
    pub fn is_night(&self) -> bool {
        is_night(self.hour)
    }

    /// Hour on the 12-hour dial.
    pub fn dial_hour(&self) -> f64 {
        normalize_hour(self.hour)
    }
}

/// Forecasts from the display window of `table`, with local hours taken in
/// the time zone of `now`.
pub fn place_forecasts<Tz: TimeZone>(
    table: &ForecastTable,
    now: &DateTime<Tz>,
) -> Vec<WeatherPlacement> {
    let tz = now.timezone();
    table
        .select_window(now.timestamp())
        .filter_map(|(timestamp, forecast)| {
            let local = tz.timestamp_opt(timestamp, 0).single()?;
            Some(WeatherPlacement {
                timestamp,
                hour: hour_of_day(&local),
                forecast: forecast.clone(),
            })
        })
        .collect()
}
