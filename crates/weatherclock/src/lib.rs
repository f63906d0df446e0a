//! Weather Clock
//!
//! Draws a 12-hour clock face with the weather forecast for the coming hours
//! placed around the dial: temperatures at the hour labels and weather symbols
//! further in.
//!
//! # Pipeline
//!
//! ```text
//! location ──► api (met.no XML) ──► ForecastTable ──► placement ──► render (SVG)
//! ```
//!
//! Each step runs once, in order. Any failure ends the run; nothing is retried
//! and nothing is drawn from a partial forecast.
//!
//! # Modules
//!
//! - [`config`] — YAML configuration for location, fetching and layout.
//! - [`location`] — Configured or IP-based position lookup.
//! - [`api`] — Forecast download and XML parsing.
//! - [`forecast`] — Forecast table merging and display windowing.
//! - [`placement`] — Dial geometry.
//! - [`render`] — SVG drawing.

pub mod api;
pub mod config;
pub mod error;
pub mod forecast;
pub mod location;
pub mod placement;
pub mod render;

pub use api::{ApiError, ForecastClient};
pub use config::{Config, ConfigError, FetchConfig, LocationConfig, RenderConfig};
pub use error::{Error, Result};
pub use forecast::{EpochSeconds, Forecast, ForecastTable, RawForecast};
pub use location::{resolve_location, LocationError, ResolvedLocation};
pub use placement::{angular_position, is_night, normalize_hour, Coordinates, WeatherPlacement};
pub use render::{render_clock, RenderContext};

/// Resolve the position and download its forecast.
pub async fn fetch_forecast(config: &Config) -> Result<(ResolvedLocation, ForecastTable)> {
    let location = resolve_location(&config.location).await?;
    log::info!("Position: {}", location);

    let client = ForecastClient::new(&config.fetch)?;
    let table = client.fetch(&location).await?;
    Ok((location, table))
}
