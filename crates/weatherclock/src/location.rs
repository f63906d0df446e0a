//! Position resolution.
//!
//! Configured coordinates are used as-is. Otherwise the position of the
//! current public IP address is looked up once; there is no retry.

use crate::config::LocationConfig;
use serde::Deserialize;
use std::time::Duration;

/// Errors from position lookup.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Location lookup failed: {0}")]
    Lookup(String),
}

pub type Result<T> = std::result::Result<T, LocationError>;

/// A position to fetch the forecast for.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
}

impl std::fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lat={:.4} lon={:.4}", self.latitude, self.longitude)?;
        if let Some(city) = &self.city {
            write!(f, " ({})", city)?;
        }
        Ok(())
    }
}

/// Response of the IP geolocation service.
#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

impl IpLocationResponse {
    fn into_location(self) -> Result<ResolvedLocation> {
        if let Some(status) = self.status.as_deref() {
            if status != "success" {
                return Err(LocationError::Lookup(
                    self.message.unwrap_or_else(|| status.to_string()),
                ));
            }
        }

        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => Ok(ResolvedLocation {
                latitude,
                longitude,
                city: self.city.filter(|c| !c.is_empty()),
            }),
            _ => Err(LocationError::Lookup(
                "response carried no coordinates".to_string(),
            )),
        }
    }
}

/// Resolve the configured location, falling back to IP geolocation.
pub async fn resolve_location(config: &LocationConfig) -> Result<ResolvedLocation> {
    if let (Some(latitude), Some(longitude)) = (config.latitude, config.longitude) {
        return Ok(ResolvedLocation {
            latitude,
            longitude,
            city: None,
        });
    }

    log::info!("Getting current position from {}...", config.discovery_url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    let response = client.get(&config.discovery_url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LocationError::Lookup(format!(
            "geolocation service returned status {}",
            status.as_u16()
        )));
    }

    response.json::<IpLocationResponse>().await?.into_location()
}
