//! met.no locationforecast client.
//!
//! Fetches the classic XML flavour of the forecast, where every `<time>`
//! element covers a `from`..`to` period and carries any of `<temperature>`,
//! `<windSpeed>` and `<symbol>`.

use crate::config::FetchConfig;
use crate::forecast::{EpochSeconds, ForecastTable, RawForecast};
use crate::location::ResolvedLocation;
use chrono::DateTime;
use std::time::{Duration, Instant};

/// Errors from forecast service operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Forecast service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed forecast XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Forecast service client.
#[derive(Debug)]
pub struct ForecastClient {
    client: reqwest::Client,
    forecast_url: String,
}

impl ForecastClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            forecast_url: config.forecast_url.clone(),
        })
    }

    /// Forecast request URL for `location`.
    pub fn url_for(&self, location: &ResolvedLocation) -> String {
        format!(
            "{}?lat={:.4}&lon={:.4}",
            self.forecast_url, location.latitude, location.longitude
        )
    }

    /// Download and parse the forecast for `location`.
    pub async fn fetch(&self, location: &ResolvedLocation) -> Result<ForecastTable> {
        let url = self.url_for(location);
        log::info!("Getting weather from: {}", url);

        let started = Instant::now();
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        log::info!(
            "Got weather XML ({} bytes) in {:.2}s",
            body.len(),
            started.elapsed().as_secs_f64()
        );

        parse_forecast_xml(&body)
    }
}

/// Build a forecast table from locationforecast XML.
///
/// Periods with unparseable timestamps are skipped, and unparseable weather
/// values are left out of their period.
pub fn parse_forecast_xml(xml: &str) -> Result<ForecastTable> {
    let doc = roxmltree::Document::parse(xml)?;

    let periods: Vec<roxmltree::Node> = doc
        .descendants()
        .filter(|n| n.has_tag_name("time"))
        .collect();
    log::info!("Parsing {} prognoses...", periods.len());

    let mut table = ForecastTable::new();
    for period in periods {
        match raw_forecast(period) {
            Some(raw) => table.merge(&raw),
            None => log::debug!(
                "Skipping prognosis with bad period: from={:?} to={:?}",
                period.attribute("from"),
                period.attribute("to")
            ),
        }
    }

    Ok(table)
}

fn raw_forecast(period: roxmltree::Node) -> Option<RawForecast> {
    let from = parse_timestamp(period.attribute("from")?)?;
    let to = parse_timestamp(period.attribute("to")?)?;

    Some(RawForecast {
        from,
        to,
        celsius: measurement(period, "temperature", "value"),
        wind_m_s: measurement(period, "windSpeed", "mps"),
        symbol: child_attribute(period, "symbol", "number"),
    })
}

fn parse_timestamp(value: &str) -> Option<EpochSeconds> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.timestamp())
}

/// First `tag` below `node`, with its `attribute` parsed.
fn child_attribute<T: std::str::FromStr>(
    node: roxmltree::Node,
    tag: &str,
    attribute: &str,
) -> Option<T> {
    node.descendants()
        .find(|n| n.has_tag_name(tag))?
        .attribute(attribute)?
        .trim()
        .parse()
        .ok()
}

/// Like [`child_attribute`], dropping `NaN` and infinities.
fn measurement(node: roxmltree::Node, tag: &str, attribute: &str) -> Option<f64> {
    child_attribute::<f64>(node, tag, attribute).filter(|v| v.is_finite())
}

/// URL of the weather symbol image for `symbol`.
pub fn icon_url(base: &str, symbol: u32, is_night: bool) -> String {
    format!(
        "{}?symbol={};content_type=image/png;is_night={}",
        base,
        symbol,
        u8::from(is_night)
    )
}
