use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub fetch: FetchConfig,
    pub render: RenderConfig,
}

/// Where to fetch the forecast for.
///
/// Leaving out the coordinates makes the clock look up the position of the
/// current public IP address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IP geolocation endpoint used when no coordinates are configured.
    pub discovery_url: String,
    /// Request timeout of the geolocation lookup.
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            discovery_url: "http://ip-api.com/json".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Forecast service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub forecast_url: String,
    pub icon_url: String,
    /// met.no rejects requests without an identifying User-Agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            forecast_url: "https://api.met.no/weatherapi/locationforecast/2.0/classic".to_string(),
            icon_url: "https://api.met.no/weatherapi/weathericon/1.1/".to_string(),
            user_agent: format!("weatherclock/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

/// Dial layout, in SVG user units on a 100x100 face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub hour_radius: f64,
    pub symbol_radius: f64,
    pub symbol_size: f64,
    /// Draw the 1-12 numerals under the forecast.
    pub show_numerals: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            hour_radius: 35.0,
            symbol_radius: 25.0,
            symbol_size: 9.0,
            show_numerals: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location, `<config dir>/weatherclock/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherclock").join("config.yaml"))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(ConfigError::ValidationError(format!(
                        "latitude must be within -90..90, got {}",
                        lat
                    )));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(ConfigError::ValidationError(format!(
                        "longitude must be within -180..180, got {}",
                        lon
                    )));
                }
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::ValidationError(
                    "latitude and longitude must be given together".to_string(),
                ))
            }
        }

        for (name, timeout) in [
            ("location.timeout_secs", self.location.timeout_secs),
            ("fetch.timeout_secs", self.fetch.timeout_secs),
        ] {
            if timeout == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be positive",
                    name
                )));
            }
        }

        let render = &self.render;
        for (name, value) in [
            ("hour_radius", render.hour_radius),
            ("symbol_radius", render.symbol_radius),
            ("symbol_size", render.symbol_size),
        ] {
            if !(value > 0.0 && value <= 50.0) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be within 0..50, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.hour_radius, 35.0);
        assert_eq!(config.render.symbol_radius, 25.0);
        assert_eq!(config.render.symbol_size, 9.0);
        assert!(config.location.latitude.is_none());
    }

    #[test]
    fn test_partial_config() {
        let yaml = r#"
location:
  latitude: 59.33
  longitude: 18.07
render:
  show_numerals: true
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.location.latitude, Some(59.33));
        assert_eq!(config.location.longitude, Some(18.07));
        assert_eq!(
            config.location.discovery_url,
            LocationConfig::default().discovery_url
        );
        assert!(config.render.show_numerals);
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn test_rejects_half_a_location() {
        let err = Config::parse("location:\n  latitude: 10.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let yaml = "location:\n  latitude: 91.0\n  longitude: 0.0\n";
        assert!(matches!(
            Config::parse(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_radius() {
        let yaml = "render:\n  hour_radius: 80\n";
        assert!(matches!(
            Config::parse(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let yaml = "fetch:\n  timeout_secs: 0\n";
        assert!(matches!(
            Config::parse(yaml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_location_timeout() {
        assert_eq!(Config::default().location.timeout_secs, 10);

        let config = Config::parse("location:\n  timeout_secs: 3\n").unwrap();
        assert_eq!(config.location.timeout_secs, 3);
        assert_eq!(config.fetch.timeout_secs, 30);

        let err = Config::parse("location:\n  timeout_secs: 0\n").unwrap_err();
        assert!(err.to_string().contains("location.timeout_secs"));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::parse("render: [1, 2"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fetch:\n  timeout_secs: 5").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/weatherclock.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
