use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::Level;

const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub predictor: PredictorSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictorSettings {
    /// Full predict endpoint, e.g. `http://localhost:5000/predict`.
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
}

impl Settings {
    /// Layered load: built-in defaults, then an optional `mediscan.toml`
    /// in the working directory, then `MEDISCAN_*` environment variables
    /// (`MEDISCAN_PREDICTOR__ENDPOINT=...`).
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("predictor.endpoint", DEFAULT_ENDPOINT)?
            .set_default("predictor.timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("log.level", "info")?
            .add_source(File::with_name("mediscan").required(false))
            .add_source(Environment::with_prefix("MEDISCAN").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            predictor: PredictorSettings {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl PredictorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Sibling `/health` path of the configured predict endpoint.
    pub fn health_endpoint(&self) -> String {
        match self.endpoint.rsplit_once('/') {
            Some((base, _)) if !base.is_empty() && !base.ends_with(':') && !base.ends_with('/') => {
                format!("{base}/health")
            }
            _ => format!("{}/health", self.endpoint.trim_end_matches('/')),
        }
    }
}

impl LogSettings {
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.predictor.endpoint, "http://localhost:5000/predict");
        assert_eq!(settings.predictor.timeout(), Duration::from_secs(30));
        assert_eq!(settings.log.max_level(), Level::INFO);
    }

    #[test]
    fn test_health_endpoint_replaces_last_segment() {
        let settings = Settings::default();
        assert_eq!(
            settings.predictor.health_endpoint(),
            "http://localhost:5000/health"
        );
    }

    #[test]
    fn test_health_endpoint_on_bare_host() {
        let predictor = PredictorSettings {
            endpoint: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 5,
        };
        assert_eq!(predictor.health_endpoint(), "http://127.0.0.1:5000/health");
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let log = LogSettings {
            level: "chatty".to_string(),
        };
        assert_eq!(log.max_level(), Level::INFO);
    }
}
