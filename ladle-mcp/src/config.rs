//! Server configuration from the environment

use ladle_units::MeasurementSystem;
use tracing::warn;

pub const DEFAULT_SYSTEM_VAR: &str = "LADLE_DEFAULT_SYSTEM";
pub const LOG_VAR: &str = "LADLE_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// System used by conversions that don't name one
    pub default_system: MeasurementSystem,
    /// Log filter used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_system: MeasurementSystem::Metric,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(raw) = lookup(DEFAULT_SYSTEM_VAR) {
            match raw.parse::<MeasurementSystem>() {
                Ok(MeasurementSystem::Neutral) => {
                    warn!(value = %raw, "{} cannot be neutral, using {}", DEFAULT_SYSTEM_VAR, config.default_system);
                }
                Ok(system) => config.default_system = system,
                Err(e) => {
                    warn!(error = %e, "invalid {}, using {}", DEFAULT_SYSTEM_VAR, config.default_system);
                }
            }
        }

        if let Some(filter) = lookup(LOG_VAR).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        config
    }
}
