//! CLI configuration.

use anyhow::{Context, Result};
use boost_engine::config::BoostConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// SQLite database file.
    #[serde(default = "default_database")]
    pub database: String,

    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Engine configuration (pricing and lifecycle).
    #[serde(default)]
    pub engine: BoostConfig,
}

fn default_database() -> String {
    "boost.db".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            log: LogConfig::default(),
            engine: BoostConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: CliConfig = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };

        Ok(config)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default boost.toml config file.
pub fn generate_default_config() -> String {
    r#"# Boost engine configuration

database = "boost.db"

[log]
level = "warn"
format = "compact"   # or "json"

[engine]
# Boosts cost nothing while the free period runs.
free_period = true
currency = "PHP"
utc_offset_hours = 8
max_duration_days = 365
allow_stacking = true
listing_limit = 20
activity_window_days = 30
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.database, "boost.db");
        assert_eq!(config.log.format, LogFormat::Compact);
        assert_eq!(config.engine, BoostConfig::default());
    }

    #[test]
    fn test_missing_sections_default() {
        let config: CliConfig = toml::from_str("database = \"other.db\"").unwrap();
        assert_eq!(config.database, "other.db");
        assert_eq!(config.log.level, "warn");
        assert!(config.engine.free_period);
    }
}
