//! Engine configuration.

use crate::error::BoostError;
use crate::money::Currency;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound accepted for `max_duration_days` (ten years).
pub const MAX_DURATION_CEILING_DAYS: u32 = 3650;

/// Runtime configuration injected into the pricer and lifecycle service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostConfig {
    /// While on, boosts are created with zero billed cost.
    #[serde(default = "default_true")]
    pub free_period: bool,

    /// Currency used when presenting costs.
    #[serde(default)]
    pub currency: Currency,

    /// Marketplace UTC offset; decides which calendar day seasonality sees.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,

    /// Longest boost a seller may buy.
    #[serde(default = "default_max_duration")]
    pub max_duration_days: u32,

    /// Allow several live boosts of one type on the same product.
    #[serde(default = "default_true")]
    pub allow_stacking: bool,

    /// Default number of sponsored listings returned.
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,

    /// Trailing window that counts a user as active for live metrics.
    #[serde(default = "default_activity_window")]
    pub activity_window_days: u32,
}

fn default_true() -> bool {
    true
}

fn default_utc_offset() -> i32 {
    8
}

fn default_max_duration() -> u32 {
    365
}

fn default_listing_limit() -> usize {
    20
}

fn default_activity_window() -> u32 {
    30
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            free_period: true,
            currency: Currency::default(),
            utc_offset_hours: default_utc_offset(),
            max_duration_days: default_max_duration(),
            allow_stacking: true,
            listing_limit: default_listing_limit(),
            activity_window_days: default_activity_window(),
        }
    }
}

impl BoostConfig {
    /// Load config from a TOML or JSON file (chosen by extension).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BoostError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BoostError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: BoostConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| BoostError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            toml::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Paid-mode config, mostly for tests and previews.
    pub fn paid() -> Self {
        Self {
            free_period: false,
            ..Self::default()
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), BoostError> {
        if !(1..=MAX_DURATION_CEILING_DAYS).contains(&self.max_duration_days) {
            return Err(BoostError::Config(format!(
                "max_duration_days must be between 1 and {}, got {}",
                MAX_DURATION_CEILING_DAYS, self.max_duration_days
            )));
        }
        if self.listing_limit == 0 {
            return Err(BoostError::Config(
                "listing_limit must be at least 1".to_string(),
            ));
        }
        if !(-14..=14).contains(&self.utc_offset_hours) {
            return Err(BoostError::Config(format!(
                "utc_offset_hours out of range: {}",
                self.utc_offset_hours
            )));
        }
        Ok(())
    }

    /// The marketplace's fixed UTC offset.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: BoostConfig = toml::from_str("").unwrap();
        assert_eq!(config, BoostConfig::default());
        assert!(config.free_period);
        assert_eq!(config.currency, Currency::PHP);
        assert_eq!(config.listing_limit, 20);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: BoostConfig = toml::from_str(
            r#"
            free_period = false
            currency = "USD"
            allow_stacking = false
            "#,
        )
        .unwrap();
        assert!(!config.free_period);
        assert_eq!(config.currency, Currency::USD);
        assert!(!config.allow_stacking);
        assert_eq!(config.max_duration_days, 365);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BoostConfig::default();
        config.listing_limit = 0;
        assert!(config.validate().is_err());

        let mut config = BoostConfig::default();
        config.utc_offset_hours = 20;
        assert!(config.validate().is_err());

        let mut config = BoostConfig::default();
        config.max_duration_days = u32::MAX;
        assert!(config.validate().is_err());

        config.max_duration_days = MAX_DURATION_CEILING_DAYS;
        assert!(config.validate().is_ok());

        assert!(BoostConfig::paid().validate().is_ok());
    }

    #[test]
    fn test_utc_offset() {
        let config = BoostConfig::default();
        assert_eq!(config.utc_offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_load_json_file() {
        let path = std::env::temp_dir().join(format!("boost-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"free_period": false, "listing_limit": 5}"#).unwrap();
        let config = BoostConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(!config.free_period);
        assert_eq!(config.listing_limit, 5);
    }
}
