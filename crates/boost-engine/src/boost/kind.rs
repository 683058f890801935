//! Boost placement types and their rate card.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement a seller can buy for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostType {
    /// Featured strip on the storefront.
    Featured,
    /// Ranked ahead of organic search results.
    SearchPriority,
    /// Homepage hero banner.
    HomepageBanner,
    /// Top of the product's category page.
    CategorySpotlight,
}

impl BoostType {
    /// Every boost type, in rate-card order.
    pub const ALL: [BoostType; 4] = [
        BoostType::Featured,
        BoostType::SearchPriority,
        BoostType::HomepageBanner,
        BoostType::CategorySpotlight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoostType::Featured => "featured",
            BoostType::SearchPriority => "search_priority",
            BoostType::HomepageBanner => "homepage_banner",
            BoostType::CategorySpotlight => "category_spotlight",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BoostType::Featured => "Featured",
            BoostType::SearchPriority => "Search Priority",
            BoostType::HomepageBanner => "Homepage Banner",
            BoostType::CategorySpotlight => "Category Spotlight",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "featured" => Some(BoostType::Featured),
            "search_priority" => Some(BoostType::SearchPriority),
            "homepage_banner" => Some(BoostType::HomepageBanner),
            "category_spotlight" => Some(BoostType::CategorySpotlight),
            _ => None,
        }
    }

    /// Base price per day, before any multiplier.
    pub fn base_rate(&self) -> f64 {
        match self {
            BoostType::Featured => 12.0,
            BoostType::SearchPriority => 20.0,
            BoostType::HomepageBanner => 45.0,
            BoostType::CategorySpotlight => 28.0,
        }
    }

    /// Concurrent placements the storefront can show.
    pub fn max_slots(&self) -> u64 {
        match self {
            BoostType::Featured => 6,
            BoostType::SearchPriority => 10,
            BoostType::HomepageBanner => 3,
            BoostType::CategorySpotlight => 8,
        }
    }

    pub fn avg_daily_impressions(&self) -> u64 {
        match self {
            BoostType::Featured => 500,
            BoostType::SearchPriority => 800,
            BoostType::HomepageBanner => 2000,
            BoostType::CategorySpotlight => 650,
        }
    }

    /// Average click-through rate (clicks / impressions).
    pub fn avg_ctr(&self) -> f64 {
        match self {
            BoostType::Featured => 0.035,
            BoostType::SearchPriority => 0.045,
            BoostType::HomepageBanner => 0.025,
            BoostType::CategorySpotlight => 0.04,
        }
    }

    /// Whether this type mirrors into the featured products table.
    pub fn has_featured_companion(&self) -> bool {
        matches!(self, BoostType::Featured)
    }
}

impl fmt::Display for BoostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for boost_type in BoostType::ALL {
            assert_eq!(BoostType::from_str(boost_type.as_str()), Some(boost_type));
        }
        assert_eq!(
            BoostType::from_str("Homepage-Banner"),
            Some(BoostType::HomepageBanner)
        );
        assert_eq!(BoostType::from_str("billboard"), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&BoostType::CategorySpotlight).unwrap();
        assert_eq!(json, "\"category_spotlight\"");
    }

    #[test]
    fn test_rate_card() {
        assert_eq!(BoostType::Featured.base_rate(), 12.0);
        assert_eq!(BoostType::SearchPriority.base_rate(), 20.0);
        assert_eq!(BoostType::HomepageBanner.base_rate(), 45.0);
        assert_eq!(BoostType::CategorySpotlight.base_rate(), 28.0);
        assert_eq!(BoostType::Featured.max_slots(), 6);
        assert!(BoostType::ALL.iter().all(|t| t.max_slots() > 0));
    }
}
