//! Marketplace demand and competition signals.
//!
//! The pricing calculator only ever sees a [`MarketplaceMetrics`] value;
//! where the numbers come from is the [`MetricsProvider`]'s business.

use crate::boost::BoostType;
use crate::clock::Clock;
use crate::error::BoostError;
use crate::ids::CategoryId;
use crate::store::BoostRepository;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of the inputs one pricing call needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MarketplaceMetrics {
    pub total_active_users: u64,
    pub total_products: u64,
    /// Running boosts per type; missing types count as zero.
    #[serde(default)]
    pub active_boosts: BTreeMap<BoostType, u64>,
    pub category_active_users: u64,
    pub category_product_count: u64,
}

impl MarketplaceMetrics {
    /// The shipped placeholder figures.
    pub fn simulated() -> Self {
        Self {
            total_active_users: 1200,
            total_products: 350,
            active_boosts: BTreeMap::from([
                (BoostType::Featured, 2),
                (BoostType::SearchPriority, 3),
                (BoostType::HomepageBanner, 1),
                (BoostType::CategorySpotlight, 2),
            ]),
            category_active_users: 180,
            category_product_count: 45,
        }
    }

    pub fn active_boosts_of(&self, boost_type: BoostType) -> u64 {
        self.active_boosts.get(&boost_type).copied().unwrap_or(0)
    }

    pub fn with_active_boosts(mut self, boost_type: BoostType, count: u64) -> Self {
        self.active_boosts.insert(boost_type, count);
        self
    }

    pub fn with_category(mut self, active_users: u64, product_count: u64) -> Self {
        self.category_active_users = active_users;
        self.category_product_count = product_count;
        self
    }
}

/// Source of marketplace metrics.
pub trait MetricsProvider {
    /// Metrics for pricing, scoped to `category` when one is given.
    fn marketplace_metrics(
        &self,
        category: Option<&CategoryId>,
    ) -> Result<MarketplaceMetrics, BoostError>;
}

impl<M: MetricsProvider + ?Sized> MetricsProvider for &M {
    fn marketplace_metrics(
        &self,
        category: Option<&CategoryId>,
    ) -> Result<MarketplaceMetrics, BoostError> {
        (**self).marketplace_metrics(category)
    }
}

impl<M: MetricsProvider + ?Sized> MetricsProvider for std::sync::Arc<M> {
    fn marketplace_metrics(
        &self,
        category: Option<&CategoryId>,
    ) -> Result<MarketplaceMetrics, BoostError> {
        (**self).marketplace_metrics(category)
    }
}

/// Fixed metrics; ignores the category.
#[derive(Debug, Clone)]
pub struct SimulatedMetrics {
    metrics: MarketplaceMetrics,
}

impl SimulatedMetrics {
    pub fn new(metrics: MarketplaceMetrics) -> Self {
        Self { metrics }
    }
}

impl Default for SimulatedMetrics {
    fn default() -> Self {
        Self::new(MarketplaceMetrics::simulated())
    }
}

impl MetricsProvider for SimulatedMetrics {
    fn marketplace_metrics(
        &self,
        _category: Option<&CategoryId>,
    ) -> Result<MarketplaceMetrics, BoostError> {
        Ok(self.metrics.clone())
    }
}

/// Live metrics aggregated from the boost store.
///
/// Active users are distinct product viewers within the activity window;
/// the category figures are scoped through the viewed products' category.
#[derive(Debug)]
pub struct RepositoryMetrics<R, C> {
    repo: R,
    clock: C,
    activity_window: Duration,
}

impl<R: BoostRepository, C: Clock> RepositoryMetrics<R, C> {
    pub fn new(repo: R, clock: C, activity_window_days: u32) -> Self {
        Self {
            repo,
            clock,
            activity_window: Duration::days(i64::from(activity_window_days)),
        }
    }
}

impl<R: BoostRepository, C: Clock> MetricsProvider for RepositoryMetrics<R, C> {
    fn marketplace_metrics(
        &self,
        category: Option<&CategoryId>,
    ) -> Result<MarketplaceMetrics, BoostError> {
        let now = self.clock.now();
        let since = now - self.activity_window;

        let active_boosts = self.repo.active_boost_counts(now)?;
        let total_products = self.repo.product_count(None)?;
        let total_active_users = self.repo.active_user_count(None, since)?;

        let (category_active_users, category_product_count) = match category {
            Some(category) => (
                self.repo.active_user_count(Some(category), since)?,
                self.repo.product_count(Some(category))?,
            ),
            None => (total_active_users, total_products),
        };

        tracing::debug!(
            total_products,
            total_active_users,
            category_active_users,
            category_product_count,
            "aggregated marketplace metrics"
        );

        Ok(MarketplaceMetrics {
            total_active_users,
            total_products,
            active_boosts,
            category_active_users,
            category_product_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_defaults() {
        let metrics = SimulatedMetrics::default()
            .marketplace_metrics(Some(&CategoryId::new("bags")))
            .unwrap();
        assert_eq!(metrics.total_active_users, 1200);
        assert_eq!(metrics.total_products, 350);
        assert_eq!(metrics.active_boosts_of(BoostType::Featured), 2);
        assert_eq!(metrics.category_active_users, 180);
        assert_eq!(metrics.category_product_count, 45);
    }

    #[test]
    fn test_missing_type_counts_zero() {
        let metrics = MarketplaceMetrics::default();
        assert_eq!(metrics.active_boosts_of(BoostType::HomepageBanner), 0);

        let metrics = metrics.with_active_boosts(BoostType::HomepageBanner, 4);
        assert_eq!(metrics.active_boosts_of(BoostType::HomepageBanner), 4);
    }

    #[test]
    fn test_metrics_json_shape() {
        let json = serde_json::to_value(MarketplaceMetrics::simulated()).unwrap();
        assert_eq!(json["active_boosts"]["featured"], 2);
        assert_eq!(json["category_product_count"], 45);
    }
}
