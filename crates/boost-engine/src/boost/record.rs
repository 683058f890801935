//! Persistent boost records and their status machine.

use crate::boost::BoostType;
use crate::error::BoostError;
use crate::ids::{BoostId, ProductId, SellerId};
use crate::pricing::{round_to, BoostPriceEstimate, ASSUMED_AVERAGE_ORDER_VALUE};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostStatus {
    /// Created but not yet running. Never assigned by the purchase flow.
    Draft,
    /// Running.
    Active,
    /// Temporarily stopped by the seller.
    Paused,
    /// Window lapsed.
    Ended,
    /// Stopped by the seller for good.
    Cancelled,
}

impl BoostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoostStatus::Draft => "draft",
            BoostStatus::Active => "active",
            BoostStatus::Paused => "paused",
            BoostStatus::Ended => "ended",
            BoostStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(BoostStatus::Draft),
            "active" => Some(BoostStatus::Active),
            "paused" => Some(BoostStatus::Paused),
            "ended" => Some(BoostStatus::Ended),
            "cancelled" | "canceled" => Some(BoostStatus::Cancelled),
            _ => None,
        }
    }

    /// Active or paused: the boost still holds its window.
    pub fn is_live(&self) -> bool {
        matches!(self, BoostStatus::Active | BoostStatus::Paused)
    }

    /// No transition leaves this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BoostStatus::Ended | BoostStatus::Cancelled)
    }

    /// Statuses a boost may be in for a move to `to` to be accepted.
    ///
    /// Repeating a move (pausing a paused boost, cancelling a cancelled one)
    /// is accepted and treated as a no-op transition.
    pub fn sources_for(to: BoostStatus) -> &'static [BoostStatus] {
        match to {
            BoostStatus::Draft => &[],
            BoostStatus::Active => &[BoostStatus::Draft, BoostStatus::Active, BoostStatus::Paused],
            BoostStatus::Paused => &[BoostStatus::Active, BoostStatus::Paused],
            BoostStatus::Ended => &[BoostStatus::Active, BoostStatus::Paused],
            BoostStatus::Cancelled => &[
                BoostStatus::Draft,
                BoostStatus::Active,
                BoostStatus::Paused,
                BoostStatus::Cancelled,
            ],
        }
    }

    /// Check if a move to `to` is allowed.
    pub fn can_transition_to(&self, to: BoostStatus) -> bool {
        Self::sources_for(to).contains(self)
    }

    /// Like [`can_transition_to`](Self::can_transition_to) but as an error.
    pub fn ensure_transition(&self, to: BoostStatus) -> Result<(), BoostError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(BoostError::InvalidTransition {
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for BoostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A purchased promotional placement for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdBoost {
    pub id: BoostId,
    pub product_id: ProductId,
    pub seller_id: SellerId,
    pub boost_type: BoostType,
    pub duration_days: u32,
    pub daily_budget: f64,
    /// Daily budget times duration.
    pub total_budget: f64,
    /// Billed cost per day; 0 while the free period is on.
    pub cost_per_day: f64,
    /// Billed total; 0 while the free period is on.
    pub total_cost: f64,
    pub is_free: bool,
    pub status: BoostStatus,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub impressions: u64,
    pub clicks: u64,
    pub orders_generated: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdBoost {
    /// Build a running boost from a fresh price estimate.
    ///
    /// The window starts at `now` and lasts `estimate.duration_days` days.
    /// A window that runs past the representable calendar is rejected.
    pub fn activate(
        product_id: ProductId,
        seller_id: SellerId,
        estimate: &BoostPriceEstimate,
        now: DateTime<Utc>,
    ) -> Result<Self, BoostError> {
        let ends_at = Duration::try_days(i64::from(estimate.duration_days))
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| {
                BoostError::Validation(format!(
                    "a {} day window starting {} is out of range",
                    estimate.duration_days,
                    now.to_rfc3339()
                ))
            })?;

        Ok(Self {
            id: BoostId::generate(),
            product_id,
            seller_id,
            boost_type: estimate.boost_type,
            duration_days: estimate.duration_days,
            daily_budget: estimate.daily_budget,
            total_budget: round_to(estimate.daily_budget * estimate.duration_days as f64, 2),
            cost_per_day: estimate.billed_cost_per_day(),
            total_cost: estimate.billed_total_cost(),
            is_free: estimate.is_free,
            status: BoostStatus::Active,
            starts_at: now,
            ends_at,
            paused_at: None,
            impressions: 0,
            clicks: 0,
            orders_generated: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the boost is over, explicitly or because its window lapsed.
    ///
    /// Every reader that needs the "ended" state goes through this.
    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            BoostStatus::Ended => true,
            BoostStatus::Active | BoostStatus::Paused => self.ends_at < now,
            BoostStatus::Draft | BoostStatus::Cancelled => false,
        }
    }

    /// Status as a reader should see it at `now`.
    pub fn effective_status(&self, now: DateTime<Utc>) -> BoostStatus {
        if self.is_ended(now) {
            BoostStatus::Ended
        } else {
            self.status
        }
    }

    /// Whether the placement should be served right now.
    pub fn is_serving(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == BoostStatus::Active
    }

    /// Time left in the window (zero once lapsed).
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        if self.ends_at > now {
            self.ends_at - now
        } else {
            Duration::zero()
        }
    }

    /// Observed performance up to `now`.
    pub fn performance(&self, now: DateTime<Utc>) -> BoostPerformance {
        let until = now.min(self.ends_at);
        let elapsed_secs = (until - self.starts_at).num_seconds().max(0);
        let days_elapsed = ((elapsed_secs as f64) / 86_400.0)
            .ceil()
            .min(self.duration_days as f64) as u32;

        let ctr = ratio(self.clicks, self.impressions);
        let conversion_rate = ratio(self.orders_generated, self.clicks);
        let spend_to_date = round_to(self.cost_per_day * days_elapsed as f64, 2);
        let roas = if spend_to_date > 0.0 {
            round_to(
                self.orders_generated as f64 * ASSUMED_AVERAGE_ORDER_VALUE / spend_to_date,
                1,
            )
        } else {
            0.0
        };

        BoostPerformance {
            impressions: self.impressions,
            clicks: self.clicks,
            orders: self.orders_generated,
            ctr,
            conversion_rate,
            days_elapsed,
            spend_to_date,
            roas,
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        round_to(num as f64 / den as f64, 4)
    }
}

/// Actual results of a boost so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostPerformance {
    pub impressions: u64,
    pub clicks: u64,
    pub orders: u64,
    /// Clicks / impressions.
    pub ctr: f64,
    /// Orders / clicks.
    pub conversion_rate: f64,
    /// Started days of the window, capped at the duration.
    pub days_elapsed: u32,
    /// Billed spend for the elapsed days.
    pub spend_to_date: f64,
    /// Estimated revenue over spend, 0 while nothing was spent.
    pub roas: f64,
}

/// Companion storefront record for `featured` boosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedProduct {
    pub product_id: ProductId,
    pub is_active: bool,
    /// 2 for boosts above the budget threshold, otherwise 1.
    pub priority: u8,
    pub featured_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl FeaturedProduct {
    /// Daily budget above which a featured boost gets the higher tier.
    pub const PRIORITY_BUDGET_THRESHOLD: f64 = 100.0;

    pub fn priority_for_budget(daily_budget: f64) -> u8 {
        if daily_budget > Self::PRIORITY_BUDGET_THRESHOLD {
            2
        } else {
            1
        }
    }

    /// Companion row for `boost`, if its type has one.
    pub fn for_boost(boost: &AdBoost) -> Option<Self> {
        if !boost.boost_type.has_featured_companion() {
            return None;
        }
        Some(Self {
            product_id: boost.product_id.clone(),
            is_active: true,
            priority: Self::priority_for_budget(boost.daily_budget),
            featured_at: boost.starts_at,
            expires_at: boost.ends_at,
        })
    }
}

/// Performance counter that can be bumped on a boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoostCounter {
    Impressions,
    Clicks,
    Orders,
}

impl BoostCounter {
    /// Column holding the counter.
    pub fn column(&self) -> &'static str {
        match self {
            BoostCounter::Impressions => "impressions",
            BoostCounter::Clicks => "clicks",
            BoostCounter::Orders => "orders_generated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MarketplaceMetrics;
    use crate::pricing::{calculate_boost_price, BoostPriceRequest};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap()
    }

    fn estimate(boost_type: BoostType, days: u32, budget: f64, free: bool) -> BoostPriceEstimate {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        calculate_boost_price(
            &BoostPriceRequest::new(boost_type, days).with_daily_budget(budget),
            &MarketplaceMetrics::simulated(),
            date,
        )
        .with_free_period(free)
    }

    fn activate(est: &BoostPriceEstimate) -> AdBoost {
        AdBoost::activate(ProductId::new("p1"), SellerId::new("s1"), est, now()).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        assert!(BoostStatus::Active.can_transition_to(BoostStatus::Paused));
        assert!(BoostStatus::Paused.can_transition_to(BoostStatus::Active));
        assert!(BoostStatus::Paused.can_transition_to(BoostStatus::Paused));
        assert!(BoostStatus::Active.can_transition_to(BoostStatus::Cancelled));
        assert!(!BoostStatus::Cancelled.can_transition_to(BoostStatus::Active));
        assert!(!BoostStatus::Cancelled.can_transition_to(BoostStatus::Paused));
        assert!(!BoostStatus::Ended.can_transition_to(BoostStatus::Active));
        assert!(BoostStatus::Cancelled.is_terminal());
        assert!(BoostStatus::Cancelled
            .ensure_transition(BoostStatus::Active)
            .is_err());
    }

    #[test]
    fn test_activate_free_period_zeroes_billed_cost() {
        let est = estimate(BoostType::Featured, 7, 0.0, true);
        let boost = activate(&est);

        assert_eq!(boost.status, BoostStatus::Active);
        assert_eq!(boost.cost_per_day, 0.0);
        assert_eq!(boost.total_cost, 0.0);
        assert!(boost.is_free);
        assert!(est.cost_per_day > 0.0);
        assert_eq!(boost.ends_at - boost.starts_at, Duration::days(7));
    }

    #[test]
    fn test_activate_rejects_window_past_calendar() {
        let est = estimate(BoostType::SearchPriority, 200_000_000, 0.0, true);
        let result = AdBoost::activate(ProductId::new("p1"), SellerId::new("s1"), &est, now());
        assert!(matches!(result, Err(BoostError::Validation(_))));
    }

    #[test]
    fn test_activate_paid_keeps_cost() {
        let est = estimate(BoostType::Featured, 7, 150.0, false);
        let boost = activate(&est);
        assert_eq!(boost.cost_per_day, est.cost_per_day);
        assert_eq!(boost.total_cost, est.total_cost);
        assert_eq!(boost.total_budget, 1050.0);
    }

    #[test]
    fn test_is_ended_predicate() {
        let est = estimate(BoostType::SearchPriority, 3, 0.0, true);
        let mut boost = activate(&est);

        assert!(!boost.is_ended(now() + Duration::days(3)));
        assert!(boost.is_ended(now() + Duration::days(3) + Duration::seconds(1)));
        assert_eq!(
            boost.effective_status(now() + Duration::days(4)),
            BoostStatus::Ended
        );

        boost.status = BoostStatus::Cancelled;
        assert!(!boost.is_ended(now() + Duration::days(4)));

        boost.status = BoostStatus::Paused;
        assert!(!boost.is_serving(now()));
    }

    #[test]
    fn test_featured_companion() {
        let est = estimate(BoostType::Featured, 5, 150.0, true);
        let boost = activate(&est);
        let featured = FeaturedProduct::for_boost(&boost).unwrap();
        assert_eq!(featured.priority, 2);
        assert_eq!(featured.expires_at, boost.ends_at);

        assert_eq!(FeaturedProduct::priority_for_budget(100.0), 1);

        let est = estimate(BoostType::HomepageBanner, 5, 150.0, true);
        let banner = activate(&est);
        assert!(FeaturedProduct::for_boost(&banner).is_none());
    }

    #[test]
    fn test_performance() {
        let est = estimate(BoostType::Featured, 7, 0.0, false);
        let mut boost = activate(&est);
        boost.impressions = 1000;
        boost.clicks = 40;
        boost.orders_generated = 2;

        let perf = boost.performance(now() + Duration::hours(36));
        assert_eq!(perf.days_elapsed, 2);
        assert_eq!(perf.ctr, 0.04);
        assert_eq!(perf.conversion_rate, 0.05);
        assert_eq!(perf.spend_to_date, 28.0);
        assert_eq!(perf.roas, 60.7);

        let perf = boost.performance(now() + Duration::days(30));
        assert_eq!(perf.days_elapsed, 7);
    }

    #[test]
    fn test_performance_without_traffic() {
        let est = estimate(BoostType::Featured, 7, 0.0, true);
        let boost = activate(&est);
        let perf = boost.performance(now());
        assert_eq!(perf.ctr, 0.0);
        assert_eq!(perf.conversion_rate, 0.0);
        assert_eq!(perf.roas, 0.0);
        assert_eq!(perf.days_elapsed, 0);
    }
}
