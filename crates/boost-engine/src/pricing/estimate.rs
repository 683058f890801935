//! Boost price estimate and the calculator that produces it.

use crate::boost::BoostType;
use crate::metrics::MarketplaceMetrics;
use crate::pricing::factors::{
    budget_surcharge, competition_for, demand_multiplier, duration_discount, round_to,
    seasonal_index,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Share of clicks assumed to turn into an order.
pub const ASSUMED_CONVERSION_RATE: f64 = 0.035;

/// Average order value assumed for ROAS.
pub const ASSUMED_AVERAGE_ORDER_VALUE: f64 = 850.0;

/// What a seller is asking to buy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostPriceRequest {
    pub boost_type: BoostType,
    pub duration_days: u32,
    /// Only used as a surcharge trigger.
    #[serde(default)]
    pub daily_budget: f64,
}

impl BoostPriceRequest {
    pub fn new(boost_type: BoostType, duration_days: u32) -> Self {
        Self {
            boost_type,
            duration_days,
            daily_budget: 0.0,
        }
    }

    pub fn with_daily_budget(mut self, daily_budget: f64) -> Self {
        self.daily_budget = daily_budget;
        self
    }
}

/// Full output of one pricing calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostPriceEstimate {
    pub boost_type: BoostType,
    pub duration_days: u32,
    pub daily_budget: f64,
    /// Simulated price per day, before any free-period override.
    pub cost_per_day: f64,
    pub total_cost: f64,
    /// 0, 15 or 25.
    pub discount_percent: u8,

    pub base_rate: f64,
    pub demand_multiplier: f64,
    pub competition_factor: f64,
    pub seasonal_index: f64,

    pub estimated_impressions: u64,
    pub estimated_cpm: f64,
    pub estimated_clicks: u64,
    pub estimated_cpc: f64,
    pub estimated_orders: u64,
    pub estimated_roas: f64,

    /// Free period: the seller is billed nothing for this boost.
    pub is_free: bool,
}

impl BoostPriceEstimate {
    /// Mark the estimate as falling inside (or outside) the free period.
    pub fn with_free_period(mut self, is_free: bool) -> Self {
        self.is_free = is_free;
        self
    }

    /// What the seller is charged per day.
    pub fn billed_cost_per_day(&self) -> f64 {
        if self.is_free {
            0.0
        } else {
            self.cost_per_day
        }
    }

    /// What the seller is charged in total.
    pub fn billed_total_cost(&self) -> f64 {
        if self.is_free {
            0.0
        } else {
            self.total_cost
        }
    }
}

/// Price a boost against a metrics snapshot on a given calendar day.
///
/// Pure and infallible. A zero duration yields a zero-cost, zero-traffic
/// estimate rather than an error.
pub fn calculate_boost_price(
    request: &BoostPriceRequest,
    metrics: &MarketplaceMetrics,
    date: NaiveDate,
) -> BoostPriceEstimate {
    let boost_type = request.boost_type;
    let days = request.duration_days;

    let base_rate = boost_type.base_rate();
    let demand = demand_multiplier(
        metrics.category_active_users,
        metrics.category_product_count,
    );
    let competition = competition_for(boost_type, metrics);
    let seasonal = seasonal_index(date);
    let discount = duration_discount(days);

    let raw_per_day = base_rate * demand * competition * seasonal * (1.0 - discount)
        + budget_surcharge(request.daily_budget);
    let cost_per_day = round_to(raw_per_day, 2);
    let total_cost = round_to(cost_per_day * days as f64, 2);

    let impressions = boost_type.avg_daily_impressions() * u64::from(days);
    let clicks = (impressions as f64 * boost_type.avg_ctr()).round() as u64;
    let orders = (clicks as f64 * ASSUMED_CONVERSION_RATE).round() as u64;

    let cpm = if impressions > 0 {
        round_to(total_cost / impressions as f64 * 1000.0, 2)
    } else {
        0.0
    };
    let cpc = if clicks > 0 {
        round_to(total_cost / clicks as f64, 2)
    } else {
        0.0
    };
    let roas = if total_cost > 0.0 {
        round_to(orders as f64 * ASSUMED_AVERAGE_ORDER_VALUE / total_cost, 1)
    } else {
        0.0
    };

    BoostPriceEstimate {
        boost_type,
        duration_days: days,
        daily_budget: request.daily_budget,
        cost_per_day,
        total_cost,
        discount_percent: (discount * 100.0).round() as u8,
        base_rate,
        demand_multiplier: round_to(demand, 4),
        competition_factor: round_to(competition, 4),
        seasonal_index: seasonal,
        estimated_impressions: impressions,
        estimated_cpm: cpm,
        estimated_clicks: clicks,
        estimated_cpc: cpc,
        estimated_orders: orders,
        estimated_roas: roas,
        is_free: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tuesday, 10 March 2026: no payday, no holiday.
    fn plain_tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn price(boost_type: BoostType, days: u32, budget: f64) -> BoostPriceEstimate {
        calculate_boost_price(
            &BoostPriceRequest::new(boost_type, days).with_daily_budget(budget),
            &MarketplaceMetrics::simulated(),
            plain_tuesday(),
        )
    }

    #[test]
    fn test_featured_week_on_plain_tuesday() {
        let est = price(BoostType::Featured, 7, 0.0);
        assert_eq!(est.demand_multiplier, 1.0);
        assert_eq!(est.competition_factor, 1.1667);
        assert_eq!(est.seasonal_index, 1.0);
        assert_eq!(est.discount_percent, 0);
        assert_eq!(est.cost_per_day, 14.0);
        assert_eq!(est.total_cost, 98.0);
        assert!(!est.is_free);
    }

    #[test]
    fn test_featured_month_gets_quarter_off() {
        let est = price(BoostType::Featured, 30, 0.0);
        assert_eq!(est.discount_percent, 25);
        assert_eq!(est.cost_per_day, 10.5);
        assert_eq!(est.total_cost, 315.0);
    }

    #[test]
    fn test_projection() {
        let est = price(BoostType::Featured, 7, 0.0);
        assert_eq!(est.estimated_impressions, 3500);
        assert_eq!(est.estimated_clicks, 123);
        assert_eq!(est.estimated_orders, 4);
        assert_eq!(est.estimated_cpm, 28.0);
        assert_eq!(est.estimated_cpc, 0.8);
        assert_eq!(est.estimated_roas, 34.7);
    }

    #[test]
    fn test_total_is_rounded_product() {
        for boost_type in BoostType::ALL {
            for days in [1_u32, 2, 7, 13, 14, 15, 29, 30, 45, 90, 365] {
                for budget in [0.0, 150.0, 250.0] {
                    let est = price(boost_type, days, budget);
                    assert!(est.cost_per_day >= 0.0);
                    assert_eq!(est.total_cost, round_to(est.cost_per_day * days as f64, 2));
                }
            }
        }
    }

    #[test]
    fn test_longer_boosts_cost_less_per_day() {
        for boost_type in BoostType::ALL {
            let week = price(boost_type, 7, 0.0);
            let fortnight = price(boost_type, 14, 0.0);
            let month = price(boost_type, 30, 0.0);
            assert!(month.total_cost / 30.0 <= week.total_cost / 7.0);
            assert!(fortnight.total_cost / 14.0 <= week.total_cost / 7.0);
        }
    }

    #[test]
    fn test_budget_surcharge_crossing_threshold() {
        for boost_type in BoostType::ALL {
            let at = price(boost_type, 7, 200.0);
            let over = price(boost_type, 7, 201.0);
            assert!((over.cost_per_day - at.cost_per_day - 5.0).abs() < 0.011);
        }
        assert_eq!(price(BoostType::Featured, 7, 201.0).cost_per_day, 19.0);
    }

    #[test]
    fn test_zero_duration_is_degenerate_not_nan() {
        let est = price(BoostType::HomepageBanner, 0, 0.0);
        assert_eq!(est.total_cost, 0.0);
        assert_eq!(est.estimated_impressions, 0);
        assert_eq!(est.estimated_cpm, 0.0);
        assert_eq!(est.estimated_cpc, 0.0);
        assert_eq!(est.estimated_roas, 0.0);
        assert!(est.cost_per_day.is_finite());
    }

    #[test]
    fn test_crowded_category_and_full_slots() {
        let metrics = MarketplaceMetrics::simulated()
            .with_category(1_000, 10)
            .with_active_boosts(BoostType::HomepageBanner, 9);
        let est = calculate_boost_price(
            &BoostPriceRequest::new(BoostType::HomepageBanner, 1),
            &metrics,
            plain_tuesday(),
        );
        assert_eq!(est.demand_multiplier, 2.0);
        assert_eq!(est.competition_factor, 1.5);
        // 45 * 2.0 * 1.5
        assert_eq!(est.cost_per_day, 135.0);
    }

    #[test]
    fn test_free_period_billing() {
        let est = price(BoostType::Featured, 7, 0.0).with_free_period(true);
        assert_eq!(est.cost_per_day, 14.0);
        assert_eq!(est.billed_cost_per_day(), 0.0);
        assert_eq!(est.billed_total_cost(), 0.0);
    }
}
