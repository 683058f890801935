//! Individual pricing multipliers.

use crate::boost::BoostType;
use crate::metrics::MarketplaceMetrics;
use chrono::{Datelike, NaiveDate, Weekday};

/// Users per product treated as neutral demand.
pub const BASELINE_USERS_PER_PRODUCT: f64 = 4.0;
pub const MIN_DEMAND_MULTIPLIER: f64 = 0.8;
pub const MAX_DEMAND_MULTIPLIER: f64 = 2.0;

/// Extra multiplier when every slot of a type is taken.
pub const MAX_COMPETITION_PREMIUM: f64 = 0.5;

pub const PAYDAY_MULTIPLIER: f64 = 1.20;
pub const HOLIDAY_MULTIPLIER: f64 = 1.15;
pub const MIN_SEASONAL_INDEX: f64 = 0.9;
pub const MAX_SEASONAL_INDEX: f64 = 1.8;

/// Daily budget above which the flat surcharge applies.
pub const BUDGET_SURCHARGE_THRESHOLD: f64 = 200.0;
pub const BUDGET_SURCHARGE_PER_DAY: f64 = 5.0;

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Shopper-to-inventory pressure in a category.
///
/// A category with no products is treated as having one.
pub fn demand_multiplier(category_active_users: u64, category_product_count: u64) -> f64 {
    let ratio = category_active_users as f64 / category_product_count.max(1) as f64;
    (ratio / BASELINE_USERS_PER_PRODUCT).clamp(MIN_DEMAND_MULTIPLIER, MAX_DEMAND_MULTIPLIER)
}

/// How full the boost type's slots are, from 1.0 (empty) to 1.5 (full).
pub fn competition_factor(active_boosts: u64, max_slots: u64) -> f64 {
    let occupancy = (active_boosts as f64 / max_slots.max(1) as f64).min(1.0);
    1.0 + MAX_COMPETITION_PREMIUM * occupancy
}

pub fn competition_for(boost_type: BoostType, metrics: &MarketplaceMetrics) -> f64 {
    competition_factor(metrics.active_boosts_of(boost_type), boost_type.max_slots())
}

fn weekday_multiplier(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Sun => 1.15,
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => 1.0,
        Weekday::Fri => 1.1,
        Weekday::Sat => 1.2,
    }
}

/// Days around the 1st, the 15th and month end, when salaries land.
pub fn is_payday_window(date: NaiveDate) -> bool {
    matches!(date.day(), 1..=3 | 14..=16 | 29..=31)
}

/// November and December shopping season.
pub fn is_holiday_season(date: NaiveDate) -> bool {
    matches!(date.month(), 11 | 12)
}

/// Day-of-week, payday and holiday pressure for a calendar day.
pub fn seasonal_index(date: NaiveDate) -> f64 {
    let mut index = weekday_multiplier(date.weekday());
    if is_payday_window(date) {
        index *= PAYDAY_MULTIPLIER;
    }
    if is_holiday_season(date) {
        index *= HOLIDAY_MULTIPLIER;
    }
    round_to(index.clamp(MIN_SEASONAL_INDEX, MAX_SEASONAL_INDEX), 2)
}

/// Fractional discount for a boost length.
pub fn duration_discount(duration_days: u32) -> f64 {
    match duration_days {
        0..=13 => 0.0,
        14..=29 => 0.15,
        _ => 0.25,
    }
}

pub fn budget_surcharge(daily_budget: f64) -> f64 {
    if daily_budget > BUDGET_SURCHARGE_THRESHOLD {
        BUDGET_SURCHARGE_PER_DAY
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_demand_bounds() {
        for users in [0_u64, 1, 10, 100, 180, 1_000, 1_000_000] {
            for products in [0_u64, 1, 5, 45, 1_000, 1_000_000] {
                let m = demand_multiplier(users, products);
                assert!((0.8..=2.0).contains(&m), "{users}/{products} -> {m}");
            }
        }
    }

    #[test]
    fn test_demand_zero_products() {
        assert_eq!(demand_multiplier(0, 0), 0.8);
        assert_eq!(demand_multiplier(4, 0), 1.0);
        assert_eq!(demand_multiplier(100, 0), 2.0);
    }

    #[test]
    fn test_demand_baseline() {
        assert_eq!(demand_multiplier(180, 45), 1.0);
        assert_eq!(demand_multiplier(270, 45), 1.5);
    }

    #[test]
    fn test_competition_bounds() {
        for boost_type in BoostType::ALL {
            for active in 0..50 {
                let f = competition_factor(active, boost_type.max_slots());
                assert!((1.0..=1.5).contains(&f));
            }
        }
        assert_eq!(competition_factor(0, 6), 1.0);
        assert_eq!(competition_factor(6, 6), 1.5);
        assert_eq!(competition_factor(60, 6), 1.5);
        assert_eq!(competition_factor(3, 0), 1.5);
    }

    #[test]
    fn test_seasonal_examples() {
        // Tuesday, mid-month, March
        assert_eq!(seasonal_index(date(2026, 3, 10)), 1.0);
        // Friday
        assert_eq!(seasonal_index(date(2026, 3, 13)), 1.1);
        // Saturday on the 14th: 1.2 * 1.2
        assert_eq!(seasonal_index(date(2026, 3, 14)), 1.44);
        // Sunday Nov 1st: 1.15 * 1.2 * 1.15
        assert_eq!(seasonal_index(date(2026, 11, 1)), 1.59);
        // Wednesday in December
        assert_eq!(seasonal_index(date(2026, 12, 9)), 1.15);
    }

    #[test]
    fn test_seasonal_bounds_whole_year() {
        let mut day = date(2024, 1, 1);
        while day < date(2025, 1, 1) {
            let idx = seasonal_index(day);
            assert!((0.9..=1.8).contains(&idx), "{day} -> {idx}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_payday_window() {
        assert!(is_payday_window(date(2026, 2, 1)));
        assert!(is_payday_window(date(2026, 2, 15)));
        assert!(is_payday_window(date(2026, 1, 31)));
        assert!(!is_payday_window(date(2026, 2, 4)));
        assert!(!is_payday_window(date(2026, 2, 28)));
    }

    #[test]
    fn test_duration_discount_tiers() {
        assert_eq!(duration_discount(1), 0.0);
        assert_eq!(duration_discount(13), 0.0);
        assert_eq!(duration_discount(14), 0.15);
        assert_eq!(duration_discount(29), 0.15);
        assert_eq!(duration_discount(30), 0.25);
        assert_eq!(duration_discount(365), 0.25);
    }

    #[test]
    fn test_budget_surcharge() {
        assert_eq!(budget_surcharge(200.0), 0.0);
        assert_eq!(budget_surcharge(200.01), 5.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(14.000000000000002, 2), 14.0);
        assert_eq!(round_to(10.500000000000002, 2), 10.5);
        assert_eq!(round_to(1.166666, 4), 1.1667);
    }
}
