//! Dynamic boost pricing.
//!
//! Cost per day is the boost type's base rate scaled by category demand,
//! slot competition and seasonality, discounted for long boosts, plus a
//! flat surcharge for high daily budgets.

mod estimate;
pub mod factors;
mod pricer;

pub use estimate::{
    calculate_boost_price, BoostPriceEstimate, BoostPriceRequest, ASSUMED_AVERAGE_ORDER_VALUE,
    ASSUMED_CONVERSION_RATE,
};
pub use factors::round_to;
pub use pricer::BoostPricer;
