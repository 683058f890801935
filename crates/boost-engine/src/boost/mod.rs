//! Boost module.
//!
//! Contains boost types, persistent boost records, and listing joins.

mod kind;
mod listing;
mod record;

pub use kind::BoostType;
pub use listing::{ApprovalStatus, BoostedListing, CategorySummary, ProductSummary, SellerSummary};
pub use record::{AdBoost, BoostCounter, BoostPerformance, BoostStatus, FeaturedProduct};
