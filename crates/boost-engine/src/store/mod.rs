//! Persistence contract for boosts.
//!
//! The lifecycle service and the live metrics provider only talk to a
//! [`BoostRepository`]. [`SqlBoostStore`] implements it on SQLite.

#[cfg(feature = "storage")]
mod schema;
#[cfg(feature = "storage")]
pub mod seed;
#[cfg(feature = "storage")]
mod sql;

#[cfg(feature = "storage")]
pub use sql::SqlBoostStore;

use crate::boost::{
    AdBoost, BoostCounter, BoostStatus, BoostType, BoostedListing, FeaturedProduct,
    ProductSummary,
};
use crate::error::BoostError;
use crate::ids::{BoostId, CategoryId, ProductId, SellerId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// How a status change treats `paused_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PausedAt {
    Keep,
    Set(DateTime<Utc>),
    Clear,
}

/// A guarded status update.
///
/// Applied only when the boost is currently in one of `from` (and owned by
/// `seller_id` when given), as one atomic statement.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub boost_id: BoostId,
    pub seller_id: Option<SellerId>,
    pub from: &'static [BoostStatus],
    pub to: BoostStatus,
    pub paused_at: PausedAt,
    pub at: DateTime<Utc>,
}

impl StatusChange {
    /// Seller-initiated move to `to`, guarded by the status machine.
    pub fn by_seller(
        boost_id: &BoostId,
        seller_id: &SellerId,
        to: BoostStatus,
        at: DateTime<Utc>,
    ) -> Self {
        let paused_at = match to {
            BoostStatus::Paused => PausedAt::Set(at),
            BoostStatus::Active => PausedAt::Clear,
            _ => PausedAt::Keep,
        };
        Self {
            boost_id: boost_id.clone(),
            seller_id: Some(seller_id.clone()),
            from: BoostStatus::sources_for(to),
            to,
            paused_at,
            at,
        }
    }
}

/// Filter for sponsored listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub boost_type: Option<BoostType>,
    pub limit: usize,
    pub now: DateTime<Utc>,
}

/// Read/write contract of the boost store.
pub trait BoostRepository {
    /// Insert a boost and, when given, upsert its featured companion,
    /// atomically.
    fn insert_boost(
        &self,
        boost: &AdBoost,
        featured: Option<&FeaturedProduct>,
    ) -> Result<(), BoostError>;

    fn find_boost(&self, boost_id: &BoostId) -> Result<Option<AdBoost>, BoostError>;

    /// Apply a guarded status change.
    ///
    /// Returns the updated boost, or `None` when no row matched the guard.
    /// Cancelling a featured boost deletes its companion row in the same
    /// transaction.
    fn change_status(&self, change: &StatusChange) -> Result<Option<AdBoost>, BoostError>;

    /// Mark every live boost whose window lapsed before `now` as ended.
    fn expire_boosts(&self, now: DateTime<Utc>) -> Result<Vec<AdBoost>, BoostError>;

    /// Atomically add one to a counter. `false` when the boost is unknown.
    fn increment_counter(
        &self,
        boost_id: &BoostId,
        counter: BoostCounter,
    ) -> Result<bool, BoostError>;

    /// All of a seller's boosts, newest first.
    fn seller_boosts(&self, seller_id: &SellerId) -> Result<Vec<AdBoost>, BoostError>;

    /// Active or paused boosts of a type on a product whose window is open.
    fn live_boosts_for_product(
        &self,
        product_id: &ProductId,
        boost_type: BoostType,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdBoost>, BoostError>;

    fn find_product(&self, product_id: &ProductId) -> Result<Option<ProductSummary>, BoostError>;

    /// A seller's products that are neither deleted nor disabled.
    fn boostable_products(&self, seller_id: &SellerId) -> Result<Vec<ProductSummary>, BoostError>;

    /// Running boosts on approved, non-deleted products, highest budget first.
    fn active_boosted_products(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<BoostedListing>, BoostError>;

    fn featured_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<FeaturedProduct>, BoostError>;

    /// Running boosts per type (status active, window open at `now`).
    fn active_boost_counts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<BoostType, u64>, BoostError>;

    /// Non-deleted products, optionally within one category.
    fn product_count(&self, category: Option<&CategoryId>) -> Result<u64, BoostError>;

    /// Distinct users who viewed a product (in `category`, if given) since `since`.
    fn active_user_count(
        &self,
        category: Option<&CategoryId>,
        since: DateTime<Utc>,
    ) -> Result<u64, BoostError>;
}

impl<R: BoostRepository + ?Sized> BoostRepository for &R {
    fn insert_boost(
        &self,
        boost: &AdBoost,
        featured: Option<&FeaturedProduct>,
    ) -> Result<(), BoostError> {
        (**self).insert_boost(boost, featured)
    }

    fn find_boost(&self, boost_id: &BoostId) -> Result<Option<AdBoost>, BoostError> {
        (**self).find_boost(boost_id)
    }

    fn change_status(&self, change: &StatusChange) -> Result<Option<AdBoost>, BoostError> {
        (**self).change_status(change)
    }

    fn expire_boosts(&self, now: DateTime<Utc>) -> Result<Vec<AdBoost>, BoostError> {
        (**self).expire_boosts(now)
    }

    fn increment_counter(
        &self,
        boost_id: &BoostId,
        counter: BoostCounter,
    ) -> Result<bool, BoostError> {
        (**self).increment_counter(boost_id, counter)
    }

    fn seller_boosts(&self, seller_id: &SellerId) -> Result<Vec<AdBoost>, BoostError> {
        (**self).seller_boosts(seller_id)
    }

    fn live_boosts_for_product(
        &self,
        product_id: &ProductId,
        boost_type: BoostType,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdBoost>, BoostError> {
        (**self).live_boosts_for_product(product_id, boost_type, now)
    }

    fn find_product(&self, product_id: &ProductId) -> Result<Option<ProductSummary>, BoostError> {
        (**self).find_product(product_id)
    }

    fn boostable_products(&self, seller_id: &SellerId) -> Result<Vec<ProductSummary>, BoostError> {
        (**self).boostable_products(seller_id)
    }

    fn active_boosted_products(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<BoostedListing>, BoostError> {
        (**self).active_boosted_products(query)
    }

    fn featured_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<FeaturedProduct>, BoostError> {
        (**self).featured_product(product_id)
    }

    fn active_boost_counts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<BoostType, u64>, BoostError> {
        (**self).active_boost_counts(now)
    }

    fn product_count(&self, category: Option<&CategoryId>) -> Result<u64, BoostError> {
        (**self).product_count(category)
    }

    fn active_user_count(
        &self,
        category: Option<&CategoryId>,
        since: DateTime<Utc>,
    ) -> Result<u64, BoostError> {
        (**self).active_user_count(category, since)
    }
}
