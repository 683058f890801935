//! Boost lifecycle: purchase, pause, resume, cancel, expiry and tracking.

use crate::boost::{
    AdBoost, BoostCounter, BoostStatus, BoostType, BoostedListing, FeaturedProduct,
    ProductSummary,
};
use crate::clock::Clock;
use crate::config::BoostConfig;
use crate::error::BoostError;
use crate::ids::{BoostId, CategoryId, ProductId, SellerId};
use crate::metrics::MetricsProvider;
use crate::pricing::{BoostPriceEstimate, BoostPriceRequest, BoostPricer};
use crate::store::{BoostRepository, ListingQuery, StatusChange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seller's request to buy a boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBoost {
    pub product_id: ProductId,
    pub seller_id: SellerId,
    pub boost_type: BoostType,
    pub duration_days: u32,
    #[serde(default)]
    pub daily_budget: f64,
}

/// Lifecycle operations over a boost store.
#[derive(Debug)]
pub struct BoostService<R, M, C> {
    repo: R,
    pricer: BoostPricer<M, C>,
}

impl<R, M, C> BoostService<R, M, C>
where
    R: BoostRepository,
    M: MetricsProvider,
    C: Clock,
{
    pub fn new(repo: R, metrics: M, clock: C, config: BoostConfig) -> Self {
        Self {
            repo,
            pricer: BoostPricer::new(metrics, clock, config),
        }
    }

    pub fn config(&self) -> &BoostConfig {
        self.pricer.config()
    }

    pub fn pricer(&self) -> &BoostPricer<M, C> {
        &self.pricer
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn now(&self) -> DateTime<Utc> {
        self.pricer.clock().now()
    }

    /// Price one boost without buying it.
    pub fn quote(
        &self,
        request: &BoostPriceRequest,
        category: Option<&CategoryId>,
    ) -> Result<BoostPriceEstimate, BoostError> {
        self.pricer.quote(request, category)
    }

    /// Price every boost type for the same duration and budget.
    pub fn quote_all(
        &self,
        duration_days: u32,
        daily_budget: f64,
        category: Option<&CategoryId>,
    ) -> Result<Vec<BoostPriceEstimate>, BoostError> {
        self.pricer.quote_all(duration_days, daily_budget, category)
    }

    /// Sponsored listings currently running, highest daily budget first.
    pub fn active_boosted_products(
        &self,
        boost_type: Option<BoostType>,
        limit: Option<usize>,
    ) -> Result<Vec<BoostedListing>, BoostError> {
        let query = ListingQuery {
            boost_type,
            limit: limit.unwrap_or(self.config().listing_limit),
            now: self.now(),
        };
        self.repo
            .active_boosted_products(&query)
            .inspect_err(|e| tracing::error!(error = %e, "failed to list boosted products"))
    }

    /// All of a seller's boosts, newest first.
    pub fn seller_boosts(&self, seller_id: &SellerId) -> Result<Vec<AdBoost>, BoostError> {
        self.repo.seller_boosts(seller_id).inspect_err(
            |e| tracing::error!(%seller_id, error = %e, "failed to list seller boosts"),
        )
    }

    /// Products the seller could boost. Approval status is reported, not
    /// filtered; [`create_boost`](Self::create_boost) rejects rejected ones.
    pub fn boostable_products(
        &self,
        seller_id: &SellerId,
    ) -> Result<Vec<ProductSummary>, BoostError> {
        self.repo.boostable_products(seller_id).inspect_err(
            |e| tracing::error!(%seller_id, error = %e, "failed to list boostable products"),
        )
    }

    /// One boost by id.
    pub fn boost(&self, boost_id: &BoostId) -> Result<AdBoost, BoostError> {
        self.repo
            .find_boost(boost_id)?
            .ok_or_else(|| BoostError::BoostNotFound(boost_id.to_string()))
    }

    /// Price and persist a running boost.
    ///
    /// A featured boost writes its storefront companion in the same
    /// transaction.
    pub fn create_boost(&self, request: &CreateBoost) -> Result<AdBoost, BoostError> {
        self.validate_request(request)?;

        let product = self
            .repo
            .find_product(&request.product_id)?
            .filter(|p| p.seller_id == request.seller_id)
            .ok_or_else(|| BoostError::ProductNotFound(request.product_id.to_string()))?;

        if !product.is_boostable() {
            return Err(BoostError::Validation(format!(
                "product {} cannot be boosted (deleted, disabled or rejected)",
                product.id
            )));
        }

        let now = self.now();
        if !self.config().allow_stacking
            && !self
                .repo
                .live_boosts_for_product(&product.id, request.boost_type, now)?
                .is_empty()
        {
            return Err(BoostError::Validation(format!(
                "product {} already has a live {} boost",
                product.id, request.boost_type
            )));
        }

        let price_request = BoostPriceRequest::new(request.boost_type, request.duration_days)
            .with_daily_budget(request.daily_budget);
        let estimate = self
            .pricer
            .quote(&price_request, product.category_id.as_ref())?;

        let boost = AdBoost::activate(
            request.product_id.clone(),
            request.seller_id.clone(),
            &estimate,
            now,
        )?;
        let featured = FeaturedProduct::for_boost(&boost);

        self.repo
            .insert_boost(&boost, featured.as_ref())
            .inspect_err(|e| {
                tracing::error!(
                    product_id = %boost.product_id,
                    boost_type = %boost.boost_type,
                    error = %e,
                    "failed to persist boost"
                )
            })?;

        tracing::info!(
            boost_id = %boost.id,
            product_id = %boost.product_id,
            seller_id = %boost.seller_id,
            boost_type = %boost.boost_type,
            duration_days = boost.duration_days,
            total_cost = boost.total_cost,
            is_free = boost.is_free,
            "boost created"
        );
        Ok(boost)
    }

    fn validate_request(&self, request: &CreateBoost) -> Result<(), BoostError> {
        let max = self.config().max_duration_days;
        if request.duration_days == 0 || request.duration_days > max {
            return Err(BoostError::Validation(format!(
                "duration_days must be between 1 and {max}, got {}",
                request.duration_days
            )));
        }
        if !request.daily_budget.is_finite() || request.daily_budget < 0.0 {
            return Err(BoostError::Validation(format!(
                "daily_budget must be a non-negative amount, got {}",
                request.daily_budget
            )));
        }
        Ok(())
    }

    /// Stop serving a running boost. Pausing again refreshes `paused_at`.
    pub fn pause_boost(
        &self,
        boost_id: &BoostId,
        seller_id: &SellerId,
    ) -> Result<AdBoost, BoostError> {
        self.transition(boost_id, seller_id, BoostStatus::Paused)
    }

    /// Serve a paused boost again. Resuming an active boost changes nothing.
    pub fn resume_boost(
        &self,
        boost_id: &BoostId,
        seller_id: &SellerId,
    ) -> Result<AdBoost, BoostError> {
        self.transition(boost_id, seller_id, BoostStatus::Active)
    }

    /// End a boost for good, dropping its featured companion.
    pub fn cancel_boost(
        &self,
        boost_id: &BoostId,
        seller_id: &SellerId,
    ) -> Result<AdBoost, BoostError> {
        self.transition(boost_id, seller_id, BoostStatus::Cancelled)
    }

    fn transition(
        &self,
        boost_id: &BoostId,
        seller_id: &SellerId,
        to: BoostStatus,
    ) -> Result<AdBoost, BoostError> {
        let now = self.now();
        let current = self
            .repo
            .find_boost(boost_id)?
            .filter(|b| &b.seller_id == seller_id)
            .ok_or_else(|| BoostError::BoostNotFound(boost_id.to_string()))?;

        let from = current.effective_status(now);
        from.ensure_transition(to)
            .inspect_err(|e| tracing::warn!(%boost_id, error = %e, "rejected boost transition"))?;

        // Paused is the only repeat that rewrites the row.
        if from == to && to != BoostStatus::Paused {
            return Ok(current);
        }

        let change = StatusChange::by_seller(boost_id, seller_id, to, now);
        let updated = self
            .repo
            .change_status(&change)?
            .ok_or_else(|| BoostError::Conflict(boost_id.to_string()))
            .inspect_err(|e| {
                tracing::warn!(%boost_id, error = %e, "boost changed underneath transition")
            })?;

        tracing::info!(%boost_id, from = %from, to = %to, "boost status changed");
        Ok(updated)
    }

    /// End every live boost whose window has lapsed.
    pub fn expire_boosts(&self) -> Result<Vec<BoostId>, BoostError> {
        let now = self.now();
        let expired = self
            .repo
            .expire_boosts(now)
            .inspect_err(|e| tracing::error!(error = %e, "boost expiry sweep failed"))?;

        if !expired.is_empty() {
            tracing::info!(count = expired.len(), "expired boosts");
        }
        Ok(expired.into_iter().map(|b| b.id).collect())
    }

    pub fn track_impression(&self, boost_id: &BoostId) -> Result<(), BoostError> {
        self.track(boost_id, BoostCounter::Impressions)
    }

    pub fn track_click(&self, boost_id: &BoostId) -> Result<(), BoostError> {
        self.track(boost_id, BoostCounter::Clicks)
    }

    pub fn track_order(&self, boost_id: &BoostId) -> Result<(), BoostError> {
        self.track(boost_id, BoostCounter::Orders)
    }

    fn track(&self, boost_id: &BoostId, counter: BoostCounter) -> Result<(), BoostError> {
        match self.repo.increment_counter(boost_id, counter) {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!(%boost_id, counter = counter.column(), "tracked unknown boost");
                Err(BoostError::BoostNotFound(boost_id.to_string()))
            }
            Err(e) => {
                tracing::warn!(
                    %boost_id,
                    counter = counter.column(),
                    error = %e,
                    "failed to track boost"
                );
                Err(e)
            }
        }
    }
}
