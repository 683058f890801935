//! Pricing bound to a metrics source, a clock and the engine config.

use crate::boost::BoostType;
use crate::clock::Clock;
use crate::config::BoostConfig;
use crate::error::BoostError;
use crate::ids::CategoryId;
use crate::metrics::MetricsProvider;
use crate::pricing::{calculate_boost_price, BoostPriceEstimate, BoostPriceRequest};
use chrono::NaiveDate;

/// Quotes boosts with today's metrics and the configured free period.
#[derive(Debug)]
pub struct BoostPricer<M, C> {
    metrics: M,
    clock: C,
    config: BoostConfig,
}

impl<M: MetricsProvider, C: Clock> BoostPricer<M, C> {
    pub fn new(metrics: M, clock: C, config: BoostConfig) -> Self {
        Self {
            metrics,
            clock,
            config,
        }
    }

    /// Calendar day in the marketplace's timezone.
    pub fn today(&self) -> NaiveDate {
        self.clock
            .now()
            .with_timezone(&self.config.utc_offset())
            .date_naive()
    }

    /// Price one boost.
    pub fn quote(
        &self,
        request: &BoostPriceRequest,
        category: Option<&CategoryId>,
    ) -> Result<BoostPriceEstimate, BoostError> {
        let metrics = self.metrics.marketplace_metrics(category)?;
        let estimate = calculate_boost_price(request, &metrics, self.today())
            .with_free_period(self.config.free_period);

        tracing::debug!(
            boost_type = %request.boost_type,
            duration_days = request.duration_days,
            cost_per_day = estimate.cost_per_day,
            total_cost = estimate.total_cost,
            "quoted boost"
        );
        Ok(estimate)
    }

    /// Price every boost type for the same duration and budget.
    pub fn quote_all(
        &self,
        duration_days: u32,
        daily_budget: f64,
        category: Option<&CategoryId>,
    ) -> Result<Vec<BoostPriceEstimate>, BoostError> {
        let metrics = self.metrics.marketplace_metrics(category)?;
        let today = self.today();

        Ok(BoostType::ALL
            .iter()
            .map(|boost_type| {
                let request = BoostPriceRequest::new(*boost_type, duration_days)
                    .with_daily_budget(daily_budget);
                calculate_boost_price(&request, &metrics, today)
                    .with_free_period(self.config.free_period)
            })
            .collect())
    }

    pub fn config(&self) -> &BoostConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }
}
