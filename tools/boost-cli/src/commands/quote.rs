//! Price a boost without buying it.

use anyhow::{bail, Context as _, Result};
use boost_engine::boost::BoostType;
use boost_engine::clock::SystemClock;
use boost_engine::ids::CategoryId;
use boost_engine::metrics::{
    MarketplaceMetrics, MetricsProvider, RepositoryMetrics, SimulatedMetrics,
};
use boost_engine::pricing::{calculate_boost_price, BoostPriceEstimate, BoostPriceRequest};
use chrono::{NaiveDate, Utc};

use super::{parse_boost_type, QuoteArgs};
use crate::context::Context;
use crate::output::{format_factor, format_money};

/// Run the quote command.
pub fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let engine = &ctx.config.engine;

    if !args.budget.is_finite() || args.budget < 0.0 {
        bail!("--budget must be a non-negative amount");
    }

    let types: Vec<BoostType> = if args.all {
        BoostType::ALL.to_vec()
    } else {
        match args.boost_type.as_deref() {
            Some(name) => vec![parse_boost_type(name)?],
            None => bail!("Give a boost type or --all"),
        }
    };

    let date = match args.date.as_deref() {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?,
        None => Utc::now().with_timezone(&engine.utc_offset()).date_naive(),
    };

    let category = args.category.as_deref().map(CategoryId::new);
    let metrics = load_metrics(args.live, category.as_ref(), ctx)?;

    let estimates: Vec<BoostPriceEstimate> = types
        .iter()
        .map(|boost_type| {
            let request =
                BoostPriceRequest::new(*boost_type, args.days).with_daily_budget(args.budget);
            calculate_boost_price(&request, &metrics, date).with_free_period(engine.free_period)
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&estimates);
        return Ok(());
    }

    if engine.free_period {
        ctx.output.info("Free period is on: boosts bought now are not billed.");
    }

    match estimates.as_slice() {
        [single] => print_breakdown(single, date, ctx),
        many => print_table(many, date, ctx),
    }

    Ok(())
}

fn load_metrics(
    live: bool,
    category: Option<&CategoryId>,
    ctx: &Context,
) -> Result<MarketplaceMetrics> {
    if live {
        let store = ctx.open_store()?;
        let provider = RepositoryMetrics::new(
            &store,
            SystemClock,
            ctx.config.engine.activity_window_days,
        );
        Ok(provider.marketplace_metrics(category)?)
    } else {
        Ok(SimulatedMetrics::default().marketplace_metrics(category)?)
    }
}

fn print_breakdown(est: &BoostPriceEstimate, date: NaiveDate, ctx: &Context) {
    let currency = ctx.config.engine.currency;

    ctx.output.header(&format!(
        "{} for {} days from {}",
        est.boost_type.display_name(),
        est.duration_days,
        date
    ));

    ctx.output.kv("Base rate", &format_money(est.base_rate, currency));
    ctx.output.kv("Demand", &format_factor(est.demand_multiplier));
    ctx.output.kv("Competition", &format_factor(est.competition_factor));
    ctx.output.kv("Seasonal", &format_factor(est.seasonal_index));
    if est.discount_percent > 0 {
        ctx.output
            .kv("Duration discount", &format!("{}%", est.discount_percent));
    }
    ctx.output.kv("Cost per day", &format_money(est.cost_per_day, currency));
    ctx.output.kv("Total cost", &format_money(est.total_cost, currency));
    if est.is_free {
        ctx.output.kv("Billed", &format_money(est.billed_total_cost(), currency));
    }

    ctx.output.header("Projection");
    ctx.output
        .kv("Impressions", &est.estimated_impressions.to_string());
    ctx.output.kv("Clicks", &est.estimated_clicks.to_string());
    ctx.output.kv("Orders", &est.estimated_orders.to_string());
    ctx.output.kv("CPM", &format_money(est.estimated_cpm, currency));
    ctx.output.kv("CPC", &format_money(est.estimated_cpc, currency));
    ctx.output.kv("ROAS", &format!("{:.1}x", est.estimated_roas));
}

fn print_table(estimates: &[BoostPriceEstimate], date: NaiveDate, ctx: &Context) {
    let currency = ctx.config.engine.currency;
    let days = estimates.first().map(|e| e.duration_days).unwrap_or_default();

    ctx.output
        .header(&format!("All boost types for {} days from {}", days, date));

    let widths = [20, 12, 12, 12, 8, 8];
    ctx.output.table_row(
        &["TYPE", "PER DAY", "TOTAL", "IMPRESSIONS", "CLICKS", "ROAS"],
        &widths,
    );
    for est in estimates {
        ctx.output.table_row(
            &[
                est.boost_type.display_name(),
                format_money(est.cost_per_day, currency).as_str(),
                format_money(est.total_cost, currency).as_str(),
                est.estimated_impressions.to_string().as_str(),
                est.estimated_clicks.to_string().as_str(),
                format!("{:.1}x", est.estimated_roas).as_str(),
            ],
            &widths,
        );
    }
}
