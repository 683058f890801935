//! Show the rate card.

use anyhow::Result;
use boost_engine::boost::BoostType;
use serde::Serialize;

use super::RatesArgs;
use crate::context::Context;
use crate::output::format_money;

#[derive(Serialize)]
struct RateCard {
    boost_type: BoostType,
    name: &'static str,
    base_rate: f64,
    max_slots: u64,
    avg_daily_impressions: u64,
    avg_ctr: f64,
}

/// Run the rates command.
pub fn run(_args: RatesArgs, ctx: &Context) -> Result<()> {
    let cards: Vec<RateCard> = BoostType::ALL
        .iter()
        .map(|t| RateCard {
            boost_type: *t,
            name: t.display_name(),
            base_rate: t.base_rate(),
            max_slots: t.max_slots(),
            avg_daily_impressions: t.avg_daily_impressions(),
            avg_ctr: t.avg_ctr(),
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&cards);
        return Ok(());
    }

    let currency = ctx.config.engine.currency;
    ctx.output.header("Boost rate card");
    let widths = [20, 10, 6, 12, 6];
    ctx.output
        .table_row(&["TYPE", "BASE/DAY", "SLOTS", "IMPR/DAY", "CTR"], &widths);
    for card in &cards {
        ctx.output.table_row(
            &[
                card.name,
                format_money(card.base_rate, currency).as_str(),
                card.max_slots.to_string().as_str(),
                card.avg_daily_impressions.to_string().as_str(),
                format!("{:.1}%", card.avg_ctr * 100.0).as_str(),
            ],
            &widths,
        );
    }

    Ok(())
}
