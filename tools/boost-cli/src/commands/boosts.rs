//! Buy and manage boosts.

use anyhow::Result;
use boost_engine::boost::{AdBoost, BoostPerformance, BoostStatus, BoostedListing, ProductSummary};
use boost_engine::clock::{Clock, SystemClock};
use boost_engine::ids::{BoostId, ProductId, SellerId};
use boost_engine::service::CreateBoost;
use dialoguer::Confirm;
use serde::Serialize;

use super::{parse_boost_type, BoostsArgs, BoostsCommand, TrackEvent};
use crate::context::{Context, LiveService};
use crate::output::{format_money, status_badge};

/// Run the boosts command.
pub fn run(args: BoostsArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let service = ctx.service(&store);

    match args.command {
        BoostsCommand::Create {
            product,
            seller,
            boost_type,
            days,
            budget,
        } => {
            let request = CreateBoost {
                product_id: ProductId::new(product),
                seller_id: SellerId::new(seller),
                boost_type: parse_boost_type(&boost_type)?,
                duration_days: days,
                daily_budget: budget,
            };
            let boost = service.create_boost(&request)?;
            report_boost("Boost created", &boost, ctx);
            Ok(())
        }
        BoostsCommand::Pause { id, seller } => {
            let boost = service.pause_boost(&BoostId::new(id), &SellerId::new(seller))?;
            report_boost("Boost paused", &boost, ctx);
            Ok(())
        }
        BoostsCommand::Resume { id, seller } => {
            let boost = service.resume_boost(&BoostId::new(id), &SellerId::new(seller))?;
            report_boost("Boost resumed", &boost, ctx);
            Ok(())
        }
        BoostsCommand::Cancel { id, seller, yes } => cancel(&service, id, seller, yes, ctx),
        BoostsCommand::Show { id } => show(&service, id, ctx),
        BoostsCommand::List { seller } => list(&service, seller, ctx),
        BoostsCommand::Sponsored { boost_type, limit } => {
            let boost_type = boost_type.as_deref().map(parse_boost_type).transpose()?;
            let listings = service.active_boosted_products(boost_type, limit)?;
            print_listings(&listings, ctx);
            Ok(())
        }
        BoostsCommand::Products { seller } => {
            let products = service.boostable_products(&SellerId::new(seller))?;
            print_products(&products, ctx);
            Ok(())
        }
        BoostsCommand::Expire => {
            let expired = service.expire_boosts()?;
            if ctx.output.is_json() {
                ctx.output.json(&expired);
            } else if expired.is_empty() {
                ctx.output.info("No lapsed boosts.");
            } else {
                ctx.output
                    .success(&format!("Ended {} lapsed boost(s)", expired.len()));
                for id in &expired {
                    ctx.output.list_item(id.as_str());
                }
            }
            Ok(())
        }
        BoostsCommand::Track { id, event } => {
            let boost_id = BoostId::new(id);
            match event {
                TrackEvent::Impression => service.track_impression(&boost_id)?,
                TrackEvent::Click => service.track_click(&boost_id)?,
                TrackEvent::Order => service.track_order(&boost_id)?,
            }
            let boost = service.boost(&boost_id)?;
            report_boost("Event recorded", &boost, ctx);
            Ok(())
        }
    }
}

fn cancel(
    service: &LiveService<'_>,
    id: String,
    seller: String,
    yes: bool,
    ctx: &Context,
) -> Result<()> {
    let boost_id = BoostId::new(id);
    let seller_id = SellerId::new(seller);

    if !yes && !ctx.output.is_json() {
        let boost = service.boost(&boost_id)?;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Cancel {} boost on {}? This cannot be undone",
                boost.boost_type.display_name(),
                boost.product_id
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.info("Cancelled by user");
            return Ok(());
        }
    }

    let boost = service.cancel_boost(&boost_id, &seller_id)?;
    report_boost("Boost cancelled", &boost, ctx);
    Ok(())
}

#[derive(Serialize)]
struct BoostDetail<'a> {
    #[serde(flatten)]
    boost: &'a AdBoost,
    effective_status: BoostStatus,
    performance: BoostPerformance,
}

fn show(service: &LiveService<'_>, id: String, ctx: &Context) -> Result<()> {
    let boost = service.boost(&BoostId::new(id))?;
    let now = SystemClock.now();
    let detail = BoostDetail {
        boost: &boost,
        effective_status: boost.effective_status(now),
        performance: boost.performance(now),
    };

    if ctx.output.is_json() {
        ctx.output.json(&detail);
        return Ok(());
    }

    let currency = service.config().currency;
    ctx.output.header(&format!("Boost {}", boost.id));
    ctx.output.kv("Type", boost.boost_type.display_name());
    ctx.output.kv("Product", boost.product_id.as_str());
    ctx.output.kv("Seller", boost.seller_id.as_str());
    ctx.output.kv("Status", &status_badge(detail.effective_status));
    ctx.output.kv(
        "Window",
        &format!("{} to {}", boost.starts_at.to_rfc3339(), boost.ends_at.to_rfc3339()),
    );
    if let Some(paused_at) = boost.paused_at {
        ctx.output.kv("Paused at", &paused_at.to_rfc3339());
    }
    ctx.output.kv("Daily budget", &format_money(boost.daily_budget, currency));
    ctx.output.kv("Total cost", &format_money(boost.total_cost, currency));
    if boost.is_free {
        ctx.output.kv("Billing", "free period");
    }

    let perf = &detail.performance;
    ctx.output.header("Performance");
    ctx.output.kv("Impressions", &perf.impressions.to_string());
    ctx.output.kv("Clicks", &perf.clicks.to_string());
    ctx.output.kv("Orders", &perf.orders.to_string());
    ctx.output.kv("CTR", &format!("{:.2}%", perf.ctr * 100.0));
    ctx.output
        .kv("Conversion", &format!("{:.2}%", perf.conversion_rate * 100.0));
    ctx.output.kv("Days elapsed", &perf.days_elapsed.to_string());
    ctx.output
        .kv("Spend to date", &format_money(perf.spend_to_date, currency));
    ctx.output.kv("ROAS", &format!("{:.1}x", perf.roas));

    Ok(())
}

fn list(service: &LiveService<'_>, seller: String, ctx: &Context) -> Result<()> {
    let seller_id = SellerId::new(seller);
    let boosts = service.seller_boosts(&seller_id)?;

    if ctx.output.is_json() {
        ctx.output.json(&boosts);
        return Ok(());
    }

    if boosts.is_empty() {
        ctx.output.info(&format!("No boosts for {}", seller_id));
        return Ok(());
    }

    let now = SystemClock.now();
    ctx.output.header(&format!("Boosts for {}", seller_id));
    let widths = [36, 20, 20, 10, 12];
    ctx.output
        .table_row(&["ID", "PRODUCT", "TYPE", "STATUS", "ENDS"], &widths);
    for boost in &boosts {
        ctx.output.table_row(
            &[
                boost.id.as_str(),
                boost.product_id.as_str(),
                boost.boost_type.display_name(),
                boost.effective_status(now).as_str(),
                boost.ends_at.format("%Y-%m-%d").to_string().as_str(),
            ],
            &widths,
        );
    }

    Ok(())
}

fn print_listings(listings: &[BoostedListing], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&listings);
        return;
    }

    if listings.is_empty() {
        ctx.output.info("No sponsored products running.");
        return;
    }

    let currency = ctx.config.engine.currency;
    ctx.output.header("Sponsored products");
    let widths = [24, 22, 20, 12];
    ctx.output
        .table_row(&["PRODUCT", "STORE", "TYPE", "BUDGET/DAY"], &widths);
    for listing in listings {
        ctx.output.table_row(
            &[
                listing.product.name.as_str(),
                listing.seller.store_name.as_str(),
                listing.boost_type.display_name(),
                format_money(listing.daily_budget, currency).as_str(),
            ],
            &widths,
        );
    }
}

fn print_products(products: &[ProductSummary], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&products);
        return;
    }

    if products.is_empty() {
        ctx.output.info("No boostable products.");
        return;
    }

    let currency = ctx.config.engine.currency;
    ctx.output.header("Boostable products");
    let widths = [20, 24, 12, 10];
    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "APPROVAL"], &widths);
    for product in products {
        ctx.output.table_row(
            &[
                product.id.as_str(),
                product.name.as_str(),
                format_money(product.price, currency).as_str(),
                product.approval_status.as_str(),
            ],
            &widths,
        );
    }
}

fn report_boost(title: &str, boost: &AdBoost, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(boost);
        return;
    }

    ctx.output.success(title);
    ctx.output.kv("ID", boost.id.as_str());
    ctx.output.kv("Type", boost.boost_type.display_name());
    ctx.output.kv("Status", &status_badge(boost.status));
    ctx.output.kv("Ends", &boost.ends_at.to_rfc3339());
    if boost.impressions + boost.clicks + boost.orders_generated > 0 {
        ctx.output.kv(
            "Impressions / clicks / orders",
            &format!("{} / {} / {}", boost.impressions, boost.clicks, boost.orders_generated),
        );
    }
}
