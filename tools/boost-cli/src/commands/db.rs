//! Database setup.

use anyhow::Result;
use boost_engine::store::seed::seed_demo;
use chrono::Utc;

use super::{DbArgs, DbCommand};
use crate::context::Context;

/// Run the db command.
pub fn run(args: DbArgs, ctx: &Context) -> Result<()> {
    match args.command {
        DbCommand::Init { seed } => init_db(seed, ctx),
    }
}

fn init_db(seed: bool, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let path = ctx.database_path();

    if !seed {
        if ctx.output.is_json() {
            ctx.output
                .json(&serde_json::json!({ "database": path, "seeded": false }));
        } else {
            ctx.output
                .success(&format!("Schema ready: {}", path.display()));
        }
        return Ok(());
    }

    let summary = seed_demo(&store, Utc::now())?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "database": path,
            "seeded": true,
            "summary": summary,
        }));
        return Ok(());
    }

    ctx.output
        .success(&format!("Schema ready and seeded: {}", path.display()));
    ctx.output.kv("sellers", &summary.sellers.to_string());
    ctx.output.kv("categories", &summary.categories.to_string());
    ctx.output.kv("products", &summary.products.to_string());
    ctx.output.kv("views", &summary.views.to_string());

    Ok(())
}
