//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }
    ctx.output
        .kv("database", &ctx.database_path().display().to_string());

    ctx.output.info("");
    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.log.level);
    ctx.output.kv("format", &format!("{:?}", ctx.config.log.format).to_lowercase());

    let engine = &ctx.config.engine;
    ctx.output.info("");
    ctx.output.info("[engine]");
    ctx.output.kv("free_period", &engine.free_period.to_string());
    ctx.output.kv("currency", engine.currency.code());
    ctx.output
        .kv("utc_offset_hours", &engine.utc_offset_hours.to_string());
    ctx.output
        .kv("max_duration_days", &engine.max_duration_days.to_string());
    ctx.output.kv("allow_stacking", &engine.allow_stacking.to_string());
    ctx.output.kv("listing_limit", &engine.listing_limit.to_string());
    ctx.output.kv(
        "activity_window_days",
        &engine.activity_window_days.to_string(),
    );

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("boost.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    // Engine values are already checked on load; these are softer checks.
    let engine = &ctx.config.engine;
    if engine.listing_limit > 100 {
        warnings.push(format!(
            "engine.listing_limit {} is unusually large for a storefront strip",
            engine.listing_limit
        ));
    }
    if engine.activity_window_days == 0 {
        errors.push("engine.activity_window_days must be at least 1".to_string());
    }
    if engine.free_period {
        warnings.push("engine.free_period is on: new boosts are not billed".to_string());
    }

    if ctx.config.database.trim().is_empty() {
        errors.push("database is required".to_string());
    }

    if tracing_subscriber::EnvFilter::try_new(&ctx.config.log.level).is_err() {
        errors.push(format!("log.level '{}' is not a valid filter", ctx.config.log.level));
    }

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
