//! Boost CLI - price and manage marketplace ad boosts.
//!
//! Commands:
//! - `boost quote` - Price a boost (or every type)
//! - `boost rates` - Show the rate card
//! - `boost seasonal` - Show the seasonal index for a month
//! - `boost db` - Create and seed the database
//! - `boost boosts` - Buy, pause, resume, cancel and inspect boosts
//! - `boost config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{BoostsArgs, ConfigArgs, DbArgs, QuoteArgs, RatesArgs, SeasonalArgs};

/// Boost CLI - Price and manage marketplace ad boosts
#[derive(Parser)]
#[command(name = "boost")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Database file (overrides the config)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a boost without buying it
    Quote(QuoteArgs),

    /// Show base rates and reach per boost type
    Rates(RatesArgs),

    /// Show the seasonal index for every day of a month
    Seasonal(SeasonalArgs),

    /// Manage the database
    Db(DbArgs),

    /// Buy and manage boosts
    Boosts(BoostsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    if let Err(e) = run(cli, output.clone()) {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: output::Output) -> Result<()> {
    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), cli.db, output)?;

    if let Err(e) = logging::init(&ctx.config.log, cli.verbose) {
        ctx.output.warn(&format!("Logging disabled: {}", e));
    }
    if let Some(path) = &ctx.config_path {
        ctx.output.debug(&format!("Using config {}", path.display()));
    }

    // Execute command
    match cli.command {
        Commands::Quote(args) => commands::quote::run(args, &ctx),
        Commands::Rates(args) => commands::rates::run(args, &ctx),
        Commands::Seasonal(args) => commands::seasonal::run(args, &ctx),
        Commands::Db(args) => commands::db::run(args, &ctx),
        Commands::Boosts(args) => commands::boosts::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    }
}
