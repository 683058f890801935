//! CLI command implementations.

pub mod boosts;
pub mod config;
pub mod db;
pub mod quote;
pub mod rates;
pub mod seasonal;

use anyhow::{anyhow, Result};
use boost_engine::boost::BoostType;
use clap::{Args, Subcommand};

/// Parse a boost type name (`featured`, `search-priority`, ...).
pub fn parse_boost_type(name: &str) -> Result<BoostType> {
    BoostType::from_str(name).ok_or_else(|| {
        let known: Vec<&str> = BoostType::ALL.iter().map(|t| t.as_str()).collect();
        anyhow!("Unknown boost type '{}'. Expected one of: {}", name, known.join(", "))
    })
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Boost type (featured, search_priority, homepage_banner, category_spotlight).
    pub boost_type: Option<String>,

    /// Quote every boost type.
    #[arg(short, long, conflicts_with = "boost_type")]
    pub all: bool,

    /// Duration in days.
    #[arg(short, long, default_value = "7")]
    pub days: u32,

    /// Intended daily budget.
    #[arg(short, long, default_value = "0")]
    pub budget: f64,

    /// Price as of this date (YYYY-MM-DD) instead of today.
    #[arg(long)]
    pub date: Option<String>,

    /// Category to scope demand to.
    #[arg(long)]
    pub category: Option<String>,

    /// Use live metrics from the database instead of the simulated snapshot.
    #[arg(long)]
    pub live: bool,
}

/// Arguments for the rates command.
#[derive(Args)]
pub struct RatesArgs {}

/// Arguments for the seasonal command.
#[derive(Args)]
pub struct SeasonalArgs {
    /// Month as YYYY-MM.
    pub month: String,
}

/// Arguments for the db command.
#[derive(Args)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand)]
pub enum DbCommand {
    /// Create the schema.
    Init {
        /// Also load demo sellers, products and views.
        #[arg(long)]
        seed: bool,
    },
}

/// Arguments for the boosts command.
#[derive(Args)]
pub struct BoostsArgs {
    #[command(subcommand)]
    pub command: BoostsCommand,
}

/// Product event to record against a boost.
#[derive(Clone, Copy, clap::ValueEnum)]
pub enum TrackEvent {
    Impression,
    Click,
    Order,
}

#[derive(Subcommand)]
pub enum BoostsCommand {
    /// Buy a boost for a product.
    Create {
        /// Product ID.
        #[arg(short, long)]
        product: String,
        /// Seller ID (must own the product).
        #[arg(short, long)]
        seller: String,
        /// Boost type.
        #[arg(short = 't', long = "type")]
        boost_type: String,
        /// Duration in days.
        #[arg(short, long, default_value = "7")]
        days: u32,
        /// Daily budget.
        #[arg(short, long, default_value = "0")]
        budget: f64,
    },
    /// Pause a running boost.
    Pause {
        /// Boost ID.
        id: String,
        /// Seller ID.
        #[arg(short, long)]
        seller: String,
    },
    /// Resume a paused boost.
    Resume {
        /// Boost ID.
        id: String,
        /// Seller ID.
        #[arg(short, long)]
        seller: String,
    },
    /// Cancel a boost for good.
    Cancel {
        /// Boost ID.
        id: String,
        /// Seller ID.
        #[arg(short, long)]
        seller: String,
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show one boost with its performance.
    Show {
        /// Boost ID.
        id: String,
    },
    /// List a seller's boosts.
    List {
        /// Seller ID.
        #[arg(short, long)]
        seller: String,
    },
    /// List sponsored products currently running.
    Sponsored {
        /// Only this boost type.
        #[arg(short = 't', long = "type")]
        boost_type: Option<String>,
        /// Maximum listings (default from config).
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List a seller's products that can be boosted.
    Products {
        /// Seller ID.
        #[arg(short, long)]
        seller: String,
    },
    /// End every boost whose window has lapsed.
    Expire,
    /// Record an impression, click or order.
    Track {
        /// Boost ID.
        id: String,
        /// Event to record.
        #[arg(short, long, value_enum)]
        event: TrackEvent,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_boost_type() {
        assert_eq!(parse_boost_type("search-priority").unwrap(), BoostType::SearchPriority);
        let err = parse_boost_type("billboard").unwrap_err().to_string();
        assert!(err.contains("homepage_banner"));
    }
}
