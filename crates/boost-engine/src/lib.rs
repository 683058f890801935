//! Paid product promotion for a marketplace.
//!
//! This crate prices and runs seller boosts:
//!
//! - **Pricing**: dynamic cost per day from demand, slot competition,
//!   seasonality, duration discounts and budget surcharges
//! - **Metrics**: marketplace snapshots, simulated or aggregated from the store
//! - **Lifecycle**: purchase, pause, resume, cancel, expiry and tracking
//! - **Store**: repository contract with a SQLite implementation
//!
//! # Example
//!
//! ```rust,ignore
//! use boost_engine::prelude::*;
//!
//! let store = SqlBoostStore::in_memory()?;
//! let service = BoostService::new(
//!     &store,
//!     RepositoryMetrics::new(&store, SystemClock, 30),
//!     SystemClock,
//!     BoostConfig::default(),
//! );
//!
//! let boost = service.create_boost(&CreateBoost {
//!     product_id: ProductId::new("prod-runner"),
//!     seller_id: SellerId::new("seller-kicks-ph"),
//!     boost_type: BoostType::Featured,
//!     duration_days: 7,
//!     daily_budget: 150.0,
//! })?;
//! println!("{} until {}", boost.status, boost.ends_at);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod boost;
pub mod clock;
pub mod config;
pub mod metrics;
pub mod pricing;
pub mod service;
pub mod store;

pub use error::BoostError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::BoostError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Boosts
    pub use crate::boost::{
        AdBoost, ApprovalStatus, BoostCounter, BoostPerformance, BoostStatus, BoostType,
        BoostedListing, CategorySummary, FeaturedProduct, ProductSummary, SellerSummary,
    };

    // Pricing
    pub use crate::metrics::{
        MarketplaceMetrics, MetricsProvider, RepositoryMetrics, SimulatedMetrics,
    };
    pub use crate::pricing::{
        calculate_boost_price, BoostPriceEstimate, BoostPriceRequest, BoostPricer,
    };

    // Lifecycle
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::BoostConfig;
    pub use crate::service::{BoostService, CreateBoost};
    pub use crate::store::{BoostRepository, ListingQuery};

    #[cfg(feature = "storage")]
    pub use crate::store::SqlBoostStore;
}
