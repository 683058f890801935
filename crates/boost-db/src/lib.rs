//! Type-safe SQLite database layer for the boost engine.
//!
//! Provides a small, ergonomic API over SQLite with type-safe query results.
//! Inside a Spin component the host's SQLite is used; natively a bundled
//! SQLite backs the same API, which is what the CLI and the tests run on.
//!
//! # Example
//!
//! ```rust,ignore
//! use boost_db::{Db, params};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct BoostCount {
//!     boost_type: String,
//!     active: i64,
//! }
//!
//! let db = Db::open("boosts.db")?;
//!
//! db.execute(
//!     "UPDATE product_ad_boosts SET impressions = impressions + 1 WHERE id = ?",
//!     params!["boost-1"]
//! )?;
//!
//! let counts: Vec<BoostCount> = db.query_as(
//!     "SELECT boost_type, COUNT(*) AS active FROM product_ad_boosts WHERE status = ? GROUP BY boost_type",
//!     params!["active"]
//! )?;
//! ```

mod db;
mod error;
mod types;

pub use db::Db;
pub use error::DbError;
pub use types::{bool_from_int, format_timestamp, QueryResult, Row, Value};

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use boost_db::params;
///
/// let params = params!["boost-1", 42, 3.14];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
