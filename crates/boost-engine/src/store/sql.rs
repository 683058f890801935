//! SQLite-backed boost store.

use crate::boost::{
    AdBoost, ApprovalStatus, BoostCounter, BoostStatus, BoostType, BoostedListing,
    CategorySummary, FeaturedProduct, ProductSummary, SellerSummary,
};
use crate::error::BoostError;
use crate::ids::{BoostId, CategoryId, ProductId, SellerId, UserId};
use crate::store::schema::{BOOST_COLUMNS, PRODUCT_COLUMNS, SCHEMA};
use crate::store::{BoostRepository, ListingQuery, PausedAt, StatusChange};
use boost_db::{bool_from_int, params, Db, Value};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct BoostRow {
    id: BoostId,
    product_id: ProductId,
    seller_id: SellerId,
    boost_type: BoostType,
    duration_days: u32,
    daily_budget: f64,
    total_budget: f64,
    cost_per_day: f64,
    total_cost: f64,
    #[serde(deserialize_with = "bool_from_int")]
    is_free: bool,
    status: BoostStatus,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    impressions: u64,
    clicks: u64,
    orders_generated: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BoostRow> for AdBoost {
    fn from(row: BoostRow) -> Self {
        AdBoost {
            id: row.id,
            product_id: row.product_id,
            seller_id: row.seller_id,
            boost_type: row.boost_type,
            duration_days: row.duration_days,
            daily_budget: row.daily_budget,
            total_budget: row.total_budget,
            cost_per_day: row.cost_per_day,
            total_cost: row.total_cost,
            is_free: row.is_free,
            status: row.status,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            paused_at: row.paused_at,
            impressions: row.impressions,
            clicks: row.clicks,
            orders_generated: row.orders_generated,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    id: ProductId,
    seller_id: SellerId,
    category_id: Option<CategoryId>,
    name: String,
    price: f64,
    image_url: Option<String>,
    approval_status: ApprovalStatus,
    #[serde(deserialize_with = "bool_from_int")]
    is_deleted: bool,
    #[serde(deserialize_with = "bool_from_int")]
    is_disabled: bool,
}

impl From<ProductRow> for ProductSummary {
    fn from(row: ProductRow) -> Self {
        ProductSummary {
            id: row.id,
            seller_id: row.seller_id,
            name: row.name,
            price: row.price,
            image_url: row.image_url,
            category_id: row.category_id,
            approval_status: row.approval_status,
            is_deleted: row.is_deleted,
            is_disabled: row.is_disabled,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    boost_id: BoostId,
    boost_type: BoostType,
    daily_budget: f64,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    product_id: ProductId,
    product_seller_id: SellerId,
    product_name: String,
    price: f64,
    image_url: Option<String>,
    category_id: Option<CategoryId>,
    approval_status: ApprovalStatus,
    #[serde(deserialize_with = "bool_from_int")]
    is_deleted: bool,
    #[serde(deserialize_with = "bool_from_int")]
    is_disabled: bool,
    seller_id: SellerId,
    store_name: String,
    category_name: Option<String>,
}

impl From<ListingRow> for BoostedListing {
    fn from(row: ListingRow) -> Self {
        let category = match (row.category_id.clone(), row.category_name) {
            (Some(id), Some(name)) => Some(CategorySummary { id, name }),
            _ => None,
        };
        BoostedListing {
            boost_id: row.boost_id,
            boost_type: row.boost_type,
            daily_budget: row.daily_budget,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            created_at: row.created_at,
            product: ProductSummary {
                id: row.product_id,
                seller_id: row.product_seller_id,
                name: row.product_name,
                price: row.price,
                image_url: row.image_url,
                category_id: row.category_id,
                approval_status: row.approval_status,
                is_deleted: row.is_deleted,
                is_disabled: row.is_disabled,
            },
            seller: SellerSummary {
                id: row.seller_id,
                store_name: row.store_name,
            },
            category,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeaturedRow {
    product_id: ProductId,
    #[serde(deserialize_with = "bool_from_int")]
    is_active: bool,
    priority: u8,
    featured_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<FeaturedRow> for FeaturedProduct {
    fn from(row: FeaturedRow) -> Self {
        FeaturedProduct {
            product_id: row.product_id,
            is_active: row.is_active,
            priority: row.priority,
            featured_at: row.featured_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    n: u64,
}

#[derive(Debug, Deserialize)]
struct TypeCountRow {
    boost_type: BoostType,
    active: u64,
}

/// `?, ?, ?` for an `IN` list of `n` values.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Boost store over a [`Db`] handle.
#[derive(Debug)]
pub struct SqlBoostStore {
    db: Db,
}

impl SqlBoostStore {
    /// Wrap an open database. Call [`migrate`](Self::migrate) before use on a
    /// fresh file.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Fresh in-memory store with the schema applied.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_memory() -> Result<Self, BoostError> {
        let store = Self::new(Db::open_in_memory()?);
        store.migrate()?;
        Ok(store)
    }

    /// Create tables and indexes that do not exist yet.
    pub fn migrate(&self) -> Result<(), BoostError> {
        self.db.execute_batch(SCHEMA)?;
        tracing::debug!("boost schema applied");
        Ok(())
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn into_db(self) -> Db {
        self.db
    }

    pub fn upsert_seller(&self, seller: &SellerSummary) -> Result<(), BoostError> {
        self.db.execute(
            "INSERT INTO sellers (id, store_name) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET store_name = excluded.store_name",
            params![seller.id.as_str(), seller.store_name.as_str()],
        )?;
        Ok(())
    }

    pub fn upsert_category(&self, category: &CategorySummary) -> Result<(), BoostError> {
        self.db.execute(
            "INSERT INTO categories (id, name) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![category.id.as_str(), category.name.as_str()],
        )?;
        Ok(())
    }

    pub fn upsert_product(&self, product: &ProductSummary) -> Result<(), BoostError> {
        self.db.execute(
            "INSERT INTO products (id, seller_id, category_id, name, price, image_url,
                                   approval_status, is_deleted, is_disabled)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 seller_id = excluded.seller_id,
                 category_id = excluded.category_id,
                 name = excluded.name,
                 price = excluded.price,
                 image_url = excluded.image_url,
                 approval_status = excluded.approval_status,
                 is_deleted = excluded.is_deleted,
                 is_disabled = excluded.is_disabled",
            params![
                product.id.as_str(),
                product.seller_id.as_str(),
                product.category_id.as_ref().map(|c| c.as_str()),
                product.name.as_str(),
                product.price,
                product.image_url.as_deref(),
                product.approval_status.as_str(),
                product.is_deleted,
                product.is_disabled,
            ],
        )?;
        Ok(())
    }

    /// Record one product view, the activity signal behind live metrics.
    pub fn record_view(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        viewed_at: DateTime<Utc>,
    ) -> Result<(), BoostError> {
        self.db.execute(
            "INSERT INTO product_views (user_id, product_id, viewed_at) VALUES (?, ?, ?)",
            params![user_id.as_str(), product_id.as_str(), viewed_at],
        )?;
        Ok(())
    }

    fn boosts_where(&self, clause: &str, params: &[Value]) -> Result<Vec<AdBoost>, BoostError> {
        let sql = format!("SELECT {BOOST_COLUMNS} FROM product_ad_boosts WHERE {clause}");
        let rows: Vec<BoostRow> = self.db.query_as(&sql, params)?;
        Ok(rows.into_iter().map(AdBoost::from).collect())
    }
}

fn upsert_featured(db: &Db, featured: &FeaturedProduct) -> Result<(), BoostError> {
    db.execute(
        "INSERT INTO featured_products (product_id, is_active, priority, featured_at, expires_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(product_id) DO UPDATE SET
             is_active = excluded.is_active,
             priority = excluded.priority,
             featured_at = excluded.featured_at,
             expires_at = excluded.expires_at",
        params![
            featured.product_id.as_str(),
            featured.is_active,
            u32::from(featured.priority),
            featured.featured_at,
            featured.expires_at,
        ],
    )?;
    Ok(())
}

/// Take the featured row away from a boost that stopped running.
///
/// The row is keyed by product, so it is only touched while its window still
/// matches `boost`. When it was released and another featured boost on the
/// product is still live, the row is handed over to the one that runs longest.
fn release_featured(
    db: &Db,
    boost: &AdBoost,
    now: DateTime<Utc>,
    remove: bool,
) -> Result<(), BoostError> {
    let sql = if remove {
        "DELETE FROM featured_products WHERE product_id = ? AND expires_at = ? RETURNING product_id"
    } else {
        "UPDATE featured_products SET is_active = 0
         WHERE product_id = ? AND expires_at = ? RETURNING product_id"
    };
    let released = db.query(sql, params![boost.product_id.as_str(), boost.ends_at])?;
    if released.is_empty() {
        return Ok(());
    }

    let successor: Option<BoostRow> = db.query_optional(
        &format!(
            "SELECT {BOOST_COLUMNS} FROM product_ad_boosts
             WHERE product_id = ? AND boost_type = ? AND id <> ?
               AND status IN ('active', 'paused') AND ends_at >= ?
             ORDER BY ends_at DESC, created_at DESC LIMIT 1"
        ),
        params![
            boost.product_id.as_str(),
            boost.boost_type.as_str(),
            boost.id.as_str(),
            now,
        ],
    )?;
    let successor = successor.map(AdBoost::from);
    if let Some(featured) = successor.as_ref().and_then(FeaturedProduct::for_boost) {
        tracing::debug!(
            product_id = %boost.product_id,
            from = %boost.id,
            "featured row handed to another live boost"
        );
        upsert_featured(db, &featured)?;
    }
    Ok(())
}

impl BoostRepository for SqlBoostStore {
    fn insert_boost(
        &self,
        boost: &AdBoost,
        featured: Option<&FeaturedProduct>,
    ) -> Result<(), BoostError> {
        self.db.transaction(|tx| {
            tx.execute(
                &format!(
                    "INSERT INTO product_ad_boosts ({BOOST_COLUMNS})
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                ),
                params![
                    boost.id.as_str(),
                    boost.product_id.as_str(),
                    boost.seller_id.as_str(),
                    boost.boost_type.as_str(),
                    boost.duration_days,
                    boost.daily_budget,
                    boost.total_budget,
                    boost.cost_per_day,
                    boost.total_cost,
                    boost.is_free,
                    boost.status.as_str(),
                    boost.starts_at,
                    boost.ends_at,
                    boost.paused_at,
                    boost.impressions,
                    boost.clicks,
                    boost.orders_generated,
                    boost.created_at,
                    boost.updated_at,
                ],
            )?;
            if let Some(featured) = featured {
                upsert_featured(tx, featured)?;
            }
            Ok::<_, BoostError>(())
        })
    }

    fn find_boost(&self, boost_id: &BoostId) -> Result<Option<AdBoost>, BoostError> {
        let row: Option<BoostRow> = self.db.query_optional(
            &format!("SELECT {BOOST_COLUMNS} FROM product_ad_boosts WHERE id = ?"),
            params![boost_id.as_str()],
        )?;
        Ok(row.map(AdBoost::from))
    }

    fn change_status(&self, change: &StatusChange) -> Result<Option<AdBoost>, BoostError> {
        if change.from.is_empty() {
            return Ok(None);
        }

        let mut sets = vec!["status = ?", "updated_at = ?"];
        let mut values = vec![Value::from(change.to.as_str()), Value::from(change.at)];
        match change.paused_at {
            PausedAt::Keep => {}
            PausedAt::Set(at) => {
                sets.push("paused_at = ?");
                values.push(Value::from(at));
            }
            PausedAt::Clear => sets.push("paused_at = NULL"),
        }

        let mut sql = format!(
            "UPDATE product_ad_boosts SET {} WHERE id = ?",
            sets.join(", ")
        );
        values.push(Value::from(change.boost_id.as_str()));
        if let Some(seller_id) = &change.seller_id {
            sql.push_str(" AND seller_id = ?");
            values.push(Value::from(seller_id.as_str()));
        }
        sql.push_str(&format!(
            " AND status IN ({}) RETURNING {BOOST_COLUMNS}",
            placeholders(change.from.len())
        ));
        values.extend(change.from.iter().map(|s| Value::from(s.as_str())));

        self.db.transaction(|tx| {
            let row: Option<BoostRow> = tx.query_optional(&sql, &values)?;
            let Some(boost) = row.map(AdBoost::from) else {
                return Ok(None);
            };

            if boost.boost_type.has_featured_companion() {
                match change.to {
                    BoostStatus::Cancelled => release_featured(tx, &boost, change.at, true)?,
                    BoostStatus::Ended => release_featured(tx, &boost, change.at, false)?,
                    _ => {}
                }
            }
            Ok::<_, BoostError>(Some(boost))
        })
    }

    fn expire_boosts(&self, now: DateTime<Utc>) -> Result<Vec<AdBoost>, BoostError> {
        self.db.transaction(|tx| {
            let rows: Vec<BoostRow> = tx.query_as(
                &format!(
                    "UPDATE product_ad_boosts SET status = 'ended', updated_at = ?
                     WHERE status IN ('active', 'paused') AND ends_at < ?
                     RETURNING {BOOST_COLUMNS}"
                ),
                params![now, now],
            )?;
            let expired: Vec<AdBoost> = rows.into_iter().map(AdBoost::from).collect();

            for boost in expired.iter().filter(|b| b.boost_type.has_featured_companion()) {
                release_featured(tx, boost, now, false)?;
            }
            Ok::<_, BoostError>(expired)
        })
    }

    fn increment_counter(
        &self,
        boost_id: &BoostId,
        counter: BoostCounter,
    ) -> Result<bool, BoostError> {
        let column = counter.column();
        let result = self.db.query(
            &format!(
                "UPDATE product_ad_boosts SET {column} = {column} + 1 WHERE id = ? RETURNING id"
            ),
            params![boost_id.as_str()],
        )?;
        Ok(!result.is_empty())
    }

    fn seller_boosts(&self, seller_id: &SellerId) -> Result<Vec<AdBoost>, BoostError> {
        self.boosts_where(
            "seller_id = ? ORDER BY created_at DESC, id DESC",
            params![seller_id.as_str()],
        )
    }

    fn live_boosts_for_product(
        &self,
        product_id: &ProductId,
        boost_type: BoostType,
        now: DateTime<Utc>,
    ) -> Result<Vec<AdBoost>, BoostError> {
        self.boosts_where(
            "product_id = ? AND boost_type = ? AND status IN ('active', 'paused') AND ends_at >= ?",
            params![product_id.as_str(), boost_type.as_str(), now],
        )
    }

    fn find_product(&self, product_id: &ProductId) -> Result<Option<ProductSummary>, BoostError> {
        let row: Option<ProductRow> = self.db.query_optional(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"),
            params![product_id.as_str()],
        )?;
        Ok(row.map(ProductSummary::from))
    }

    fn boostable_products(&self, seller_id: &SellerId) -> Result<Vec<ProductSummary>, BoostError> {
        let rows: Vec<ProductRow> = self.db.query_as(
            &format!(
                "SELECT {PRODUCT_COLUMNS} FROM products
                 WHERE seller_id = ? AND is_deleted = 0 AND is_disabled = 0
                 ORDER BY name, id"
            ),
            params![seller_id.as_str()],
        )?;
        Ok(rows.into_iter().map(ProductSummary::from).collect())
    }

    fn active_boosted_products(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<BoostedListing>, BoostError> {
        let mut sql = String::from(
            "SELECT b.id AS boost_id, b.boost_type, b.daily_budget, b.starts_at, b.ends_at,
                    b.created_at,
                    p.id AS product_id, p.seller_id AS product_seller_id, p.name AS product_name,
                    p.price, p.image_url, p.category_id, p.approval_status, p.is_deleted,
                    p.is_disabled,
                    s.id AS seller_id, s.store_name,
                    c.name AS category_name
             FROM product_ad_boosts b
             JOIN products p ON p.id = b.product_id
             JOIN sellers s ON s.id = b.seller_id
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE b.status = 'active' AND b.ends_at >= ?
               AND p.is_deleted = 0 AND p.approval_status = 'approved'",
        );
        let mut values = vec![Value::from(query.now)];
        if let Some(boost_type) = query.boost_type {
            sql.push_str(" AND b.boost_type = ?");
            values.push(Value::from(boost_type.as_str()));
        }
        sql.push_str(" ORDER BY b.daily_budget DESC, b.created_at DESC LIMIT ?");
        values.push(Value::from(query.limit));

        let rows: Vec<ListingRow> = self.db.query_as(&sql, &values)?;
        Ok(rows.into_iter().map(BoostedListing::from).collect())
    }

    fn featured_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<FeaturedProduct>, BoostError> {
        let row: Option<FeaturedRow> = self.db.query_optional(
            "SELECT product_id, is_active, priority, featured_at, expires_at
             FROM featured_products WHERE product_id = ?",
            params![product_id.as_str()],
        )?;
        Ok(row.map(FeaturedProduct::from))
    }

    fn active_boost_counts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<BoostType, u64>, BoostError> {
        let rows: Vec<TypeCountRow> = self.db.query_as(
            "SELECT boost_type, COUNT(*) AS active FROM product_ad_boosts
             WHERE status = 'active' AND ends_at >= ?
             GROUP BY boost_type",
            params![now],
        )?;
        Ok(rows.into_iter().map(|r| (r.boost_type, r.active)).collect())
    }

    fn product_count(&self, category: Option<&CategoryId>) -> Result<u64, BoostError> {
        let row: CountRow = match category {
            Some(category) => self.db.query_one(
                "SELECT COUNT(*) AS n FROM products WHERE is_deleted = 0 AND category_id = ?",
                params![category.as_str()],
            )?,
            None => self.db.query_one(
                "SELECT COUNT(*) AS n FROM products WHERE is_deleted = 0",
                params![],
            )?,
        };
        Ok(row.n)
    }

    fn active_user_count(
        &self,
        category: Option<&CategoryId>,
        since: DateTime<Utc>,
    ) -> Result<u64, BoostError> {
        let row: CountRow = match category {
            Some(category) => self.db.query_one(
                "SELECT COUNT(DISTINCT v.user_id) AS n FROM product_views v
                 JOIN products p ON p.id = v.product_id
                 WHERE v.viewed_at >= ? AND p.category_id = ?",
                params![since, category.as_str()],
            )?,
            None => self.db.query_one(
                "SELECT COUNT(DISTINCT user_id) AS n FROM product_views WHERE viewed_at >= ?",
                params![since],
            )?,
        };
        Ok(row.n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{calculate_boost_price, BoostPriceRequest};
    use crate::metrics::MarketplaceMetrics;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap()
    }

    fn product(id: &str, seller: &str) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            seller_id: SellerId::new(seller),
            name: format!("Product {id}"),
            price: 499.0,
            image_url: None,
            category_id: Some(CategoryId::new("shoes")),
            approval_status: ApprovalStatus::Approved,
            is_deleted: false,
            is_disabled: false,
        }
    }

    fn store() -> SqlBoostStore {
        let store = SqlBoostStore::in_memory().unwrap();
        store
            .upsert_seller(&SellerSummary {
                id: SellerId::new("s1"),
                store_name: "Shoe Shack".to_string(),
            })
            .unwrap();
        store
            .upsert_category(&CategorySummary {
                id: CategoryId::new("shoes"),
                name: "Shoes".to_string(),
            })
            .unwrap();
        store.upsert_product(&product("p1", "s1")).unwrap();
        store.upsert_product(&product("p2", "s1")).unwrap();
        store
    }

    fn boost(product: &str, boost_type: BoostType, days: u32, budget: f64) -> AdBoost {
        let estimate = calculate_boost_price(
            &BoostPriceRequest::new(boost_type, days).with_daily_budget(budget),
            &MarketplaceMetrics::simulated(),
            now().date_naive(),
        );
        AdBoost::activate(
            ProductId::new(product),
            SellerId::new("s1"),
            &estimate,
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_insert_and_find_round_trips_fields() {
        let store = store();
        let b = boost("p1", BoostType::SearchPriority, 7, 50.0);
        store.insert_boost(&b, None).unwrap();

        let found = store.find_boost(&b.id).unwrap().unwrap();
        assert_eq!(found, b);
        assert!(store.find_boost(&BoostId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn test_guarded_change_status() {
        let store = store();
        let b = boost("p1", BoostType::SearchPriority, 7, 0.0);
        store.insert_boost(&b, None).unwrap();
        let at = now() + Duration::hours(1);

        let wrong_owner =
            StatusChange::by_seller(&b.id, &SellerId::new("s2"), BoostStatus::Paused, at);
        assert!(store.change_status(&wrong_owner).unwrap().is_none());

        let pause = StatusChange::by_seller(&b.id, &b.seller_id, BoostStatus::Paused, at);
        let paused = store.change_status(&pause).unwrap().unwrap();
        assert_eq!(paused.status, BoostStatus::Paused);
        assert_eq!(paused.paused_at, Some(at));
        assert_eq!(paused.updated_at, at);

        let resume = StatusChange::by_seller(&b.id, &b.seller_id, BoostStatus::Active, at);
        let resumed = store.change_status(&resume).unwrap().unwrap();
        assert_eq!(resumed.status, BoostStatus::Active);
        assert_eq!(resumed.paused_at, None);
    }

    #[test]
    fn test_cancel_featured_deletes_companion() {
        let store = store();
        let b = boost("p1", BoostType::Featured, 7, 150.0);
        let featured = FeaturedProduct::for_boost(&b).unwrap();
        store.insert_boost(&b, Some(&featured)).unwrap();

        let row = store.featured_product(&b.product_id).unwrap().unwrap();
        assert_eq!(row.expires_at, b.ends_at);
        assert_eq!(row.priority, 2);

        let cancel = StatusChange::by_seller(&b.id, &b.seller_id, BoostStatus::Cancelled, now());
        store.change_status(&cancel).unwrap().unwrap();
        assert!(store.featured_product(&b.product_id).unwrap().is_none());
    }

    #[test]
    fn test_cancel_older_stacked_featured_keeps_companion() {
        let store = store();
        let week = boost("p1", BoostType::Featured, 7, 0.0);
        let month = boost("p1", BoostType::Featured, 30, 0.0);
        for b in [&week, &month] {
            store
                .insert_boost(b, FeaturedProduct::for_boost(b).as_ref())
                .unwrap();
        }

        let cancel =
            StatusChange::by_seller(&week.id, &week.seller_id, BoostStatus::Cancelled, now());
        store.change_status(&cancel).unwrap().unwrap();

        let row = store.featured_product(&month.product_id).unwrap().unwrap();
        assert!(row.is_active);
        assert_eq!(row.expires_at, month.ends_at);
    }

    #[test]
    fn test_cancel_newest_stacked_featured_hands_companion_over() {
        let store = store();
        let month = boost("p1", BoostType::Featured, 30, 300.0);
        let week = boost("p1", BoostType::Featured, 7, 0.0);
        for b in [&month, &week] {
            store
                .insert_boost(b, FeaturedProduct::for_boost(b).as_ref())
                .unwrap();
        }
        assert_eq!(
            store.featured_product(&week.product_id).unwrap().unwrap().expires_at,
            week.ends_at
        );

        let cancel =
            StatusChange::by_seller(&week.id, &week.seller_id, BoostStatus::Cancelled, now());
        store.change_status(&cancel).unwrap().unwrap();

        let row = store.featured_product(&month.product_id).unwrap().unwrap();
        assert!(row.is_active);
        assert_eq!(row.expires_at, month.ends_at);
        assert_eq!(row.priority, FeaturedProduct::priority_for_budget(300.0));
    }

    #[test]
    fn test_expire_sweep_hands_companion_to_live_boost() {
        let store = store();
        let month = boost("p1", BoostType::Featured, 30, 0.0);
        let day = boost("p1", BoostType::Featured, 1, 0.0);
        for b in [&month, &day] {
            store
                .insert_boost(b, FeaturedProduct::for_boost(b).as_ref())
                .unwrap();
        }

        let expired = store.expire_boosts(now() + Duration::days(2)).unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, day.id);

        let row = store.featured_product(&month.product_id).unwrap().unwrap();
        assert!(row.is_active);
        assert_eq!(row.expires_at, month.ends_at);
    }

    #[test]
    fn test_expire_sweep() {
        let store = store();
        let short = boost("p1", BoostType::Featured, 1, 0.0);
        let long = boost("p2", BoostType::Featured, 30, 0.0);
        store
            .insert_boost(&short, FeaturedProduct::for_boost(&short).as_ref())
            .unwrap();
        store
            .insert_boost(&long, FeaturedProduct::for_boost(&long).as_ref())
            .unwrap();

        let later = now() + Duration::days(2);
        let expired = store.expire_boosts(later).unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, short.id);
        assert_eq!(expired[0].status, BoostStatus::Ended);

        assert!(!store.featured_product(&short.product_id).unwrap().unwrap().is_active);
        assert!(store.featured_product(&long.product_id).unwrap().unwrap().is_active);
        assert!(store.expire_boosts(later).unwrap().is_empty());
    }

    #[test]
    fn test_counters() {
        let store = store();
        let b = boost("p1", BoostType::CategorySpotlight, 7, 0.0);
        store.insert_boost(&b, None).unwrap();

        assert!(store.increment_counter(&b.id, BoostCounter::Impressions).unwrap());
        assert!(store.increment_counter(&b.id, BoostCounter::Impressions).unwrap());
        assert!(store.increment_counter(&b.id, BoostCounter::Clicks).unwrap());
        assert!(!store
            .increment_counter(&BoostId::new("missing"), BoostCounter::Orders)
            .unwrap());

        let found = store.find_boost(&b.id).unwrap().unwrap();
        assert_eq!(found.impressions, 2);
        assert_eq!(found.clicks, 1);
        assert_eq!(found.orders_generated, 0);
    }

    #[test]
    fn test_listing_order_and_filters() {
        let store = store();
        let cheap = boost("p1", BoostType::SearchPriority, 7, 10.0);
        let rich = boost("p2", BoostType::SearchPriority, 7, 300.0);
        store.insert_boost(&cheap, None).unwrap();
        store.insert_boost(&rich, None).unwrap();

        let query = ListingQuery {
            boost_type: None,
            limit: 10,
            now: now(),
        };
        let listings = store.active_boosted_products(&query).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].boost_id, rich.id);
        assert_eq!(listings[0].seller.store_name, "Shoe Shack");
        assert_eq!(listings[0].category.as_ref().unwrap().name, "Shoes");

        let mut hidden = product("p2", "s1");
        hidden.approval_status = ApprovalStatus::Pending;
        store.upsert_product(&hidden).unwrap();
        let listings = store.active_boosted_products(&query).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].boost_id, cheap.id);

        let featured_only = ListingQuery {
            boost_type: Some(BoostType::Featured),
            ..query
        };
        assert!(store.active_boosted_products(&featured_only).unwrap().is_empty());
    }

    #[test]
    fn test_aggregates() {
        let store = store();
        store
            .insert_boost(&boost("p1", BoostType::Featured, 7, 0.0), None)
            .unwrap();
        store
            .insert_boost(&boost("p2", BoostType::Featured, 7, 0.0), None)
            .unwrap();

        let counts = store.active_boost_counts(now()).unwrap();
        assert_eq!(counts.get(&BoostType::Featured), Some(&2));
        assert_eq!(counts.get(&BoostType::HomepageBanner), None);

        assert_eq!(store.product_count(None).unwrap(), 2);
        assert_eq!(store.product_count(Some(&CategoryId::new("shoes"))).unwrap(), 2);
        assert_eq!(store.product_count(Some(&CategoryId::new("bags"))).unwrap(), 0);

        let since = now() - Duration::days(30);
        store
            .record_view(&UserId::new("u1"), &ProductId::new("p1"), now())
            .unwrap();
        store
            .record_view(&UserId::new("u1"), &ProductId::new("p2"), now())
            .unwrap();
        store
            .record_view(&UserId::new("u2"), &ProductId::new("p1"), now() - Duration::days(60))
            .unwrap();
        assert_eq!(store.active_user_count(None, since).unwrap(), 1);
        assert_eq!(
            store
                .active_user_count(Some(&CategoryId::new("shoes")), since)
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_boostable_products_excludes_disabled() {
        let store = store();
        let mut disabled = product("p2", "s1");
        disabled.is_disabled = true;
        store.upsert_product(&disabled).unwrap();

        let products = store.boostable_products(&SellerId::new("s1")).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::new("p1"));
        assert!(store.find_product(&ProductId::new("p2")).unwrap().unwrap().is_disabled);
    }
}
