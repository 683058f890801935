//! SQLite schema for boosts and the read-side tables they join.

pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sellers (
    id          TEXT PRIMARY KEY,
    store_name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id    TEXT PRIMARY KEY,
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id               TEXT PRIMARY KEY,
    seller_id        TEXT NOT NULL REFERENCES sellers(id),
    category_id      TEXT REFERENCES categories(id),
    name             TEXT NOT NULL,
    price            REAL NOT NULL DEFAULT 0,
    image_url        TEXT,
    approval_status  TEXT NOT NULL DEFAULT 'pending'
                     CHECK (approval_status IN ('pending', 'approved', 'rejected')),
    is_deleted       INTEGER NOT NULL DEFAULT 0,
    is_disabled      INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_products_seller ON products(seller_id);
CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id);

CREATE TABLE IF NOT EXISTS product_views (
    user_id     TEXT NOT NULL,
    product_id  TEXT NOT NULL REFERENCES products(id),
    viewed_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_product_views_time ON product_views(viewed_at);

CREATE TABLE IF NOT EXISTS product_ad_boosts (
    id                TEXT PRIMARY KEY,
    product_id        TEXT NOT NULL REFERENCES products(id),
    seller_id         TEXT NOT NULL REFERENCES sellers(id),
    boost_type        TEXT NOT NULL
                      CHECK (boost_type IN ('featured', 'search_priority', 'homepage_banner', 'category_spotlight')),
    duration_days     INTEGER NOT NULL,
    daily_budget      REAL NOT NULL DEFAULT 0,
    total_budget      REAL NOT NULL DEFAULT 0,
    cost_per_day      REAL NOT NULL DEFAULT 0,
    total_cost        REAL NOT NULL DEFAULT 0,
    is_free           INTEGER NOT NULL DEFAULT 0,
    status            TEXT NOT NULL DEFAULT 'draft'
                      CHECK (status IN ('draft', 'active', 'paused', 'ended', 'cancelled')),
    starts_at         TEXT NOT NULL,
    ends_at           TEXT NOT NULL,
    paused_at         TEXT,
    impressions       INTEGER NOT NULL DEFAULT 0,
    clicks            INTEGER NOT NULL DEFAULT 0,
    orders_generated  INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_boosts_status_ends ON product_ad_boosts(status, ends_at);
CREATE INDEX IF NOT EXISTS idx_boosts_seller ON product_ad_boosts(seller_id, created_at);
CREATE INDEX IF NOT EXISTS idx_boosts_product ON product_ad_boosts(product_id, boost_type);

CREATE TABLE IF NOT EXISTS featured_products (
    product_id   TEXT PRIMARY KEY REFERENCES products(id),
    is_active    INTEGER NOT NULL DEFAULT 1,
    priority     INTEGER NOT NULL DEFAULT 1,
    featured_at  TEXT NOT NULL,
    expires_at   TEXT NOT NULL
);
"#;

pub(crate) const BOOST_COLUMNS: &str = "id, product_id, seller_id, boost_type, duration_days, \
     daily_budget, total_budget, cost_per_day, total_cost, is_free, status, starts_at, ends_at, \
     paused_at, impressions, clicks, orders_generated, created_at, updated_at";

pub(crate) const PRODUCT_COLUMNS: &str = "id, seller_id, category_id, name, price, image_url, \
     approval_status, is_deleted, is_disabled";
