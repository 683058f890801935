//! Demo marketplace data for local runs.

use crate::boost::{ApprovalStatus, CategorySummary, ProductSummary, SellerSummary};
use crate::error::BoostError;
use crate::ids::{CategoryId, ProductId, SellerId, UserId};
use crate::store::SqlBoostStore;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const SELLERS: &[(&str, &str)] = &[
    ("seller-aling-nena", "Aling Nena's Sari-Sari"),
    ("seller-kicks-ph", "Kicks PH"),
    ("seller-bahay-craft", "Bahay Craft"),
];

const CATEGORIES: &[(&str, &str)] = &[
    ("cat-footwear", "Footwear"),
    ("cat-home", "Home & Living"),
    ("cat-snacks", "Snacks"),
];

struct DemoProduct {
    id: &'static str,
    seller: &'static str,
    category: &'static str,
    name: &'static str,
    price: f64,
    approval: ApprovalStatus,
    disabled: bool,
}

const PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        id: "prod-dried-mango",
        seller: "seller-aling-nena",
        category: "cat-snacks",
        name: "Dried Mango 200g",
        price: 145.0,
        approval: ApprovalStatus::Approved,
        disabled: false,
    },
    DemoProduct {
        id: "prod-chicharon",
        seller: "seller-aling-nena",
        category: "cat-snacks",
        name: "Chicharon Bulaklak",
        price: 95.0,
        approval: ApprovalStatus::Approved,
        disabled: false,
    },
    DemoProduct {
        id: "prod-ube-jam",
        seller: "seller-aling-nena",
        category: "cat-snacks",
        name: "Ube Halaya Jar",
        price: 220.0,
        approval: ApprovalStatus::Pending,
        disabled: false,
    },
    DemoProduct {
        id: "prod-runner",
        seller: "seller-kicks-ph",
        category: "cat-footwear",
        name: "Trail Runner",
        price: 2899.0,
        approval: ApprovalStatus::Approved,
        disabled: false,
    },
    DemoProduct {
        id: "prod-slides",
        seller: "seller-kicks-ph",
        category: "cat-footwear",
        name: "Everyday Slides",
        price: 499.0,
        approval: ApprovalStatus::Approved,
        disabled: false,
    },
    DemoProduct {
        id: "prod-boots",
        seller: "seller-kicks-ph",
        category: "cat-footwear",
        name: "Rain Boots",
        price: 1299.0,
        approval: ApprovalStatus::Rejected,
        disabled: false,
    },
    DemoProduct {
        id: "prod-banig",
        seller: "seller-bahay-craft",
        category: "cat-home",
        name: "Woven Banig Mat",
        price: 850.0,
        approval: ApprovalStatus::Approved,
        disabled: false,
    },
    DemoProduct {
        id: "prod-capiz",
        seller: "seller-bahay-craft",
        category: "cat-home",
        name: "Capiz Lamp",
        price: 1650.0,
        approval: ApprovalStatus::Approved,
        disabled: true,
    },
];

const VIEWERS: u32 = 40;

/// Counts of what [`seed_demo`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub sellers: usize,
    pub categories: usize,
    pub products: usize,
    pub views: usize,
}

/// Upsert demo sellers, categories and products, plus a spread of recent
/// product views. Safe to run more than once; views accumulate.
pub fn seed_demo(store: &SqlBoostStore, now: DateTime<Utc>) -> Result<SeedSummary, BoostError> {
    for (id, store_name) in SELLERS {
        store.upsert_seller(&SellerSummary {
            id: SellerId::new(*id),
            store_name: (*store_name).to_string(),
        })?;
    }

    for (id, name) in CATEGORIES {
        store.upsert_category(&CategorySummary {
            id: CategoryId::new(*id),
            name: (*name).to_string(),
        })?;
    }

    for product in PRODUCTS {
        store.upsert_product(&ProductSummary {
            id: ProductId::new(product.id),
            seller_id: SellerId::new(product.seller),
            name: product.name.to_string(),
            price: product.price,
            image_url: None,
            category_id: Some(CategoryId::new(product.category)),
            approval_status: product.approval,
            is_deleted: false,
            is_disabled: product.disabled,
        })?;
    }

    let mut views = 0;
    for user in 0..VIEWERS {
        let user_id = UserId::new(format!("user-{user:03}"));
        let product = &PRODUCTS[user as usize % PRODUCTS.len()];
        let viewed_at = now - Duration::hours(i64::from(user) * 7);
        store.record_view(&user_id, &ProductId::new(product.id), viewed_at)?;
        views += 1;
    }

    let summary = SeedSummary {
        sellers: SELLERS.len(),
        categories: CATEGORIES.len(),
        products: PRODUCTS.len(),
        views,
    };
    tracing::info!(?summary, "seeded demo marketplace");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BoostRepository;
    use chrono::TimeZone;

    #[test]
    fn test_seed_is_repeatable() {
        let store = SqlBoostStore::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 2, 0, 0).unwrap();

        let summary = seed_demo(&store, now).unwrap();
        assert_eq!(summary.products, 8);
        seed_demo(&store, now).unwrap();

        assert_eq!(store.product_count(None).unwrap(), 8);
        let kicks = store.boostable_products(&SellerId::new("seller-kicks-ph")).unwrap();
        assert_eq!(kicks.len(), 3);
        let bahay = store
            .boostable_products(&SellerId::new("seller-bahay-craft"))
            .unwrap();
        assert_eq!(bahay.len(), 1);

        // 40 viewers, one every 7 hours: all inside a 30-day window.
        let since = now - Duration::days(30);
        assert_eq!(store.active_user_count(None, since).unwrap(), 40);
    }
}
