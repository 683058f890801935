//! Read-side records joined into boost listings.

use crate::boost::BoostType;
use crate::ids::{BoostId, CategoryId, ProductId, SellerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation state of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

/// The slice of a product the boost flows need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub seller_id: SellerId,
    pub name: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub approval_status: ApprovalStatus,
    pub is_deleted: bool,
    pub is_disabled: bool,
}

impl ProductSummary {
    /// Whether the storefront may show the product at all.
    pub fn is_listable(&self) -> bool {
        !self.is_deleted && self.approval_status == ApprovalStatus::Approved
    }

    /// Whether a seller may buy a boost for it.
    ///
    /// Pending products can be boosted ahead of approval; the placement only
    /// shows once the product is listable.
    pub fn is_boostable(&self) -> bool {
        !self.is_deleted && !self.is_disabled && self.approval_status != ApprovalStatus::Rejected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerSummary {
    pub id: SellerId,
    pub store_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
}

/// A running boost joined with what the storefront renders for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedListing {
    pub boost_id: BoostId,
    pub boost_type: BoostType,
    pub daily_budget: f64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub product: ProductSummary,
    pub seller: SellerSummary,
    pub category: Option<CategorySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(approval_status: ApprovalStatus) -> ProductSummary {
        ProductSummary {
            id: ProductId::new("p1"),
            seller_id: SellerId::new("s1"),
            name: "Abaca tote".to_string(),
            price: 850.0,
            image_url: None,
            category_id: None,
            approval_status,
            is_deleted: false,
            is_disabled: false,
        }
    }

    #[test]
    fn test_boostable_and_listable() {
        let pending = product(ApprovalStatus::Pending);
        assert!(pending.is_boostable());
        assert!(!pending.is_listable());

        let approved = product(ApprovalStatus::Approved);
        assert!(approved.is_boostable());
        assert!(approved.is_listable());

        assert!(!product(ApprovalStatus::Rejected).is_boostable());

        let mut disabled = product(ApprovalStatus::Approved);
        disabled.is_disabled = true;
        assert!(!disabled.is_boostable());
    }
}
