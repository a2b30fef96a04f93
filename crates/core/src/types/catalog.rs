//! Catalog product model.
//!
//! Products are owned by the host store. The engine creates new ones during
//! feed import and adjusts stock quantities during reconciliation; it never
//! edits the name, price, or description of an existing product - curated
//! listings must not be clobbered by a feed run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AttachmentId, ProductId, Sku};

/// Catalog visibility status.
///
/// Imported products start as `Draft` so they require manual review before
/// going live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
}

/// A product as stored in the host catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub sku: Sku,
    pub name: String,
    /// Active (display) price.
    pub price: Decimal,
    /// Regular price; set identically to `price` on import.
    pub regular_price: Decimal,
    pub description: String,
    pub status: ProductStatus,
    /// Whether the host tracks stock for this product. Reconciliation
    /// refuses to touch products without it.
    pub manage_stock: bool,
    pub stock_quantity: i64,
    /// Free-text supplier attribute, user-editable in the host admin.
    /// Eligibility matching runs against this field.
    pub supplier_tag: Option<String>,
    /// Pre-markup feed price, kept for margin auditing.
    pub purchase_cost: Option<Decimal>,
    pub featured_image: Option<AttachmentId>,
    pub gallery: Vec<AttachmentId>,
}

/// Fields for a product created by the feed importer.
///
/// The importer always creates draft, stock-managed products with zero
/// initial quantity; the stock reconciler fills quantities in later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: Sku,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    /// Pre-markup feed price.
    pub purchase_cost: Decimal,
}
