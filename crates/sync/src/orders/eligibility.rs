//! Line-item eligibility.
//!
//! A line item belongs to the supplier when the product's free-text
//! supplier attribute contains the marker, case-insensitively. The
//! attribute is user-editable text rather than a structured category; the
//! loose match is intentional and lives behind one named predicate so the
//! rule can be tightened later without touching callers.

use superball_core::Order;

use crate::catalog::{CatalogError, ProductCatalog};

/// Marker substring identifying supplier-sourced products.
pub const SUPPLIER_MARKER: &str = "superball";

/// Placeholder for absent required text fields; the supplier API requires
/// every key to be present, never null.
pub const PLACEHOLDER: &str = "N/A";

/// A transient projection of one eligible line item.
///
/// Recomputed on every sync attempt - line items can be edited between
/// attempts, so the set is never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleProduct {
    pub name: String,
    /// SKU on the supplier side.
    pub code: String,
    pub quantity: u32,
}

/// The eligibility predicate: does this supplier attribute mark a
/// supplier-sourced product?
#[must_use]
pub fn is_supplier_item(supplier_tag: Option<&str>) -> bool {
    supplier_tag.is_some_and(|tag| tag.to_lowercase().contains(SUPPLIER_MARKER))
}

/// Project an order's supplier-sourced line items.
///
/// Lines whose product was deleted resolve to nothing and are skipped.
/// Name and code default to the placeholder, quantity defaults to 1.
///
/// # Errors
///
/// Returns an error only when the catalog itself fails; an order with no
/// eligible items yields an empty vec, which is not an error.
pub fn eligible_products(
    order: &Order,
    catalog: &dyn ProductCatalog,
) -> Result<Vec<EligibleProduct>, CatalogError> {
    let mut eligible = Vec::new();
    for item in &order.items {
        let Some(product_id) = item.product else {
            continue;
        };
        let Some(product) = catalog.product(product_id)? else {
            continue;
        };
        if !is_supplier_item(product.supplier_tag.as_deref()) {
            continue;
        }

        let name = if product.name.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            product.name.clone()
        };
        let code = if product.sku.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            product.sku.to_string()
        };
        eligible.push(EligibleProduct {
            name,
            code,
            quantity: if item.quantity == 0 { 1 } else { item.quantity },
        });
    }
    Ok(eligible)
}
