//! Order model - a read-mostly snapshot of a host-store order.
//!
//! The host platform owns orders; the engine only reads line items and
//! address fields, and records the outcome of a send through the
//! [`SyncState`](super::SyncState) written back via the order store.

use serde::{Deserialize, Serialize};

use super::{OrderId, ProductId};

/// Host-store order processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Processing,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    /// Statuses eligible for batch sync candidate selection.
    pub const ACTIVE: &'static [Self] = &[Self::Processing, Self::OnHold];
}

/// One line item of an order.
///
/// `product` is `None` when the referenced product was deleted after the
/// order was placed; such lines are never eligible for the supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: Option<ProductId>,
    pub quantity: u32,
}

/// Shipping address fields as stored by the host platform.
///
/// Every field is optional; the payload transform substitutes a literal
/// placeholder for absent values because the supplier API requires all
/// address keys to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub county: Option<String>,
    pub locality: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

/// A read-mostly snapshot of a host-store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
    pub shipping: ShippingAddress,
    /// Billing phone doubles as the shipping contact number.
    pub billing_phone: Option<String>,
    pub billing_email: Option<String>,
    pub customer_note: Option<String>,
}
