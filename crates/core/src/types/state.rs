//! Per-order supplier synchronization state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SupplierOrderId;

/// Lifecycle of one order with respect to the supplier.
///
/// `Sent` carries both the timestamp and the supplier-assigned id by
/// construction, so "sent implies date and id are recorded" holds
/// structurally rather than by convention. A missing persisted record is
/// equivalent to `Unsent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncState {
    /// Not yet transmitted (or a previous attempt failed).
    #[default]
    Unsent,
    /// Successfully transmitted. Terminal.
    Sent {
        /// When the supplier acknowledged the order.
        date_sent: DateTime<Utc>,
        /// The order id assigned by the supplier.
        supplier_order_id: SupplierOrderId,
    },
}

impl SyncState {
    /// Whether this order has already been transmitted.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}
