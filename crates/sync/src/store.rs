//! Order store collaborator trait.
//!
//! The host platform persists orders and the per-order sync flags; the
//! engine reads and writes them through this contract. Implementations live
//! with the host glue (the CLI ships a JSON-file-backed one; tests use an
//! in-memory one).

use thiserror::Error;

use superball_core::{Order, OrderId, OrderStatus, SyncState};

/// Errors surfaced by an order store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("order store error: {0}")]
    Backend(String),
}

/// Read/write access to host orders and their supplier sync state.
pub trait OrderStore {
    /// Load one order, if it exists.
    fn order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// The order's sync state. An absent persisted record reads as
    /// [`SyncState::Unsent`].
    fn sync_state(&self, id: OrderId) -> Result<SyncState, StoreError>;

    /// Persist the order's sync state. Only the orchestrator calls this,
    /// and only after an order is fully processed.
    fn set_sync_state(&self, id: OrderId, state: SyncState) -> Result<(), StoreError>;

    /// Orders whose status is in `statuses` and which are not yet sent,
    /// in stable id order.
    fn unsent_candidates(&self, statuses: &[OrderStatus]) -> Result<Vec<OrderId>, StoreError>;

    /// Append a human-readable note to the order's history.
    fn add_order_note(&self, id: OrderId, note: &str) -> Result<(), StoreError>;
}
