//! Order sync orchestration.
//!
//! Per order the lifecycle is `Unsent -> Sent`, with `Sent` terminal: an
//! already-sent order is rejected before any transform or network work, and
//! a failed send resets the order to `Unsent`. Orders with no eligible
//! products never enter the send path at all - that is a quiet no-op, not
//! an error.
//!
//! Batch runs iterate strictly sequentially; one order's API failure never
//! aborts the batch. Nothing retries automatically - a failed order stays
//! `Unsent` and waits for the next manual or status-driven trigger.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use superball_core::{Order, OrderId, OrderStatus, SupplierOrderId, SyncState};

use super::eligibility::eligible_products;
use super::transform::build_payload;
use crate::api::{ApiError, SupplierApiClient};
use crate::catalog::{CatalogError, ProductCatalog};
use crate::diag::DiagnosticLog;
use crate::store::{OrderStore, StoreError};

/// Errors that abort a single-order sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to send order: {0}")]
    Api(#[from] ApiError),

    /// The assembled payload was missing required fields. Defaulting makes
    /// this unreachable short of a regression; it is checked, not assumed.
    #[error("assembled payload is missing required fields: {0}")]
    IncompletePayload(String),
}

/// Expected outcomes of a single-order sync. None of these are faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Transmitted and recorded in this call.
    Sent(SupplierOrderId),
    /// The idempotency guard rejected a second send.
    AlreadySent,
    /// No supplier-sourced line items; nothing to transmit.
    NoEligibleProducts,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSyncReport {
    /// Orders transmitted and recorded this run.
    pub sent: u32,
    /// Candidates skipped without a send attempt (no eligible products, or
    /// already sent by the time they were reached).
    pub skipped: u32,
    /// Orders whose send attempt failed.
    pub failed: Vec<OrderId>,
}

impl BatchSyncReport {
    /// A batch counts as successful only when it actually sent something.
    /// A run where every candidate was skipped reports failure even though
    /// no individual order faulted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.sent > 0
    }

    /// Human-readable one-line summary for the invoking surface.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_success() {
            let mut message = format!("Successfully sent {} orders.", self.sent);
            if !self.failed.is_empty() {
                message.push_str(&format!(" Failed to send {} orders.", self.failed.len()));
            }
            message
        } else {
            "No orders were sent.".to_string()
        }
    }
}

/// Coordinates transform, send, and state recording for orders.
pub struct SyncOrchestrator<'a> {
    api: &'a SupplierApiClient,
    store: &'a dyn OrderStore,
    catalog: &'a dyn ProductCatalog,
    diag: DiagnosticLog,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        api: &'a SupplierApiClient,
        store: &'a dyn OrderStore,
        catalog: &'a dyn ProductCatalog,
        diag: DiagnosticLog,
    ) -> Self {
        Self {
            api,
            store,
            catalog,
            diag,
        }
    }

    /// Sync one order.
    ///
    /// On API success the `Sent` state (timestamp plus supplier id) is
    /// recorded in a single store write. On API failure the state is
    /// explicitly reset to `Unsent` and the failure is returned without
    /// retrying.
    ///
    /// # Errors
    ///
    /// See [`SyncError`]. `AlreadySent` and `NoEligibleProducts` are
    /// outcomes, not errors.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn sync_one(&self, id: OrderId) -> Result<SyncOutcome, SyncError> {
        let order = self
            .store
            .order(id)?
            .ok_or(SyncError::OrderNotFound(id))?;

        if self.store.sync_state(id)?.is_sent() {
            return Ok(SyncOutcome::AlreadySent);
        }

        let products = eligible_products(&order, self.catalog)?;
        if products.is_empty() {
            return Ok(SyncOutcome::NoEligibleProducts);
        }

        self.send_and_record(&order, &products).await
    }

    /// Send all unsent candidate orders, sequentially.
    ///
    /// Candidates are orders in an active status that are not yet sent.
    /// Per-order failures are isolated into the report; only a failure of
    /// the candidate query itself aborts the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the candidate query fails.
    #[instrument(skip(self))]
    pub async fn sync_all_unsent(&self) -> Result<BatchSyncReport, SyncError> {
        let candidates = self.store.unsent_candidates(OrderStatus::ACTIVE)?;
        let mut report = BatchSyncReport::default();

        for id in candidates {
            match self.sync_one(id).await {
                Ok(SyncOutcome::Sent(_)) => report.sent += 1,
                Ok(SyncOutcome::AlreadySent | SyncOutcome::NoEligibleProducts) => {
                    report.skipped += 1;
                }
                Err(e) => {
                    self.diag
                        .log(format!("Order ID {id} failed to send: {e}"));
                    report.failed.push(id);
                }
            }
        }

        self.diag.log(format!(
            "Batch sync finished. Sent: {}, Skipped: {}, Failed: {}.",
            report.sent,
            report.skipped,
            report.failed.len()
        ));
        Ok(report)
    }

    async fn send_and_record(
        &self,
        order: &Order,
        products: &[super::eligibility::EligibleProduct],
    ) -> Result<SyncOutcome, SyncError> {
        let payload = build_payload(order, products, self.api.is_testing());
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(SyncError::IncompletePayload(missing.join(", ")));
        }

        self.diag.log(format!(
            "Prepared Order Data: {}",
            serde_json::to_string(&payload).unwrap_or_else(|e| format!("<unserializable: {e}>"))
        ));

        match self.api.send_order(&payload).await {
            Ok(supplier_order_id) => {
                self.store.set_sync_state(
                    order.id,
                    SyncState::Sent {
                        date_sent: Utc::now(),
                        supplier_order_id: supplier_order_id.clone(),
                    },
                )?;
                self.store
                    .add_order_note(order.id, "Order successfully sent to Superball.")?;
                Ok(SyncOutcome::Sent(supplier_order_id))
            }
            Err(e) => {
                // Explicit reset: a previous ambiguous state must read as
                // unsent so the order remains a retry candidate.
                self.store.set_sync_state(order.id, SyncState::Unsent)?;
                self.diag
                    .log(format!("Order ID {} failed to send: {e}", order.id));
                self.store.add_order_note(
                    order.id,
                    &format!("Failed to send order to Superball: {e}"),
                )?;
                Err(SyncError::Api(e))
            }
        }
    }
}
