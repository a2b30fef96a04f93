//! Order-side synchronization: eligibility, payload transform, orchestration.

pub mod eligibility;
pub mod sync;
pub mod transform;

pub use eligibility::{EligibleProduct, SUPPLIER_MARKER, eligible_products, is_supplier_item};
pub use sync::{BatchSyncReport, SyncError, SyncOrchestrator, SyncOutcome};
pub use transform::{EXTERNAL_ID_PREFIX, build_payload, external_order_id};
