//! Superball supplier synchronization engine.
//!
//! Integrates a host e-commerce store with the Superball B2B API:
//!
//! - **Order sync** - detects supplier-sourced line items on customer orders,
//!   builds the supplier's order payload, and transmits it with an
//!   idempotency guard (an order is never sent twice).
//! - **Catalog import** - fetches the supplier's delimited product feed and
//!   creates missing products as drafts, applying a configurable price
//!   markup. Existing products are never modified.
//! - **Stock reconciliation** - updates stock quantities for existing,
//!   stock-managed products by SKU match against the feed.
//!
//! # Architecture
//!
//! The host platform owns orders and catalog products; the engine reaches
//! them through the [`OrderStore`] and [`ProductCatalog`] traits. All
//! configuration is carried by a single [`SupplierConfig`] constructed once
//! per invocation and injected into every component - no component reads
//! ambient global state.
//!
//! Execution is invocation-driven and strictly sequential: each operation
//! runs to completion before returning, with no background workers and no
//! concurrent dispatch to the supplier API. The check-then-act around the
//! per-order sent flag is safe within one invocation because of this; the
//! engine has no cross-invocation lock, so overlapping invocations must be
//! serialized by the caller.
//!
//! # Modules
//!
//! - [`config`] - Injected configuration
//! - [`diag`] - Append-only diagnostic log file
//! - [`api`] - Supplier order API client
//! - [`feed`] - Feed fetcher and delimited-text parser
//! - [`orders`] - Eligibility, payload transform, sync orchestrator
//! - [`import`] - Product import reconciler
//! - [`stock`] - Stock reconciler
//! - [`store`] / [`catalog`] - Host collaborator traits

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod diag;
pub mod feed;
pub mod import;
pub mod orders;
pub mod stock;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiError, SupplierApiClient};
pub use catalog::{CatalogError, ProductCatalog};
pub use config::{ConfigError, StockUpdateFrequency, SupplierConfig};
pub use diag::DiagnosticLog;
pub use feed::{FeedClient, FeedError, ParsedFeed};
pub use import::{ImportSummary, ProductImporter};
pub use orders::{BatchSyncReport, SyncError, SyncOrchestrator, SyncOutcome};
pub use stock::{StockReconciler, StockSummary};
pub use store::{OrderStore, StoreError};
