//! Superball Core - Shared domain types.
//!
//! This crate provides the common types used by the other workspace
//! members:
//! - `sync` - The synchronization engine (API client, feed parser, reconcilers)
//! - `cli` - Command-line trigger surface
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no file
//! access. Orders and catalog products are owned by the host store; the
//! engine sees them through these read-mostly snapshots plus the collaborator
//! traits defined in the `sync` crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, order/catalog models, and the per-order
//!   [`types::SyncState`] lifecycle

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
