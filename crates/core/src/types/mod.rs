//! Core types for the Superball supplier integration.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod id;
pub mod order;
pub mod state;

pub use catalog::*;
pub use id::*;
pub use order::*;
pub use state::SyncState;
