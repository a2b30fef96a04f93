//! Command implementations.

pub mod feed;
pub mod orders;
pub mod settings;

use std::path::Path;

use thiserror::Error;

use superball_sync::{ApiError, ConfigError, DiagnosticLog, FeedError, SupplierConfig, SyncError};

use crate::store::JsonStore;

/// Errors that can occur running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store file error: {0}")]
    Store(#[from] crate::store::JsonStoreError),

    #[error("diagnostic log error: {0}")]
    Log(#[from] std::io::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    /// The operation ran but did not succeed (e.g. a batch where nothing
    /// was sent). Carries the human-readable summary.
    #[error("{0}")]
    Failed(String),
}

/// Per-invocation wiring: config, diagnostic log, and the JSON store.
pub struct Context {
    pub config: SupplierConfig,
    pub diag: DiagnosticLog,
    pub store: JsonStore,
}

impl Context {
    /// Load configuration from the environment and open the store and log.
    pub fn build(store_path: &Path, log_path: &Path) -> Result<Self, CliError> {
        let config = SupplierConfig::from_env()?;
        let diag = DiagnosticLog::to_file(log_path, config.log_secrets)?;
        let store = JsonStore::open(store_path)?;
        Ok(Self {
            config,
            diag,
            store,
        })
    }
}
