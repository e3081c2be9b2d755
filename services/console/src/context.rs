//! Wiring shared by every console command

use std::sync::Arc;

use anyhow::Result;
use api::{ApiClient, ApiConfig};
use auth::guard::GuardDecision;
use auth::routes;
use auth::session::SessionStore;
use common::storage::{FileStorage, StorageConfig};
use tracing::debug;

use crate::login;

/// Session and backend client for one console run
pub struct Console {
    pub session: SessionStore,
    pub api: ApiClient,
}

impl Console {
    /// Build the console from `TALLER_*` environment variables
    pub fn from_env() -> Result<Self> {
        let storage = FileStorage::open(&StorageConfig::from_env()?)?;
        let session = SessionStore::create(Arc::new(storage));
        let api = ApiClient::new(&ApiConfig::from_env()?, session.clone())?;
        Ok(Self { session, api })
    }

    /// Console over an existing session and client
    pub fn new(session: SessionStore, api: ApiClient) -> Self {
        Self { session, api }
    }

    /// Restore the persisted session and decide what opening `path` does
    pub async fn enter(&self, path: &str) -> GuardDecision {
        login::rehydrate(&self.api).await;
        let decision = routes::navigate(path, &self.session.snapshot());
        debug!("Opening {} -> {:?}", path, decision);
        decision
    }

    /// Restore the persisted session and fail unless someone is logged in
    pub async fn require_session(&self) -> Result<()> {
        if login::rehydrate(&self.api).await {
            Ok(())
        } else {
            anyhow::bail!("Not logged in. Run `taller login` first.")
        }
    }
}
