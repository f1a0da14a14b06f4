use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use shelf_store::{ContentStore, Credential, GitHubContentStore};
use shelf_upload::UploadOrchestrator;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared handler state.
///
/// The orchestrator is swapped wholesale when the credential changes, so a
/// run in flight keeps the client it started with.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ServerConfig,
    orchestrator: RwLock<Option<Arc<UploadOrchestrator>>>,
}

impl AppState {
    /// State with no store; uploads are refused until a credential arrives.
    pub fn unconfigured(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                orchestrator: RwLock::new(None),
            }),
        }
    }

    /// State backed by an explicit store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn ContentStore>) -> Self {
        let state = Self::unconfigured(config);
        state.set_store(store);
        state
    }

    /// State backed by the configured remote repository, if a credential is
    /// available.
    pub fn from_config(config: ServerConfig, credential: Option<Credential>) -> ServerResult<Self> {
        let state = Self::unconfigured(config);
        if let Some(credential) = credential {
            state.rotate_credential(credential)?;
        }
        Ok(state)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// The current orchestrator, or `None` if no store is configured.
    pub fn orchestrator(&self) -> Option<Arc<UploadOrchestrator>> {
        self.inner
            .orchestrator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the backing store.
    pub fn set_store(&self, store: Arc<dyn ContentStore>) {
        let config = &self.inner.config;
        info!(store = %store.describe(), "store configured");
        let orchestrator = UploadOrchestrator::new(store, config.layout.clone(), config.upload.clone());
        *self
            .inner
            .orchestrator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(orchestrator));
    }

    /// Build a new remote client for `credential` and switch to it.
    ///
    /// On error the previous store stays in place.
    pub fn rotate_credential(&self, credential: Credential) -> ServerResult<()> {
        let store = GitHubContentStore::new(&self.inner.config.store, credential)?;
        self.set_store(Arc::new(store));
        Ok(())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.orchestrator().map(|o| o.store().describe());
        f.debug_struct("AppState")
            .field("bind_addr", &self.inner.config.bind_addr)
            .field("store", &store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_store::InMemoryContentStore;

    fn repo_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.store.owner = "acme".into();
        config.store.repo = "remotes".into();
        config
    }

    #[test]
    fn unconfigured_has_no_orchestrator() {
        let state = AppState::from_config(ServerConfig::default(), None).unwrap();
        assert!(state.orchestrator().is_none());
    }

    #[test]
    fn with_store_uses_it() {
        let state = AppState::with_store(
            ServerConfig::default(),
            Arc::new(InMemoryContentStore::new()),
        );
        assert_eq!(state.orchestrator().unwrap().store().describe(), "in-memory");
    }

    #[test]
    fn rotation_replaces_store() {
        let state = AppState::with_store(repo_config(), Arc::new(InMemoryContentStore::new()));
        let before = state.orchestrator().unwrap();

        state.rotate_credential(Credential::new("ghp_new")).unwrap();
        let after = state.orchestrator().unwrap();
        assert_eq!(after.store().describe(), "github:acme/remotes");
        // The old handle is still usable by whoever holds it.
        assert_eq!(before.store().describe(), "in-memory");
    }

    #[test]
    fn failed_rotation_keeps_previous_store() {
        // No owner/repo configured, so the remote client cannot be built.
        let state = AppState::with_store(
            ServerConfig::default(),
            Arc::new(InMemoryContentStore::new()),
        );
        assert!(state.rotate_credential(Credential::new("ghp_new")).is_err());
        assert_eq!(state.orchestrator().unwrap().store().describe(), "in-memory");
    }

    #[test]
    fn debug_does_not_leak_token() {
        let state = AppState::from_config(repo_config(), Some(Credential::new("ghp_secret"))).unwrap();
        let dbg = format!("{state:?}");
        assert!(dbg.contains("github:acme/remotes"));
        assert!(!dbg.contains("ghp_secret"));
    }
}
