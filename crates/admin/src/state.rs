//! Application state shared across commands.

use std::sync::Arc;

use tanuki_core::KeyValueStore;
use tokio::sync::Mutex;

use crate::config::AdminConfig;
use crate::error::Result;
use crate::rates::{DolarApiClient, RateSource};
use crate::services::{
    CatalogService, CurrencyRateResolver, DraftService, Notice, SettingsService, StatusBoard,
};
use crate::storage::open_or_memory;

/// Application state shared across all commands.
pub struct AppState<S = DolarApiClient> {
    inner: Arc<AppStateInner<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<S> {
    config: AdminConfig,
    store: Arc<dyn KeyValueStore>,
    board: StatusBoard,
    rates: CurrencyRateResolver<S>,
    settings: Mutex<SettingsService>,
    drafts: DraftService,
    catalog: Mutex<CatalogService>,
}

impl AppState<DolarApiClient> {
    /// Open the data directory and build the dolarapi client from `config`.
    ///
    /// An unusable data directory is not fatal: the session runs on an
    /// in-memory store and a warning notice is posted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Rates` if the HTTP client cannot be built.
    pub fn from_config(config: AdminConfig) -> Result<Self> {
        let board = StatusBoard::new();
        let (store, fallback) = open_or_memory(&config.data_dir);
        if let Some(reason) = fallback {
            board.post(Notice::warning(format!(
                "Data directory {} is unavailable ({reason}); changes will not be saved",
                config.data_dir.display()
            )));
        }
        let source = DolarApiClient::from_config(&config)?;
        Ok(Self::with_parts(config, source, store, board))
    }
}

impl<S: RateSource> AppState<S> {
    /// Assemble state from explicit parts.
    pub fn with_parts(
        config: AdminConfig,
        source: S,
        store: Arc<dyn KeyValueStore>,
        board: StatusBoard,
    ) -> Self {
        let rates = CurrencyRateResolver::load(source, Arc::clone(&store), board.clone());
        let settings = SettingsService::load(Arc::clone(&store), board.clone());
        let drafts = DraftService::new(Arc::clone(&store), board.clone());
        let catalog = CatalogService::load(Arc::clone(&store), board.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                board,
                rates,
                settings: Mutex::new(settings),
                drafts,
                catalog: Mutex::new(catalog),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    #[must_use]
    pub fn board(&self) -> &StatusBoard {
        &self.inner.board
    }

    #[must_use]
    pub fn rates(&self) -> &CurrencyRateResolver<S> {
        &self.inner.rates
    }

    #[must_use]
    pub fn settings(&self) -> &Mutex<SettingsService> {
        &self.inner.settings
    }

    #[must_use]
    pub fn drafts(&self) -> &DraftService {
        &self.inner.drafts
    }

    #[must_use]
    pub fn catalog(&self) -> &Mutex<CatalogService> {
        &self.inner.catalog
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tanuki_core::{Category, CostInputs, MemoryStore};

    use super::*;

    fn config(data_dir: std::path::PathBuf) -> AdminConfig {
        AdminConfig::from_lookup(|key| {
            (key == "TANUKI_DATA_DIR").then(|| data_dir.display().to_string())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_clones_share_services() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::from_config(config(dir.path().to_path_buf())).unwrap();
        let other = state.clone();

        state
            .catalog()
            .lock()
            .await
            .commit("Taza", Category::Ceramica, CostInputs::default())
            .unwrap();

        assert_eq!(other.catalog().lock().await.catalog().len(), 1);
        assert!(state.board().drain().is_empty());
    }

    #[tokio::test]
    async fn test_unusable_data_dir_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let state = AppState::from_config(config(blocker.join("data"))).unwrap();

        let notices = state.board().drain();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("will not be saved"));
        assert!(state.store().load("anything").unwrap().is_none());
    }

    #[test]
    fn test_with_parts_uses_given_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let state = AppState::with_parts(
            config(".tanuki".into()),
            DolarApiClient::new(
                url::Url::parse("http://localhost/v1/dolares").unwrap(),
                None,
            )
            .unwrap(),
            Arc::clone(&store),
            StatusBoard::new(),
        );
        assert!(state.drafts().load_draft().is_none());
    }
}
