//! Shop settings persistence.

use std::sync::Arc;

use tanuki_core::store::keys;
use tanuki_core::{KeyValueStore, ShopSettings};

use super::{StatusBoard, persist, restore};

/// Loads and saves [`ShopSettings`].
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
    board: StatusBoard,
    current: ShopSettings,
}

impl SettingsService {
    /// Load saved settings, or defaults when none are stored or they are unreadable.
    pub fn load(store: Arc<dyn KeyValueStore>, board: StatusBoard) -> Self {
        let current = restore(store.as_ref(), &board, keys::SETTINGS).unwrap_or_default();
        Self {
            store,
            board,
            current,
        }
    }

    #[must_use]
    pub const fn current(&self) -> &ShopSettings {
        &self.current
    }

    /// Replace the settings. Returns whether they were written to the store.
    pub fn save(&mut self, settings: ShopSettings) -> bool {
        self.current = settings;
        let saved = persist(self.store.as_ref(), &self.board, keys::SETTINGS, &self.current);
        if saved {
            tracing::info!(
                hourly_rate = %settings.hourly_rate,
                electricity_cost_per_hour = %settings.electricity_cost_per_hour,
                "Settings saved"
            );
        }
        saved
    }
}
