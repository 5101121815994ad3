//! Key-value store backends.
//!
//! # Layout
//!
//! [`JsonFileStore`] keeps one `<key>.json` file per key under the data
//! directory:
//!
//! - `tanuki_settings.json` - Hourly labor/electricity rates
//! - `tanuki_products.json` - Product catalog
//! - `tanuki_calculator_draft.json` - Unsaved calculator form
//! - `tanuki_editing_product.json` - One-shot edit handoff
//! - `tanuki_currency_rates.json` - Last fetched BCV/Paralelo rates
//! - `tanuki_manual_currency_rates.json` - Manual rate overrides

pub mod file;

use std::path::Path;
use std::sync::Arc;

use tanuki_core::{KeyValueStore, MemoryStore};

pub use file::JsonFileStore;

/// Open the file store at `dir`, falling back to a volatile in-memory store.
///
/// Returns the store and, when the fallback was used, the reason.
#[must_use]
pub fn open_or_memory(dir: &Path) -> (Arc<dyn KeyValueStore>, Option<String>) {
    match JsonFileStore::open(dir) {
        Ok(store) => (Arc::new(store), None),
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "Data directory unavailable, changes will not be saved"
            );
            (Arc::new(MemoryStore::new()), Some(e.to_string()))
        }
    }
}
