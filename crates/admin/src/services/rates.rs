//! Currency rate resolver.
//!
//! Wraps [`CurrencyRateState`] with refresh, mode switching and persistence.
//! At most one request to the rate source is in flight at a time: a refresh
//! that arrives while another is running waits for it and reuses its result
//! instead of issuing a second request.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tanuki_core::store::keys;
use tanuki_core::{CurrencyRateState, KeyValueStore, ManualRateConfig, RateCache, select_rates};
use tokio::sync::Mutex;

use super::{Notice, StatusBoard, persist, restore};
use crate::rates::{RateError, RateSource};

/// What a call to [`CurrencyRateResolver::refresh`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Both rates were replaced with freshly fetched values.
    Updated { bcv: Decimal, paralelo: Decimal },
    /// Manual mode is on; nothing was fetched.
    SkippedManual,
    /// Another refresh was already running and succeeded; its rates are
    /// now in place.
    Coalesced,
}

/// Resolves the current BCV and Paralelo rates.
pub struct CurrencyRateResolver<S> {
    source: S,
    store: Arc<dyn KeyValueStore>,
    board: StatusBoard,
    state: Mutex<CurrencyRateState>,
    in_flight: Mutex<()>,
}

impl<S: RateSource> CurrencyRateResolver<S> {
    /// Restore the resolver from the persisted rate cache and manual config.
    pub fn load(source: S, store: Arc<dyn KeyValueStore>, board: StatusBoard) -> Self {
        let cache: RateCache =
            restore(store.as_ref(), &board, keys::CURRENCY_RATES).unwrap_or_default();
        let manual: ManualRateConfig =
            restore(store.as_ref(), &board, keys::MANUAL_CURRENCY_RATES).unwrap_or_default();

        tracing::debug!(
            manual = manual.use_manual_rates,
            has_cache = cache.last_update.is_some(),
            "Currency rate state restored"
        );

        Self {
            source,
            store,
            board,
            state: Mutex::new(CurrencyRateState::from_persisted(cache, manual)),
            in_flight: Mutex::new(()),
        }
    }

    /// Fetch fresh rates unless in manual mode.
    ///
    /// On failure the cached rates are left exactly as they were and the
    /// error message is kept in the state for display.
    ///
    /// # Errors
    ///
    /// Returns `RateError` if the request fails or the response lacks either
    /// rate. A call that waited on a concurrent refresh returns
    /// `RateError::Shared` when that refresh failed.
    pub async fn refresh(&self) -> Result<RefreshOutcome, RateError> {
        if self.state.lock().await.use_manual_rates {
            tracing::debug!("Manual rates enabled, skipping refresh");
            return Ok(RefreshOutcome::SkippedManual);
        }

        let Ok(_flight) = self.in_flight.try_lock() else {
            tracing::debug!("Refresh already in flight, waiting for it");
            let _wait = self.in_flight.lock().await;
            // Every refresh either clears or sets `last_error`, so it now
            // describes the one just waited on.
            return match self.state.lock().await.last_error.clone() {
                Some(message) => Err(RateError::Shared(message)),
                None => Ok(RefreshOutcome::Coalesced),
            };
        };

        let fetched_at = Utc::now();
        let fetched = match self.source.fetch_entries().await {
            Ok(entries) => select_rates(&entries, fetched_at).map_err(RateError::from),
            Err(e) => Err(e),
        };

        let mut state = self.state.lock().await;
        match fetched {
            Ok(rates) => {
                let bcv = rates.bcv.promedio;
                let paralelo = rates.paralelo.promedio;
                state.apply_fetch(rates, fetched_at);
                persist(
                    self.store.as_ref(),
                    &self.board,
                    keys::CURRENCY_RATES,
                    &state.rate_cache(),
                );
                tracing::info!(%bcv, %paralelo, "Exchange rates updated");
                Ok(RefreshOutcome::Updated { bcv, paralelo })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Exchange rate refresh failed, keeping cached rates");
                state.record_failure(e.to_string());
                self.board
                    .post(Notice::error(format!("Could not update exchange rates: {e}")));
                Err(e)
            }
        }
    }

    /// Overwrite both manual rates and persist them.
    pub async fn set_manual_rates(&self, bcv: Option<Decimal>, paralelo: Option<Decimal>) {
        let mut state = self.state.lock().await;
        state.set_manual_rates(bcv, paralelo);
        persist(
            self.store.as_ref(),
            &self.board,
            keys::MANUAL_CURRENCY_RATES,
            &state.manual_config(),
        );
    }

    /// Switch between manual (`true`) and automatic (`false`) mode.
    ///
    /// Switching to automatic refreshes immediately.
    ///
    /// # Errors
    ///
    /// Returns `RateError` if the triggered refresh fails; the mode change
    /// itself is kept either way.
    pub async fn toggle_mode(&self, manual: bool) -> Result<RefreshOutcome, RateError> {
        {
            let mut state = self.state.lock().await;
            state.use_manual_rates = manual;
            persist(
                self.store.as_ref(),
                &self.board,
                keys::MANUAL_CURRENCY_RATES,
                &state.manual_config(),
            );
        }
        tracing::info!(manual, "Currency rate mode changed");

        if manual {
            Ok(RefreshOutcome::SkippedManual)
        } else {
            self.refresh().await
        }
    }

    pub async fn current_bcv_rate(&self) -> Decimal {
        self.state.lock().await.current_bcv_rate()
    }

    pub async fn current_paralelo_rate(&self) -> Decimal {
        self.state.lock().await.current_paralelo_rate()
    }

    /// Copy of the full state, for display.
    pub async fn snapshot(&self) -> CurrencyRateState {
        self.state.lock().await.clone()
    }
}
