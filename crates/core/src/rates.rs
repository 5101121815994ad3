//! Currency rate state and resolution policy.
//!
//! Two USD rates are tracked: the official BCV rate and the informal
//! Paralelo rate. Each can come from the rate API or from a manual override.
//! The "current" rate is resolved as:
//!
//! - the manual value, when manual mode is on and that value is set and non-zero
//! - otherwise the last fetched average (`promedio`)
//! - otherwise zero
//!
//! This module holds the state and the pure rules. Fetching, persistence and
//! refresh coordination live in the admin crate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two tracked rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateKind {
    /// Official Banco Central de Venezuela rate.
    Bcv,
    /// Informal market rate.
    Paralelo,
}

impl RateKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bcv => "BCV",
            Self::Paralelo => "Paralelo",
        }
    }

    /// Whether an API entry describes this rate.
    fn matches(self, entry: &RateEntry) -> bool {
        let (nombre, fuente) = match self {
            Self::Bcv => ("Oficial", "oficial"),
            Self::Paralelo => ("Paralelo", "paralelo"),
        };
        entry.nombre.as_deref() == Some(nombre) || entry.fuente.as_deref() == Some(fuente)
    }
}

impl std::fmt::Display for RateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One element of the rate API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub fuente: Option<String>,
    /// Average of buy and sell prices.
    #[serde(default)]
    pub promedio: Option<Decimal>,
    /// Update time reported by the source, kept verbatim.
    #[serde(default)]
    pub fecha_actualizacion: Option<String>,
}

/// A successfully fetched rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedRate {
    pub promedio: Decimal,
    #[serde(default)]
    pub fecha_actualizacion: Option<String>,
    /// When this session fetched the rate. Caches written before this field
    /// existed fall back to the cache's `lastUpdate`.
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Both rates from one API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedRates {
    pub bcv: FetchedRate,
    pub paralelo: FetchedRate,
}

/// The API response did not contain a usable rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateSelectionError {
    #[error("no {0} rate in the response")]
    Missing(RateKind),
    #[error("{0} rate has no average price")]
    NoAverage(RateKind),
}

/// Pick the BCV and Paralelo entries out of an API response.
///
/// The first matching entry wins for each rate.
///
/// # Errors
///
/// Returns `RateSelectionError` if either entry is absent or lacks a `promedio`.
pub fn select_rates(
    entries: &[RateEntry],
    fetched_at: DateTime<Utc>,
) -> Result<FetchedRates, RateSelectionError> {
    let pick = |kind: RateKind| -> Result<FetchedRate, RateSelectionError> {
        let entry = entries
            .iter()
            .find(|entry| kind.matches(entry))
            .ok_or(RateSelectionError::Missing(kind))?;
        let promedio = entry.promedio.ok_or(RateSelectionError::NoAverage(kind))?;
        Ok(FetchedRate {
            promedio,
            fecha_actualizacion: entry.fecha_actualizacion.clone(),
            fetched_at: Some(fetched_at),
        })
    };

    Ok(FetchedRates {
        bcv: pick(RateKind::Bcv)?,
        paralelo: pick(RateKind::Paralelo)?,
    })
}

/// Persisted cache of the last successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCache {
    #[serde(default)]
    pub bcv_rate: Option<FetchedRate>,
    #[serde(default)]
    pub paralelo_rate: Option<FetchedRate>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

/// Persisted manual override configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRateConfig {
    #[serde(default)]
    pub use_manual_rates: bool,
    #[serde(default)]
    pub manual_bcv: Option<Decimal>,
    #[serde(default)]
    pub manual_paralelo: Option<Decimal>,
}

/// Full resolver state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyRateState {
    pub fetched_bcv: Option<FetchedRate>,
    pub fetched_paralelo: Option<FetchedRate>,
    pub manual_bcv: Option<Decimal>,
    pub manual_paralelo: Option<Decimal>,
    pub use_manual_rates: bool,
    /// Time of the most recent successful fetch.
    pub last_update: Option<DateTime<Utc>>,
    /// Message from the most recent failed refresh, cleared on success.
    pub last_error: Option<String>,
}

impl CurrencyRateState {
    /// Rebuild state from the two persisted blobs.
    #[must_use]
    pub fn from_persisted(cache: RateCache, manual: ManualRateConfig) -> Self {
        let stamp = |rate: Option<FetchedRate>| {
            rate.map(|rate| FetchedRate {
                fetched_at: rate.fetched_at.or(cache.last_update),
                ..rate
            })
        };
        Self {
            fetched_bcv: stamp(cache.bcv_rate),
            fetched_paralelo: stamp(cache.paralelo_rate),
            manual_bcv: manual.manual_bcv,
            manual_paralelo: manual.manual_paralelo,
            use_manual_rates: manual.use_manual_rates,
            last_update: cache.last_update,
            last_error: None,
        }
    }

    #[must_use]
    pub fn rate_cache(&self) -> RateCache {
        RateCache {
            bcv_rate: self.fetched_bcv.clone(),
            paralelo_rate: self.fetched_paralelo.clone(),
            last_update: self.last_update,
        }
    }

    #[must_use]
    pub const fn manual_config(&self) -> ManualRateConfig {
        ManualRateConfig {
            use_manual_rates: self.use_manual_rates,
            manual_bcv: self.manual_bcv,
            manual_paralelo: self.manual_paralelo,
        }
    }

    /// Resolve the rate consumers should use right now.
    #[must_use]
    pub fn current_rate(&self, kind: RateKind) -> Decimal {
        let (manual, fetched) = match kind {
            RateKind::Bcv => (self.manual_bcv, self.fetched_bcv.as_ref()),
            RateKind::Paralelo => (self.manual_paralelo, self.fetched_paralelo.as_ref()),
        };

        if self.use_manual_rates
            && let Some(value) = manual.filter(|value| !value.is_zero())
        {
            return value;
        }

        fetched.map_or(Decimal::ZERO, |rate| rate.promedio)
    }

    #[must_use]
    pub fn current_bcv_rate(&self) -> Decimal {
        self.current_rate(RateKind::Bcv)
    }

    #[must_use]
    pub fn current_paralelo_rate(&self) -> Decimal {
        self.current_rate(RateKind::Paralelo)
    }

    /// Replace both fetched rates together and stamp the update time.
    pub fn apply_fetch(&mut self, rates: FetchedRates, now: DateTime<Utc>) {
        self.fetched_bcv = Some(rates.bcv);
        self.fetched_paralelo = Some(rates.paralelo);
        self.last_update = Some(now);
        self.last_error = None;
    }

    /// Record a failed refresh without touching the cached rates.
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Overwrite both manual values.
    pub const fn set_manual_rates(&mut self, bcv: Option<Decimal>, paralelo: Option<Decimal>) {
        self.manual_bcv = bcv;
        self.manual_paralelo = paralelo;
    }
}
