//! Remote exchange rate source.
//!
//! The source returns the raw list of rate entries; picking the BCV and
//! Paralelo entries out of it is done by `tanuki_core::select_rates`.

pub mod client;

use std::future::Future;

use tanuki_core::{RateEntry, RateSelectionError};
use thiserror::Error;

pub use client::DolarApiClient;

/// Errors from fetching or interpreting exchange rates.
#[derive(Debug, Error)]
pub enum RateError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not a list of rate entries.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response lacked the BCV or Paralelo rate.
    #[error("Incomplete rates: {0}")]
    Incomplete(#[from] RateSelectionError),

    /// The concurrent refresh this call waited on failed.
    #[error("Concurrent refresh failed: {0}")]
    Shared(String),
}

/// Anything that can produce the current list of rate entries.
pub trait RateSource: Send + Sync {
    /// Issue one read request for the current rates.
    fn fetch_entries(&self) -> impl Future<Output = Result<Vec<RateEntry>, RateError>> + Send;
}
