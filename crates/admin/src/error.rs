//! Unified error handling for the admin tool.

use tanuki_core::PricingError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::rates::RateError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Inputs cannot be priced.
    #[error("Invalid pricing inputs: {0}")]
    Pricing(#[from] PricingError),

    /// Exchange rate lookup failed.
    #[error("Exchange rate error: {0}")]
    Rates(#[from] RateError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
