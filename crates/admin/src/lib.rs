//! Tanuki Shop admin library.
//!
//! Session services for the admin tool: the product catalog, shop
//! settings, calculator drafts and the BCV/Paralelo exchange rate
//! resolver, all persisted through a [`tanuki_core::KeyValueStore`].
//!
//! Persistence is best-effort. A failed read or write is posted to the
//! shared [`services::StatusBoard`] and the session continues from memory.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod rates;
pub mod services;
pub mod state;
pub mod storage;

pub use config::AdminConfig;
pub use error::{AppError, Result};
pub use state::AppState;
