//! Tanuki Core - Pricing engine and shared types.
//!
//! This crate provides the computation core of the Tanuki Shop admin tool:
//! - `pricing` - Turns raw cost inputs into a suggested price and net profit
//! - `rates` - BCV/Paralelo rate state and the manual-vs-fetched resolution rule
//! - `catalog` - Saved product snapshots
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no network
//! and no filesystem. Persistence is expressed through the
//! [`store::KeyValueStore`] trait, implemented by the admin crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, categories and prices
//! - [`pricing`] - The pricing engine
//! - [`rates`] - Currency rate state and resolution
//! - [`catalog`] - Product snapshots and the in-memory catalog
//! - [`settings`] - Shop-wide hourly rates
//! - [`draft`] - Calculator draft and edit handoff records
//! - [`store`] - Key-value persistence contract
//! - [`input`] - Permissive numeric input coercion

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod draft;
pub mod input;
pub mod pricing;
pub mod rates;
pub mod settings;
pub mod store;
pub mod types;

pub use catalog::{Catalog, CatalogSummary, Product, ReplaceOutcome};
pub use draft::{CalculatorDraft, EditHandoff};
pub use input::{coerce_decimal, coerce_optional};
pub use pricing::{CostInputs, PricingError, PricingResult, calculate};
pub use rates::{
    CurrencyRateState, FetchedRate, FetchedRates, ManualRateConfig, RateCache, RateEntry,
    RateKind, RateSelectionError, select_rates,
};
pub use settings::ShopSettings;
pub use store::{KeyValueStore, MemoryStore, StoreError, load_json, save_json};
pub use types::*;
