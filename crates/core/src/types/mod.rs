//! Core types for Tanuki Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;

pub use category::{Category, CategoryParseError};
pub use id::ProductId;
pub use price::{CurrencyCode, Price, format_amount};
