//! Product catalog records.
//!
//! A [`Product`] is a frozen snapshot of a calculation: its inputs, the
//! result computed from them, and naming metadata. Products are only ever
//! replaced whole (by id) or removed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{CostInputs, PricingError, PricingResult, calculate};
use crate::types::{Category, ProductId};

/// A saved product with its pricing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    pub inputs: CostInputs,
    pub result: PricingResult,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Price `inputs` and snapshot them as a new product.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if the inputs fail validation.
    pub fn create(
        name: impl Into<String>,
        category: Category,
        inputs: CostInputs,
        now: DateTime<Utc>,
    ) -> Result<Self, PricingError> {
        let result = calculate(&inputs)?;
        Ok(Self {
            id: ProductId::generate(),
            name: name.into(),
            category,
            inputs,
            result,
            created_at: now,
            updated_at: None,
        })
    }

    /// Recompute this product from new inputs, keeping its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if the inputs fail validation.
    pub fn revise(
        &self,
        name: impl Into<String>,
        category: Category,
        inputs: CostInputs,
        now: DateTime<Utc>,
    ) -> Result<Self, PricingError> {
        let result = calculate(&inputs)?;
        Ok(Self {
            id: self.id.clone(),
            name: name.into(),
            category,
            inputs,
            result,
            created_at: self.created_at,
            updated_at: Some(now),
        })
    }
}

/// What [`Catalog::replace`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// An existing record with the same id was overwritten.
    Replaced,
    /// No record had that id, so the product was added as new.
    Inserted,
}

/// Aggregate figures over the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogSummary {
    pub product_count: usize,
    pub average_suggested_price: Decimal,
    pub average_net_profit: Decimal,
    /// Products whose net profit is negative.
    pub loss_making: usize,
}

/// In-memory product collection with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Build a catalog from stored records, dropping later duplicates of an id.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            if catalog.get(&product.id).is_some() {
                tracing::warn!(id = %product.id, "Dropping duplicate product id");
                continue;
            }
            catalog.products.push(product);
        }
        catalog
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Add a product, replacing any existing record with the same id.
    pub fn insert(&mut self, product: Product) {
        self.replace(product);
    }

    /// Overwrite the record with the product's id, or add it if absent.
    pub fn replace(&mut self, product: Product) -> ReplaceOutcome {
        match self.products.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => {
                *existing = product;
                ReplaceOutcome::Replaced
            }
            None => {
                self.products.push(product);
                ReplaceOutcome::Inserted
            }
        }
    }

    /// Remove and return the product with `id`.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|product| &product.id == id)?;
        Some(self.products.remove(index))
    }

    /// Products sorted newest `created_at` first.
    #[must_use]
    pub fn newest_first(&self) -> Vec<&Product> {
        let mut sorted: Vec<&Product> = self.products.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        if self.products.is_empty() {
            return CatalogSummary::default();
        }

        // Average the shares rather than the totals; a sum of large prices
        // can leave the Decimal range.
        let count = Decimal::from(self.products.len());
        let (average_price, average_profit) = self
            .products
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(price, profit), product| {
                (
                    price + product.result.suggested_price / count,
                    profit + product.result.net_profit / count,
                )
            });

        CatalogSummary {
            product_count: self.products.len(),
            average_suggested_price: average_price,
            average_net_profit: average_profit,
            loss_making: self
                .products
                .iter()
                .filter(|product| product.result.is_loss())
                .count(),
        }
    }
}
