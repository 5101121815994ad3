//! Catalog service: commit, edit and delete saved products.

use std::sync::Arc;

use chrono::Utc;
use tanuki_core::store::keys;
use tanuki_core::{
    CalculatorDraft, Catalog, CatalogSummary, Category, CostInputs, KeyValueStore, Product,
    ProductId, ReplaceOutcome,
};

use super::{DraftService, Notice, StatusBoard, persist, restore};
use crate::error::{AppError, Result};

/// Result of [`CatalogService::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub product: Product,
    /// `Inserted` when the edited product no longer existed.
    pub outcome: ReplaceOutcome,
}

/// Owns the session's catalog and writes every change through to the store.
pub struct CatalogService {
    store: Arc<dyn KeyValueStore>,
    board: StatusBoard,
    catalog: Catalog,
}

impl CatalogService {
    /// Load the stored catalog; an unreadable catalog starts empty.
    pub fn load(store: Arc<dyn KeyValueStore>, board: StatusBoard) -> Self {
        let products: Vec<Product> =
            restore(store.as_ref(), &board, keys::PRODUCTS).unwrap_or_default();
        let catalog = Catalog::from_products(products);
        tracing::debug!(products = catalog.len(), "Catalog loaded");
        Self {
            store,
            board,
            catalog,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Products, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<&Product> {
        self.catalog.newest_first()
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has `id`.
    pub fn get(&self, id: &ProductId) -> Result<&Product> {
        self.catalog
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))
    }

    #[must_use]
    pub fn summary(&self) -> CatalogSummary {
        self.catalog.summary()
    }

    /// Price `inputs` and save them as a new product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Pricing` if the inputs fail validation.
    pub fn commit(
        &mut self,
        name: &str,
        category: Category,
        inputs: CostInputs,
    ) -> Result<Product> {
        let product = Product::create(name.trim(), category, inputs, Utc::now())?;
        self.catalog.insert(product.clone());
        self.save();
        tracing::info!(id = %product.id, name = %product.name, "Product saved");
        Ok(product)
    }

    /// Recompute and overwrite product `id`, keeping its creation time.
    ///
    /// If the product no longer exists it is saved as a new product and a
    /// warning notice is posted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Pricing` if the inputs fail validation.
    pub fn update(
        &mut self,
        id: &ProductId,
        name: &str,
        category: Category,
        inputs: CostInputs,
    ) -> Result<UpdateReport> {
        let now = Utc::now();
        let product = match self.catalog.get(id) {
            Some(existing) => existing.revise(name.trim(), category, inputs, now)?,
            None => Product::create(name.trim(), category, inputs, now)?,
        };

        let outcome = self.catalog.replace(product.clone());
        if outcome == ReplaceOutcome::Inserted {
            tracing::warn!(requested = %id, new_id = %product.id, "Edited product not found, saved as new");
            self.board.post(Notice::warning(format!(
                "Product {id} was not found; saved as a new product ({})",
                product.id
            )));
        } else {
            tracing::info!(id = %product.id, "Product updated");
        }
        self.save();

        Ok(UpdateReport { product, outcome })
    }

    /// Delete product `id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has `id`.
    pub fn delete(&mut self, id: &ProductId) -> Result<Product> {
        let removed = self
            .catalog
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
        self.save();
        tracing::info!(id = %id, "Product deleted");
        Ok(removed)
    }

    /// Hand product `id` to the calculator for editing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no product has `id`.
    pub fn begin_edit(&self, id: &ProductId, drafts: &DraftService) -> Result<CalculatorDraft> {
        let product = self.get(id)?;
        drafts.stash_edit(id);
        Ok(CalculatorDraft {
            product_name: product.name.clone(),
            category: product.category,
            inputs: product.inputs.clone(),
        })
    }

    fn save(&self) {
        persist(
            self.store.as_ref(),
            &self.board,
            keys::PRODUCTS,
            &self.catalog,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use tanuki_core::{MemoryStore, PricingError};

    use super::*;
    use crate::services::NoticeLevel;
    use crate::services::test_support::BrokenStore;

    fn inputs(base: i64) -> CostInputs {
        CostInputs {
            base_cost: Decimal::new(base, 0),
            ..CostInputs::default()
        }
    }

    fn fresh() -> (CatalogService, Arc<dyn KeyValueStore>, StatusBoard) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let board = StatusBoard::new();
        (
            CatalogService::load(store.clone(), board.clone()),
            store,
            board,
        )
    }

    #[test]
    fn test_commit_persists() {
        let (mut service, store, _) = fresh();
        let product = service
            .commit("  Taza 11oz ", Category::Ceramica, inputs(100))
            .unwrap();
        assert_eq!(product.name, "Taza 11oz");

        let reloaded = CatalogService::load(store, StatusBoard::new());
        assert_eq!(reloaded.get(&product.id).unwrap(), &product);
    }

    #[test]
    fn test_commit_rejects_full_commission() {
        let (mut service, _, _) = fresh();
        let bad = CostInputs {
            is_marketplace_sale: true,
            platform_commission_percent: Decimal::ONE_HUNDRED,
            ..inputs(10)
        };
        let err = service.commit("x", Category::Textil, bad).unwrap_err();
        assert!(matches!(
            err,
            AppError::Pricing(PricingError::CommissionOutOfRange(_))
        ));
        assert!(service.catalog().is_empty());
    }

    #[test]
    fn test_update_keeps_created_at() {
        let (mut service, _, board) = fresh();
        let original = service.commit("Gorra", Category::Gorras, inputs(50)).unwrap();

        let report = service
            .update(&original.id, "Gorra trucker", Category::Gorras, inputs(60))
            .unwrap();

        assert_eq!(report.outcome, ReplaceOutcome::Replaced);
        assert_eq!(report.product.id, original.id);
        assert_eq!(report.product.created_at, original.created_at);
        assert!(report.product.updated_at.is_some());
        assert_eq!(service.catalog().len(), 1);
        assert!(board.drain().is_empty());
    }

    #[test]
    fn test_update_missing_product_inserts_with_warning() {
        let (mut service, _, board) = fresh();
        let missing = ProductId::from("gone");

        let report = service
            .update(&missing, "Taza", Category::Ceramica, inputs(10))
            .unwrap();

        assert_eq!(report.outcome, ReplaceOutcome::Inserted);
        assert_ne!(report.product.id, missing);
        assert_eq!(service.catalog().len(), 1);
        let notices = board.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_delete() {
        let (mut service, _, _) = fresh();
        let product = service.commit("DTF A4", Category::Dtf, inputs(5)).unwrap();
        service.delete(&product.id).unwrap();
        assert!(matches!(
            service.delete(&product.id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_begin_edit_hands_off_product() {
        let (mut service, store, _) = fresh();
        let drafts = DraftService::new(store, StatusBoard::new());
        let product = service
            .commit("Placa", Category::Aluminio, inputs(30))
            .unwrap();

        let draft = service.begin_edit(&product.id, &drafts).unwrap();

        assert_eq!(draft.product_name, "Placa");
        assert_eq!(draft.inputs, product.inputs);
        assert_eq!(drafts.take_edit_handoff().unwrap().product_id, product.id);
    }

    #[test]
    fn test_storage_failure_keeps_session_catalog() {
        let board = StatusBoard::new();
        let mut service = CatalogService::load(Arc::new(BrokenStore), board.clone());
        let product = service.commit("Taza", Category::Ceramica, inputs(10)).unwrap();

        assert!(service.get(&product.id).is_ok());
        // Failed load plus failed save.
        assert_eq!(board.drain().len(), 2);
    }
}
