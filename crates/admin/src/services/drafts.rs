//! Calculator draft and edit handoff persistence.

use std::sync::Arc;

use tanuki_core::store::keys;
use tanuki_core::{CalculatorDraft, EditHandoff, KeyValueStore, ProductId};

use super::{StatusBoard, forget, persist, restore};

/// Keeps the unsaved calculator form and the one-shot edit handoff.
pub struct DraftService {
    store: Arc<dyn KeyValueStore>,
    board: StatusBoard,
}

impl DraftService {
    pub fn new(store: Arc<dyn KeyValueStore>, board: StatusBoard) -> Self {
        Self { store, board }
    }

    #[must_use]
    pub fn load_draft(&self) -> Option<CalculatorDraft> {
        restore(self.store.as_ref(), &self.board, keys::CALCULATOR_DRAFT)
    }

    pub fn save_draft(&self, draft: &CalculatorDraft) -> bool {
        persist(self.store.as_ref(), &self.board, keys::CALCULATOR_DRAFT, draft)
    }

    pub fn clear_draft(&self) {
        forget(self.store.as_ref(), &self.board, keys::CALCULATOR_DRAFT);
    }

    /// Record which product the calculator should load for editing.
    pub fn stash_edit(&self, product_id: &ProductId) -> bool {
        let handoff = EditHandoff {
            product_id: product_id.clone(),
        };
        persist(self.store.as_ref(), &self.board, keys::EDITING_PRODUCT, &handoff)
    }

    /// Take the pending edit handoff, clearing it so it is consumed once.
    #[must_use]
    pub fn take_edit_handoff(&self) -> Option<EditHandoff> {
        let handoff = restore(self.store.as_ref(), &self.board, keys::EDITING_PRODUCT);
        if handoff.is_some() {
            forget(self.store.as_ref(), &self.board, keys::EDITING_PRODUCT);
        }
        handoff
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use tanuki_core::{Category, CostInputs, MemoryStore};

    use super::*;

    fn service() -> DraftService {
        DraftService::new(Arc::new(MemoryStore::new()), StatusBoard::new())
    }

    #[test]
    fn test_draft_round_trip_and_clear() {
        let drafts = service();
        assert_eq!(drafts.load_draft(), None);

        let draft = CalculatorDraft {
            product_name: "Remera Blanca Adulto".to_string(),
            category: Category::Textil,
            inputs: CostInputs {
                base_cost: Decimal::new(45, 1),
                ..CostInputs::default()
            },
        };
        assert!(drafts.save_draft(&draft));
        assert_eq!(drafts.load_draft(), Some(draft));

        drafts.clear_draft();
        assert_eq!(drafts.load_draft(), None);
    }

    #[test]
    fn test_edit_handoff_is_consumed_once() {
        let drafts = service();
        let id = ProductId::from("p-1");
        assert!(drafts.stash_edit(&id));

        assert_eq!(
            drafts.take_edit_handoff(),
            Some(EditHandoff { product_id: id })
        );
        assert_eq!(drafts.take_edit_handoff(), None);
    }
}
