//! Calculator form state that survives between sessions.

use serde::{Deserialize, Serialize};

use crate::pricing::CostInputs;
use crate::types::{Category, ProductId};

/// Unsaved calculator form contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorDraft {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub category: Category,
    pub inputs: CostInputs,
}

/// Handoff from the catalog to the calculator: which product to load for
/// editing. Read once, then cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditHandoff {
    pub product_id: ProductId,
}
