//! Catalog, settings and draft persistence across sessions.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use serde_json::json;
use tanuki_admin::services::NoticeLevel;
use tanuki_core::store::keys;
use tanuki_core::{
    CalculatorDraft, Category, CostInputs, ProductId, ReplaceOutcome, ShopSettings,
};
use tanuki_integration_tests::TestContext;

fn example_inputs() -> CostInputs {
    CostInputs {
        base_cost: Decimal::new(100, 0),
        transfer_paper_cost: Decimal::new(20, 0),
        ink_cost: Decimal::new(15, 0),
        production_time_minutes: Decimal::new(30, 0),
        pressing_time_seconds: Decimal::new(60, 0),
        ..CostInputs::default()
    }
}

#[tokio::test]
async fn test_committed_product_is_stored_in_camel_case() {
    let ctx = TestContext::new().await;
    let state = ctx.open();

    let product = state
        .catalog()
        .lock()
        .await
        .commit("Remera Blanca", Category::Textil, example_inputs())
        .unwrap();

    let stored = ctx.stored(keys::PRODUCTS).unwrap();
    let first = &stored[0];
    assert_eq!(first["id"], json!(product.id.as_str()));
    assert_eq!(first["category"], json!("Textil"));
    let suggested: Decimal = first["result"]["suggestedPrice"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(suggested, Decimal::new(609, 0));
    assert_eq!(first["inputs"]["isMarketplaceSale"], json!(false));
    assert!(first["createdAt"].is_string());

    let next_session = ctx.open();
    let catalog = next_session.catalog().lock().await;
    assert_eq!(catalog.get(&product.id).unwrap(), &product);
}

#[tokio::test]
async fn test_edit_round_trip_through_handoff() {
    let ctx = TestContext::new().await;
    let original = {
        let state = ctx.open();
        let mut catalog = state.catalog().lock().await;
        let product = catalog
            .commit("Taza 11oz", Category::Ceramica, example_inputs())
            .unwrap();
        let draft = catalog.begin_edit(&product.id, state.drafts()).unwrap();
        state.drafts().save_draft(&draft);
        product
    };

    // The calculator opens in a later session.
    let state = ctx.open();
    let handoff = state.drafts().take_edit_handoff().unwrap();
    assert_eq!(handoff.product_id, original.id);
    assert!(ctx.stored(keys::EDITING_PRODUCT).is_none());

    let mut draft = state.drafts().load_draft().unwrap();
    draft.inputs.is_marketplace_sale = true;

    let report = state
        .catalog()
        .lock()
        .await
        .update(
            &handoff.product_id,
            &draft.product_name,
            draft.category,
            draft.inputs,
        )
        .unwrap();

    assert_eq!(report.outcome, ReplaceOutcome::Replaced);
    assert_eq!(report.product.created_at, original.created_at);
    assert_eq!(report.product.result.suggested_price, Decimal::new(716, 0));
    assert_eq!(report.product.result.platform_fee, Decimal::new(1074, 1));
}

#[tokio::test]
async fn test_update_of_deleted_product_inserts_new() {
    let ctx = TestContext::new().await;
    let state = ctx.open();
    let mut catalog = state.catalog().lock().await;
    let product = catalog
        .commit("Gorra", Category::Gorras, example_inputs())
        .unwrap();
    catalog.delete(&product.id).unwrap();

    let report = catalog
        .update(&product.id, "Gorra", Category::Gorras, example_inputs())
        .unwrap();

    assert_eq!(report.outcome, ReplaceOutcome::Inserted);
    assert_ne!(report.product.id, product.id);
    let notices = state.board().drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(ctx.stored(keys::PRODUCTS).unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_legacy_blob_with_numeric_fields_loads() {
    let ctx = TestContext::new().await;
    ctx.seed(
        keys::PRODUCTS,
        &json!([{
            "id": "1718030000000-k3j9x2m1q",
            "name": "Placa aluminio 20x30",
            "category": "Aluminio",
            "inputs": {
                "baseCost": 80, "transferPaperCost": 10, "inkCost": 5,
                "packagingCost": 0, "productionTimeMinutes": 15,
                "pressingTimeSeconds": 90, "hourlyLaborRate": 500,
                "hourlyElectricityRate": 100, "profitMarginPercent": 30,
                "taxRatePercent": 21, "isMarketplaceSale": false,
                "platformCommissionPercent": 15
            },
            "result": {
                "laborCost": 125, "electricityCost": 2.5,
                "totalManufacturingCost": 222.5, "priceWithMargin": 289.25,
                "finalPrice": 289.25, "priceBeforeRounding": 349.9925,
                "suggestedPrice": 350, "platformFee": 0, "netProfit": 66.75
            },
            "createdAt": "2024-06-10T14:33:20.000Z"
        }]),
    );
    ctx.seed(
        keys::SETTINGS,
        &json!({"hourlyRate": 650, "electricityCostPerHour": 90}),
    );

    let state = ctx.open();

    let catalog = state.catalog().lock().await;
    let product = catalog.get(&ProductId::from("1718030000000-k3j9x2m1q")).unwrap();
    assert_eq!(product.category, Category::Aluminio);
    assert_eq!(product.result.suggested_price, Decimal::new(350, 0));
    assert!(product.updated_at.is_none());
    assert_eq!(
        state.settings().lock().await.current(),
        &ShopSettings {
            hourly_rate: Decimal::new(650, 0),
            electricity_cost_per_hour: Decimal::new(90, 0),
        }
    );
    assert!(state.board().drain().is_empty());
}

#[tokio::test]
async fn test_settings_seed_new_calculations() {
    let ctx = TestContext::new().await;
    {
        let state = ctx.open();
        state.settings().lock().await.save(ShopSettings {
            hourly_rate: Decimal::new(600, 0),
            electricity_cost_per_hour: Decimal::new(120, 0),
        });
    }

    let state = ctx.open();
    let inputs = state.settings().lock().await.current().seed_inputs();
    assert_eq!(inputs.hourly_labor_rate, Decimal::new(600, 0));
    assert_eq!(inputs.hourly_electricity_rate, Decimal::new(120, 0));
}

#[tokio::test]
async fn test_draft_survives_restart_until_cleared() {
    let ctx = TestContext::new().await;
    let draft = CalculatorDraft {
        product_name: "Sticker DTF".to_string(),
        category: Category::Dtf,
        inputs: example_inputs(),
    };
    ctx.open().drafts().save_draft(&draft);

    let state = ctx.open();
    assert_eq!(state.drafts().load_draft(), Some(draft));
    state.drafts().clear_draft();

    assert_eq!(ctx.open().drafts().load_draft(), None);
}
