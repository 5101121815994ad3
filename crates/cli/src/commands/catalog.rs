//! Catalog commands.

use std::io::Write;

use clap::Subcommand;
use tanuki_admin::AppState;
use tanuki_admin::rates::RateSource;
use tanuki_core::{Price, Product, ProductId, format_amount};

use super::{CommandResult, RatePair, with_bolivares};

#[derive(Debug, Subcommand)]
pub enum CatalogAction {
    /// List saved products, newest first
    List,
    /// Show one product's cost breakdown
    Show {
        /// Product ID
        id: String,
    },
    /// Load a product into the calculator for editing
    Edit {
        /// Product ID
        id: String,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
    /// Averages across the catalog
    Summary,
}

/// Run a catalog command.
///
/// # Errors
///
/// Returns an error if the product does not exist or output cannot be written.
pub async fn run<S: RateSource>(
    state: &AppState<S>,
    action: CatalogAction,
    out: &mut impl Write,
) -> CommandResult {
    match action {
        CatalogAction::List => {
            let catalog = state.catalog().lock().await;
            let products = catalog.list();
            if products.is_empty() {
                writeln!(out, "No saved products")?;
            }
            for product in products {
                writeln!(
                    out,
                    "{}  {:<28} {:<10} {:>14}  {}",
                    product.id,
                    product.name,
                    product.category,
                    Price::usd(product.result.suggested_price).to_string(),
                    product.created_at.format("%Y-%m-%d")
                )?;
            }
        }
        CatalogAction::Show { id } => {
            let rates = RatePair::current(state).await;
            let catalog = state.catalog().lock().await;
            let product = catalog.get(&ProductId::new(id))?;
            write_product(product, rates, out)?;
        }
        CatalogAction::Edit { id } => {
            let catalog = state.catalog().lock().await;
            let draft = catalog.begin_edit(&ProductId::new(id), state.drafts())?;
            state.drafts().save_draft(&draft);
            writeln!(
                out,
                "Loaded \"{}\" into the calculator. Adjust it with `tanuki calc` and store it with `tanuki calc --save`.",
                draft.product_name
            )?;
        }
        CatalogAction::Delete { id } => {
            let removed = state
                .catalog()
                .lock()
                .await
                .delete(&ProductId::new(id))?;
            writeln!(out, "Deleted \"{}\"", removed.name)?;
        }
        CatalogAction::Summary => {
            let summary = state.catalog().lock().await.summary();
            writeln!(out, "{:<24}{}", "Products", summary.product_count)?;
            writeln!(
                out,
                "{:<24}{}",
                "Average suggested price",
                Price::usd(summary.average_suggested_price)
            )?;
            writeln!(
                out,
                "{:<24}{}",
                "Average net profit",
                Price::usd(summary.average_net_profit)
            )?;
            writeln!(out, "{:<24}{}", "Selling at a loss", summary.loss_making)?;
        }
    }
    Ok(())
}

fn write_product(product: &Product, rates: RatePair, out: &mut impl Write) -> std::io::Result<()> {
    let result = &product.result;
    writeln!(out, "{} ({})", product.name, product.category)?;
    writeln!(out, "{:<22}{}", "ID", product.id)?;
    writeln!(out, "{:<22}{}", "Created", product.created_at.to_rfc3339())?;
    if let Some(updated_at) = product.updated_at {
        writeln!(out, "{:<22}{}", "Updated", updated_at.to_rfc3339())?;
    }
    writeln!(
        out,
        "{:<22}{}",
        "Sale",
        if product.inputs.is_marketplace_sale {
            "marketplace"
        } else {
            "direct"
        }
    )?;
    writeln!(
        out,
        "{:<22}{}",
        "Manufacturing cost",
        Price::usd(result.total_manufacturing_cost)
    )?;
    writeln!(
        out,
        "{:<22}{}",
        "Suggested price",
        with_bolivares(result.suggested_price, rates)
    )?;
    writeln!(out, "{:<22}{}", "Net profit", Price::usd(result.net_profit))?;
    if let Some(percent) = result.profitability_percent() {
        writeln!(out, "{:<22}{} %", "Profitability", format_amount(percent))?;
    }
    Ok(())
}
