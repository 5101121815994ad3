//! Pricing calculator command.
//!
//! The calculator form lives in the saved draft: each run starts from the
//! draft (or from the shop settings when there is none), applies the flags
//! given on the command line, prints the breakdown and saves the draft
//! again. `--save` commits the result to the catalog, or updates the
//! product handed over by `tanuki catalog edit`.

use std::io::Write;

use clap::Args;
use rust_decimal::Decimal;
use tanuki_admin::rates::RateSource;
use tanuki_admin::{AppError, AppState};
use tanuki_core::{
    CalculatorDraft, Category, CostInputs, Price, PricingResult, ReplaceOutcome, calculate,
    coerce_optional, format_amount,
};

use super::{CommandResult, RatePair, with_bolivares};

/// Cost and pricing flags. Values are parsed permissively; anything that
/// is not a number counts as zero.
#[derive(Debug, Default, Args)]
pub struct CostFlags {
    /// Blank item cost
    #[arg(long)]
    pub base_cost: Option<String>,
    /// Transfer paper cost
    #[arg(long)]
    pub paper: Option<String>,
    /// Ink cost
    #[arg(long)]
    pub ink: Option<String>,
    /// Packaging cost
    #[arg(long)]
    pub packaging: Option<String>,
    /// Production time in minutes
    #[arg(long)]
    pub minutes: Option<String>,
    /// Pressing time in seconds
    #[arg(long)]
    pub seconds: Option<String>,
    /// Hourly labor rate
    #[arg(long)]
    pub labor_rate: Option<String>,
    /// Hourly electricity rate
    #[arg(long)]
    pub electricity_rate: Option<String>,
    /// Profit margin percent
    #[arg(long)]
    pub margin: Option<String>,
    /// Tax rate percent
    #[arg(long)]
    pub tax: Option<String>,
    /// Price for a marketplace sale
    #[arg(long, conflicts_with = "direct")]
    pub marketplace: bool,
    /// Price for a direct sale
    #[arg(long)]
    pub direct: bool,
    /// Marketplace commission percent
    #[arg(long)]
    pub commission: Option<String>,
}

impl CostFlags {
    /// Overwrite the fields of `inputs` that were given on the command line.
    pub fn apply_to(&self, inputs: &mut CostInputs) {
        let fields = [
            (&self.base_cost, &mut inputs.base_cost),
            (&self.paper, &mut inputs.transfer_paper_cost),
            (&self.ink, &mut inputs.ink_cost),
            (&self.packaging, &mut inputs.packaging_cost),
            (&self.minutes, &mut inputs.production_time_minutes),
            (&self.seconds, &mut inputs.pressing_time_seconds),
            (&self.labor_rate, &mut inputs.hourly_labor_rate),
            (&self.electricity_rate, &mut inputs.hourly_electricity_rate),
            (&self.margin, &mut inputs.profit_margin_percent),
            (&self.tax, &mut inputs.tax_rate_percent),
            (&self.commission, &mut inputs.platform_commission_percent),
        ];
        for (flag, field) in fields {
            if let Some(value) = coerce_optional(flag.as_deref()) {
                *field = value;
            }
        }

        if self.marketplace {
            inputs.is_marketplace_sale = true;
        } else if self.direct {
            inputs.is_marketplace_sale = false;
        }
    }
}

#[derive(Debug, Args)]
pub struct CalcArgs {
    #[command(flatten)]
    pub costs: CostFlags,

    /// Product name
    #[arg(long)]
    pub name: Option<String>,

    /// Product category (textil, ceramica, aluminio, gorras, dtf)
    #[arg(long)]
    pub category: Option<Category>,

    /// Save the result to the catalog
    #[arg(long)]
    pub save: bool,

    /// Discard the saved draft and start from the shop settings
    #[arg(long)]
    pub reset: bool,
}

/// Run the calculator.
///
/// # Errors
///
/// Returns an error if the inputs cannot be priced, if `--save` is given
/// without a product name, or if output cannot be written.
pub async fn run<S: RateSource>(
    state: &AppState<S>,
    args: CalcArgs,
    out: &mut impl Write,
) -> CommandResult {
    let drafts = state.drafts();
    if args.reset {
        drafts.clear_draft();
    }

    let seed = state.settings().lock().await.current().seed_inputs();
    let mut draft = drafts.load_draft().unwrap_or_else(|| CalculatorDraft {
        inputs: seed,
        ..CalculatorDraft::default()
    });

    args.costs.apply_to(&mut draft.inputs);
    if let Some(name) = args.name {
        draft.product_name = name;
    }
    if let Some(category) = args.category {
        draft.category = category;
    }

    let result = calculate(&draft.inputs)?;
    let materials = draft.inputs.direct_costs()?;
    let rates = RatePair::current(state).await;
    write_breakdown(&draft, materials, &result, rates, out)?;

    if !args.save {
        drafts.save_draft(&draft);
        return Ok(());
    }

    if draft.product_name.trim().is_empty() {
        drafts.save_draft(&draft);
        return Err(
            AppError::BadRequest("a product name is required to save (--name)".to_string()).into(),
        );
    }

    let mut catalog = state.catalog().lock().await;
    match drafts.take_edit_handoff() {
        Some(handoff) => {
            let report = catalog.update(
                &handoff.product_id,
                &draft.product_name,
                draft.category,
                draft.inputs.clone(),
            )?;
            match report.outcome {
                ReplaceOutcome::Replaced => {
                    writeln!(out, "Updated product {}", report.product.id)?;
                }
                ReplaceOutcome::Inserted => {
                    writeln!(out, "Saved as new product {}", report.product.id)?;
                }
            }
        }
        None => {
            let product =
                catalog.commit(&draft.product_name, draft.category, draft.inputs.clone())?;
            writeln!(out, "Saved product {}", product.id)?;
        }
    }
    drafts.clear_draft();

    Ok(())
}

fn write_breakdown(
    draft: &CalculatorDraft,
    materials: Decimal,
    result: &PricingResult,
    rates: RatePair,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let inputs = &draft.inputs;
    let money = |amount: Decimal| Price::usd(amount).to_string();

    if !draft.product_name.is_empty() {
        writeln!(out, "{} ({})", draft.product_name, draft.category)?;
    }
    writeln!(out, "{:<22}{}", "Materials", money(materials))?;
    writeln!(out, "{:<22}{}", "Labor", money(result.labor_cost))?;
    writeln!(out, "{:<22}{}", "Electricity", money(result.electricity_cost))?;
    writeln!(
        out,
        "{:<22}{}",
        "Manufacturing cost",
        money(result.total_manufacturing_cost)
    )?;
    writeln!(out, "{:<22}{}", "Price with margin", money(result.price_with_margin))?;
    if inputs.is_marketplace_sale {
        writeln!(out, "{:<22}{}", "Marketplace price", money(result.final_price))?;
    }
    writeln!(out, "{:<22}{}", "Price with tax", money(result.price_before_rounding))?;
    writeln!(
        out,
        "{:<22}{}",
        "Suggested price",
        with_bolivares(result.suggested_price, rates)
    )?;
    if inputs.is_marketplace_sale {
        writeln!(
            out,
            "{:<22}{} ({} %)",
            "Platform fee",
            money(result.platform_fee),
            format_amount(inputs.platform_commission_percent)
        )?;
    }
    writeln!(out, "{:<22}{}", "Net profit", money(result.net_profit))?;
    if let Some(percent) = result.profitability_percent() {
        writeln!(out, "{:<22}{} %", "Profitability", format_amount(percent))?;
    }
    if result.is_loss() {
        writeln!(out, "warning: this price does not cover the production cost")?;
    }
    Ok(())
}
