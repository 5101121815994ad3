//! Pricing engine: raw cost inputs to a rounded sale price and net profit.
//!
//! The calculation runs in a fixed order, each stage feeding the next:
//!
//! 1. labor cost from production minutes at the hourly labor rate
//! 2. electricity cost from pressing seconds at the hourly electricity rate
//! 3. total manufacturing cost (direct + indirect)
//! 4. profit margin applied to the total
//! 5. marketplace commission gross-up (marketplace sales only)
//! 6. tax applied on top
//! 7. ceiling to the next whole currency unit
//! 8. platform fee charged on the rounded price
//! 9. net profit
//!
//! Everything here is a pure function of [`CostInputs`]. Hourly rates travel
//! inside the inputs; see [`crate::ShopSettings::seed_inputs`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);
const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Default labor cost per hour.
pub const DEFAULT_HOURLY_LABOR_RATE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);
/// Default electricity cost per hour of pressing.
pub const DEFAULT_HOURLY_ELECTRICITY_RATE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
/// Default profit margin percentage.
pub const DEFAULT_PROFIT_MARGIN_PERCENT: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
/// Default tax (IVA) percentage.
pub const DEFAULT_TAX_RATE_PERCENT: Decimal = Decimal::from_parts(21, 0, 0, false, 0);
/// Default marketplace commission percentage.
pub const DEFAULT_PLATFORM_COMMISSION_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Errors raised before a price is computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Commission must be in `[0, 100)` for a marketplace sale; at 100 % the
    /// gross-up divides by zero.
    #[error("platform commission must be at least 0 and below 100 percent, got {0}")]
    CommissionOutOfRange(Decimal),

    /// An intermediate amount does not fit in a `Decimal`.
    #[error("amounts are too large to price ({0} overflowed)")]
    Overflow(&'static str),
}

/// Inputs to a single pricing calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostInputs {
    /// Cost of the blank product (mug, shirt, cap...).
    pub base_cost: Decimal,
    pub transfer_paper_cost: Decimal,
    pub ink_cost: Decimal,
    pub packaging_cost: Decimal,
    /// Hands-on production time, in minutes.
    pub production_time_minutes: Decimal,
    /// Time on the heat press, in seconds.
    pub pressing_time_seconds: Decimal,
    pub hourly_labor_rate: Decimal,
    pub hourly_electricity_rate: Decimal,
    pub profit_margin_percent: Decimal,
    pub tax_rate_percent: Decimal,
    /// Sale goes through a marketplace that charges a commission.
    pub is_marketplace_sale: bool,
    pub platform_commission_percent: Decimal,
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            base_cost: Decimal::ZERO,
            transfer_paper_cost: Decimal::ZERO,
            ink_cost: Decimal::ZERO,
            packaging_cost: Decimal::ZERO,
            production_time_minutes: Decimal::ZERO,
            pressing_time_seconds: Decimal::ZERO,
            hourly_labor_rate: DEFAULT_HOURLY_LABOR_RATE,
            hourly_electricity_rate: DEFAULT_HOURLY_ELECTRICITY_RATE,
            profit_margin_percent: DEFAULT_PROFIT_MARGIN_PERCENT,
            tax_rate_percent: DEFAULT_TAX_RATE_PERCENT,
            is_marketplace_sale: false,
            platform_commission_percent: DEFAULT_PLATFORM_COMMISSION_PERCENT,
        }
    }
}

impl CostInputs {
    /// Check the inputs can be priced.
    ///
    /// Negative or zero costs are accepted and simply produce negative or
    /// zero outputs. Only the commission of a marketplace sale is checked.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::CommissionOutOfRange` for a marketplace sale
    /// whose commission is negative or at least 100 %.
    pub fn validate(&self) -> Result<(), PricingError> {
        let commission = self.platform_commission_percent;
        if self.is_marketplace_sale
            && (commission.is_sign_negative() || commission >= Decimal::ONE_HUNDRED)
        {
            return Err(PricingError::CommissionOutOfRange(commission));
        }
        Ok(())
    }

    /// Sum of the four direct material costs.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Overflow` if the sum does not fit in a `Decimal`.
    pub fn direct_costs(&self) -> Result<Decimal, PricingError> {
        self.base_cost
            .checked_add(self.transfer_paper_cost)
            .and_then(|sum| sum.checked_add(self.ink_cost))
            .and_then(|sum| sum.checked_add(self.packaging_cost))
            .ok_or(PricingError::Overflow("direct costs"))
    }
}

/// Output of a pricing calculation.
///
/// Never stored on its own; it is always derived from a [`CostInputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub labor_cost: Decimal,
    pub electricity_cost: Decimal,
    pub total_manufacturing_cost: Decimal,
    /// Total cost with the profit margin applied.
    pub price_with_margin: Decimal,
    /// Price after the marketplace gross-up, before tax.
    pub final_price: Decimal,
    /// Exact price with tax, before rounding up.
    pub price_before_rounding: Decimal,
    /// `price_before_rounding` rounded up to a whole unit.
    pub suggested_price: Decimal,
    /// Commission the marketplace keeps from `suggested_price`.
    pub platform_fee: Decimal,
    pub net_profit: Decimal,
}

impl PricingResult {
    /// Net profit as a percentage of the manufacturing cost.
    ///
    /// `None` when the manufacturing cost is zero or the ratio overflows.
    #[must_use]
    pub fn profitability_percent(&self) -> Option<Decimal> {
        if self.total_manufacturing_cost.is_zero() {
            return None;
        }
        self.net_profit
            .checked_div(self.total_manufacturing_cost)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }

    /// The sale loses money.
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.net_profit.is_sign_negative() && !self.net_profit.is_zero()
    }
}

/// Compute the price breakdown for `inputs`.
///
/// # Errors
///
/// Returns `PricingError` if [`CostInputs::validate`] fails, or
/// `PricingError::Overflow` if an amount grows past the `Decimal` range.
pub fn calculate(inputs: &CostInputs) -> Result<PricingResult, PricingError> {
    inputs.validate()?;

    let labor_cost = mul(
        "labor cost",
        inputs.production_time_minutes / MINUTES_PER_HOUR,
        inputs.hourly_labor_rate,
    )?;
    let electricity_cost = mul(
        "electricity cost",
        inputs.pressing_time_seconds / SECONDS_PER_HOUR,
        inputs.hourly_electricity_rate,
    )?;
    let total_manufacturing_cost = inputs
        .direct_costs()?
        .checked_add(labor_cost)
        .and_then(|sum| sum.checked_add(electricity_cost))
        .ok_or(PricingError::Overflow("manufacturing cost"))?;

    let price_with_margin = mul(
        "price with margin",
        total_manufacturing_cost,
        Decimal::ONE + percent(inputs.profit_margin_percent),
    )?;

    // Gross up so the seller still nets `price_with_margin` once the
    // marketplace takes its cut of the final price.
    let final_price = if inputs.is_marketplace_sale {
        price_with_margin
            .checked_div(Decimal::ONE - percent(inputs.platform_commission_percent))
            .ok_or(PricingError::Overflow("marketplace price"))?
    } else {
        price_with_margin
    };

    let price_before_rounding = mul(
        "price with tax",
        final_price,
        Decimal::ONE + percent(inputs.tax_rate_percent),
    )?;
    let suggested_price = price_before_rounding.ceil();

    let platform_fee = if inputs.is_marketplace_sale {
        mul(
            "platform fee",
            suggested_price,
            percent(inputs.platform_commission_percent),
        )?
    } else {
        Decimal::ZERO
    };
    let net_profit = suggested_price
        .checked_sub(total_manufacturing_cost)
        .and_then(|profit| profit.checked_sub(platform_fee))
        .ok_or(PricingError::Overflow("net profit"))?;

    Ok(PricingResult {
        labor_cost,
        electricity_cost,
        total_manufacturing_cost,
        price_with_margin,
        final_price,
        price_before_rounding,
        suggested_price,
        platform_fee,
        net_profit,
    })
}

fn mul(stage: &'static str, a: Decimal, b: Decimal) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or(PricingError::Overflow(stage))
}

fn percent(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}
