//! Shop-wide cost settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{CostInputs, DEFAULT_HOURLY_ELECTRICITY_RATE, DEFAULT_HOURLY_LABOR_RATE};

/// Rates configured once in the settings panel and injected into every
/// calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    /// Labor cost per hour.
    pub hourly_rate: Decimal,
    /// Electricity cost per hour of heat-press use.
    pub electricity_cost_per_hour: Decimal,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_LABOR_RATE,
            electricity_cost_per_hour: DEFAULT_HOURLY_ELECTRICITY_RATE,
        }
    }
}

impl ShopSettings {
    /// Default calculator inputs carrying these rates.
    #[must_use]
    pub fn seed_inputs(&self) -> CostInputs {
        let mut inputs = CostInputs::default();
        self.apply_to(&mut inputs);
        inputs
    }

    /// Overwrite the hourly rates of `inputs` with these settings.
    pub const fn apply_to(&self, inputs: &mut CostInputs) {
        inputs.hourly_labor_rate = self.hourly_rate;
        inputs.hourly_electricity_rate = self.electricity_cost_per_hour;
    }
}
