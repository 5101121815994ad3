//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are rendered with a fixed `es-AR` style: two decimals, `.` as the
//! thousands separator and `,` as the decimal separator.
//!
//! ```rust
//! # use rust_decimal::Decimal;
//! # use tanuki_core::{CurrencyCode, Price};
//! let price = Price::new(Decimal::new(1_234_567, 3), CurrencyCode::USD);
//! assert_eq!(price.display(), "$ 1.234,57");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A US dollar price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Convert a USD price into bolívares at `rate` bolívares per dollar.
    ///
    /// `None` if the converted amount does not fit in a `Decimal`.
    #[must_use]
    pub fn to_bolivares(&self, rate: Decimal) -> Option<Self> {
        self.amount
            .checked_mul(rate)
            .map(|amount| Self::new(amount, CurrencyCode::VES))
    }

    /// Format for display (e.g., `$ 19,99` or `Bs 1.234,50`).
    #[must_use]
    pub fn display(&self) -> String {
        let formatted = format_amount(self.amount);
        match formatted.strip_prefix('-') {
            Some(unsigned) => format!("-{} {unsigned}", self.currency_code.symbol()),
            None => format!("{} {formatted}", self.currency_code.symbol()),
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes used by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    /// Venezuelan bolívar.
    VES,
}

impl CurrencyCode {
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::VES => "Bs",
        }
    }

}

/// Format an amount with two decimals, `.` thousands and `,` decimals.
///
/// Midpoints round away from zero, matching browser `Intl` output.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let mut unsigned = rounded.abs();
    unsigned.rescale(2);
    let plain = unsigned.to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}
