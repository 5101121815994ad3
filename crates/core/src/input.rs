//! Permissive numeric input coercion.
//!
//! Calculator fields never reject input: anything that does not parse as a
//! number becomes zero, the same way an empty form field does.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a user-entered number, falling back to zero.
///
/// Accepts plain and scientific notation and a single `,` as the decimal
/// separator (`"12,5"`).
#[must_use]
pub fn coerce_decimal(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        trimmed.replacen(',', ".", 1)
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .unwrap_or_else(|_| {
            tracing::debug!(input = %raw, "Unparseable number coerced to zero");
            Decimal::ZERO
        })
}

/// Like [`coerce_decimal`] but for optional fields; `None` stays `None`.
#[must_use]
pub fn coerce_optional(raw: Option<&str>) -> Option<Decimal> {
    raw.map(coerce_decimal)
}
