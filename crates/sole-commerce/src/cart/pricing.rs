//! Cart totals with an operator-entered total override.
//!
//! The register lets the operator type the amount the customer actually
//! pays. Anything between zero and the subtotal is accepted and the gap is
//! booked as the transaction discount.

use crate::cart::Cart;
use crate::error::CommerceError;
use crate::money::{parse_decimal, Currency, Money};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an override total was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverrideRejection {
    /// Not a finite decimal number.
    #[error("Total {0:?} is not a number")]
    Unparsable(String),

    /// Below zero.
    #[error("Total cannot be negative")]
    Negative,

    /// Above the subtotal; clamped down to it.
    #[error("Total {input} exceeds subtotal {subtotal}")]
    ExceedsSubtotal { input: String, subtotal: Money },
}

/// Money breakdown of a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of effective price times quantity.
    pub subtotal: Money,
    /// `subtotal - total`, never negative.
    pub discount: Money,
    /// Amount to be paid.
    pub total: Money,
}

impl CartTotals {
    /// Totals with no override: pay the subtotal.
    pub fn at_subtotal(subtotal: Money) -> Self {
        Self {
            subtotal,
            discount: Money::zero(subtotal.currency),
            total: subtotal,
        }
    }

    /// Check if a discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.amount_minor > 0
    }
}

/// Result of [`compute_totals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsOutcome {
    /// The computed totals.
    pub totals: CartTotals,
    /// Set when the override input was rejected.
    pub rejection: Option<OverrideRejection>,
    /// What the override field should show now: the accepted input, the
    /// clamped subtotal, or `None` when the field is empty or was cleared.
    pub override_input: Option<String>,
}

/// Parse an override total against a subtotal.
///
/// Returns `Ok(None)` for an empty input, which means "no override".
pub fn parse_override(
    input: &str,
    subtotal: Money,
) -> Result<Option<Money>, OverrideRejection> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Compare before rounding to the minor unit.
    let value =
        parse_decimal(trimmed).map_err(|_| OverrideRejection::Unparsable(trimmed.to_string()))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(OverrideRejection::Negative);
    }
    if value > subtotal.to_decimal() {
        return Err(OverrideRejection::ExceedsSubtotal {
            input: trimmed.to_string(),
            subtotal,
        });
    }

    let value = Money::from_decimal(value, subtotal.currency)
        .map_err(|_| OverrideRejection::Unparsable(trimmed.to_string()))?;
    Ok(Some(value))
}

/// Compute subtotal, discount and total for a cart and an override input.
///
/// A rejected override never changes the money: the total falls back to the
/// subtotal and the rejection is reported alongside.
pub fn compute_totals(cart: &Cart, new_total_input: &str) -> Result<TotalsOutcome, CommerceError> {
    let subtotal = cart.subtotal()?;
    Ok(totals_for_subtotal(subtotal, new_total_input))
}

/// [`compute_totals`] for an already known subtotal.
pub fn totals_for_subtotal(subtotal: Money, new_total_input: &str) -> TotalsOutcome {
    match parse_override(new_total_input, subtotal) {
        Ok(None) => TotalsOutcome {
            totals: CartTotals::at_subtotal(subtotal),
            rejection: None,
            override_input: None,
        },
        Ok(Some(total)) => TotalsOutcome {
            totals: CartTotals {
                subtotal,
                discount: discount_between(subtotal, total),
                total,
            },
            rejection: None,
            override_input: Some(new_total_input.trim().to_string()),
        },
        Err(rejection @ OverrideRejection::ExceedsSubtotal { .. }) => TotalsOutcome {
            totals: CartTotals::at_subtotal(subtotal),
            rejection: Some(rejection),
            override_input: Some(subtotal.to_input_string()),
        },
        Err(rejection) => TotalsOutcome {
            totals: CartTotals::at_subtotal(subtotal),
            rejection: Some(rejection),
            override_input: None,
        },
    }
}

fn discount_between(subtotal: Money, total: Money) -> Money {
    subtotal
        .saturating_difference(&total)
        .unwrap_or_else(|| Money::zero(subtotal.currency))
}

/// Zero totals for an empty cart in the given currency.
pub fn empty_totals(currency: Currency) -> CartTotals {
    CartTotals::at_subtotal(Money::zero(currency))
}
