//! Pre-submission checks.

use crate::cart::{parse_override, Cart};
use crate::checkout::{CardType, PaymentMethod};
use crate::money::Money;
use thiserror::Error;

/// Reason a sale cannot be submitted yet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("No payment method selected")]
    MissingPaymentMethod,

    #[error("Card payments need a card type")]
    MissingCardType,

    #[error("Total must be a number between 0 and the subtotal")]
    InvalidOverrideTotal,
}

/// Check that a sale is ready to submit.
///
/// Unlike the totals calculation, submission requires an explicit total:
/// an empty override is rejected here.
pub fn validate_for_submission(
    cart: &Cart,
    payment_method: Option<PaymentMethod>,
    card_type: Option<CardType>,
    new_total_input: &str,
    subtotal: Money,
) -> Result<(), ValidationError> {
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    let method = payment_method.ok_or(ValidationError::MissingPaymentMethod)?;
    if method.requires_card_type() && card_type.is_none() {
        return Err(ValidationError::MissingCardType);
    }

    match parse_override(new_total_input, subtotal) {
        Ok(Some(_)) => Ok(()),
        Ok(None) | Err(_) => Err(ValidationError::InvalidOverrideTotal),
    }
}
