//! Register form state for one sale.

use crate::cart::{totals_for_subtotal, Cart, TotalsOutcome};
use crate::checkout::{
    build_transaction_payload, validate_for_submission, CardType, Customer, PaymentMethod,
    TransactionPayload, ValidationError,
};
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Everything the operator fills in besides the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SaleForm {
    pub customer: Customer,
    pub payment_method: Option<PaymentMethod>,
    pub card_type: Option<CardType>,
    pub notes: String,
    /// Raw text of the total override field.
    pub new_total: String,
}

impl SaleForm {
    /// Reset every field after a successful sale.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Totals for `cart` using this form's override field.
    pub fn totals(&self, cart: &Cart) -> Result<TotalsOutcome, CommerceError> {
        Ok(totals_for_subtotal(cart.subtotal()?, &self.new_total))
    }

    /// Validate against `cart` and build the payload.
    pub fn prepare(&self, cart: &Cart) -> Result<TransactionPayload, PrepareError> {
        let subtotal = cart.subtotal()?;
        validate_for_submission(
            cart,
            self.payment_method,
            self.card_type,
            &self.new_total,
            subtotal,
        )?;

        let totals = totals_for_subtotal(subtotal, &self.new_total).totals;
        let method = self
            .payment_method
            .ok_or(ValidationError::MissingPaymentMethod)?;

        Ok(build_transaction_payload(
            cart,
            &self.customer,
            method,
            self.card_type,
            Some(&self.notes),
            totals.discount,
        ))
    }
}

/// Why a sale could not be turned into a payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),
}
