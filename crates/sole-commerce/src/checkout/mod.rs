//! Checkout module.
//!
//! Payment methods, submission checks, the register form and the outbound
//! transaction payload.

mod form;
mod payload;
mod payment;
mod validate;

pub use form::{PrepareError, SaleForm};
pub use payload::{build_transaction_payload, Customer, PayloadProduct, TransactionPayload};
pub use payment::{CardType, PaymentMethod};
pub use validate::{validate_for_submission, ValidationError};
