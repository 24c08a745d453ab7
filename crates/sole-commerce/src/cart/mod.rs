//! Cart module.
//!
//! Contains the cart, its items, and totals with an override price.

mod cart;
mod pricing;

pub use cart::{Cart, CartItem, CartRejection, SharedCart};
pub use pricing::{
    compute_totals, empty_totals, parse_override, totals_for_subtotal, CartTotals,
    OverrideRejection, TotalsOutcome,
};
