//! Point-of-sale domain types and logic for a footwear store.
//!
//! This crate is pure: no network and no storage. It provides:
//!
//! - **Catalog**: sellable units and barcode/QR scan resolution
//! - **Search**: client-side brand/search/size filtering and pagination
//! - **Cart**: de-duplicated cart, totals with an operator override price
//! - **Checkout**: submission checks and the outbound transaction payload
//! - **Invoice**: UTC+7 invoice numbers and display dates
//!
//! # Example
//!
//! ```rust,ignore
//! use sole_commerce::prelude::*;
//!
//! let mut cart = Cart::new(Currency::IDR);
//! cart.add_unit(&unit)?;
//!
//! let outcome = compute_totals(&cart, "75000")?;
//! println!("Total: {}", outcome.totals.total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod invoice;
pub mod search;

pub use error::CommerceError;
pub use ids::UnitCode;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{compute_totals, Cart, CartItem, CartRejection, CartTotals, SharedCart};
    pub use crate::catalog::{resolve_scanned_code, ScannedCode, Unit};
    pub use crate::checkout::{
        build_transaction_payload, validate_for_submission, CardType, Customer, PaymentMethod,
        SaleForm, TransactionPayload, ValidationError,
    };
    pub use crate::error::CommerceError;
    pub use crate::ids::UnitCode;
    pub use crate::invoice::{format_display_date, format_invoice_number};
    pub use crate::money::{Currency, Money};
    pub use crate::search::{filter_catalog, paginate, CatalogFilter};
}
