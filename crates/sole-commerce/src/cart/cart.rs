//! Cart and cart item types.

use crate::catalog::Unit;
use crate::error::CommerceError;
use crate::ids::UnitCode;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Why a unit was not added to the cart. The cart is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartRejection {
    /// The unit code is already in the cart.
    #[error("Unit {0} is already in the cart")]
    DuplicateUnit(UnitCode),

    /// The unit has no stock left.
    #[error("Unit {0} is out of stock")]
    OutOfStock(UnitCode),

    /// The unit is not active.
    #[error("Unit {0} is inactive")]
    InactiveUnit(UnitCode),
}

/// A unit in the cart.
///
/// Holds a copy of the unit as it was when added, so later catalog
/// refreshes do not change what the operator already rang up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Snapshot of the unit.
    pub unit: Unit,
    /// Quantity, always positive.
    pub quantity: u32,
}

impl CartItem {
    /// Price per item.
    pub fn unit_price(&self) -> Money {
        self.unit.effective_price()
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price()
            .try_multiply(i64::from(self.quantity))
            .ok_or(CommerceError::Overflow)
    }
}

/// An ordered cart; insertion order is display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<CartItem>,
    /// Cart currency.
    pub currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Add a unit with quantity 1.
    ///
    /// Returns the index of the new item. Rejects duplicates by unit code
    /// (ignoring case), units without stock and inactive units.
    pub fn add_unit(&mut self, unit: &Unit) -> Result<usize, CartRejection> {
        if self.contains(&unit.unit_code) {
            return Err(CartRejection::DuplicateUnit(unit.unit_code.clone()));
        }
        if !unit.in_stock() {
            return Err(CartRejection::OutOfStock(unit.unit_code.clone()));
        }
        if !unit.is_active {
            return Err(CartRejection::InactiveUnit(unit.unit_code.clone()));
        }

        self.items.push(CartItem {
            unit: unit.clone(),
            quantity: 1,
        });
        Ok(self.items.len() - 1)
    }

    /// Remove the item at `index`. Returns `None` if the index is out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<CartItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Check if a unit code is already in the cart.
    pub fn contains(&self, code: &UnitCode) -> bool {
        self.items.iter().any(|i| &i.unit.unit_code == code)
    }

    /// Remove every item whose code is in `codes`. Returns how many were removed.
    pub fn remove_units(&mut self, codes: &[UnitCode]) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !codes.contains(&i.unit.unit_code));
        before - self.items.len()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of distinct units.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of effective price times quantity over all items.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.items.iter().try_fold(Money::zero(self.currency), |acc, item| {
            let line = item.line_total()?;
            if line.currency != self.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.currency.code().to_string(),
                    got: line.currency.code().to_string(),
                });
            }
            acc.try_add(&line).ok_or(CommerceError::Overflow)
        })
    }
}

/// A cart shared between concurrent input sources.
///
/// Scanner events and taps can arrive back to back. Every mutation takes the
/// lock for its whole check-then-insert step and never awaits while holding
/// it, so two adds of the same unit can never both pass the duplicate check.
#[derive(Debug, Clone, Default)]
pub struct SharedCart {
    inner: Arc<Mutex<Cart>>,
}

impl SharedCart {
    /// Wrap a cart.
    pub fn new(cart: Cart) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cart)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // A panic mid-mutation cannot leave a half-inserted item behind, so
        // the data is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a unit; see [`Cart::add_unit`].
    pub fn add_unit(&self, unit: &Unit) -> Result<usize, CartRejection> {
        self.lock().add_unit(unit)
    }

    /// Remove the item at `index`; see [`Cart::remove_at`].
    pub fn remove_at(&self, index: usize) -> Option<CartItem> {
        self.lock().remove_at(index)
    }

    /// Remove the given units; see [`Cart::remove_units`].
    pub fn remove_units(&self, codes: &[UnitCode]) -> usize {
        self.lock().remove_units(codes)
    }

    /// Copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Number of distinct units.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
