//! Sellable unit type.

use crate::ids::UnitCode;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A sellable, uniquely coded instance of a product variant.
///
/// One physical pair of shoes carries one unit code; every unit shares the
/// product's pricing and stock figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    /// Parent product identifier.
    pub product_id: i64,
    /// Product display name.
    pub product_name: String,
    /// Brand name.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Colorway.
    pub color: String,
    /// Size label (e.g., "42" or "42.5").
    pub size: String,
    /// Unit code, the cart de-duplication key.
    pub unit_code: UnitCode,
    /// Regular selling price.
    pub selling_price: Money,
    /// Discounted price; when present it is the effective price.
    pub discount_price: Option<Money>,
    /// Stock level of the parent product.
    pub stock: i64,
    /// Whether the unit can currently be sold.
    pub is_active: bool,
}

impl Unit {
    /// Price charged per item: the discount price when set, else the selling price.
    pub fn effective_price(&self) -> Money {
        self.discount_price.unwrap_or(self.selling_price)
    }

    /// Check if the unit has stock left.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check if the unit may be added to a cart.
    pub fn is_sellable(&self) -> bool {
        self.is_active && self.in_stock()
    }

    /// One-line label used in listings (e.g., "NikeCo Runner 42 / Black").
    pub fn label(&self) -> String {
        let mut label = format!("{} {}", self.brand, self.model);
        if !self.size.is_empty() {
            label.push(' ');
            label.push_str(&self.size);
        }
        if !self.color.is_empty() {
            label.push_str(" / ");
            label.push_str(&self.color);
        }
        label
    }
}

/// Strip quotes and line breaks from a catalog string.
///
/// Product data is typed by staff on the back office and regularly carries
/// stray quotes or pasted newlines that break receipts and search.
pub fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '"' | '\'' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string()
}
