//! Lenient wire records for API responses.
//!
//! The back office serializes decimals as strings and flags as booleans or
//! integers depending on the endpoint, so the records here accept either.

use serde::Deserialize;
use serde_json::{Number, Value};
use sole_commerce::catalog::{sanitize_text, Unit};
use sole_commerce::{CommerceError, Currency, Money, UnitCode};

/// A decimal amount sent as a string or a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    Text(String),
    Number(Number),
}

impl WireAmount {
    pub fn to_money(&self, currency: Currency) -> Result<Money, CommerceError> {
        match self {
            Self::Text(text) => Money::parse(text, currency),
            Self::Number(number) => Money::parse(&number.to_string(), currency),
        }
    }
}

/// A boolean sent as `true`, `1` or `"1"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl WireFlag {
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Text(s) => matches!(s.trim(), "1" | "true"),
        }
    }
}

/// Page count from `pagination.last_page`, number or numeric string.
pub fn page_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.min(u32::MAX as u64) as u32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One entry of `data.products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub selling_price: Option<WireAmount>,
    pub discount_price: Option<WireAmount>,
    pub stock: Option<Number>,
    pub units: Option<Vec<UnitRecord>>,
}

/// One entry of a product's `units`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitRecord {
    pub unit_code: Option<String>,
    pub is_active: Option<WireFlag>,
}

impl UnitRecord {
    /// Units without an explicit active flag are not sellable.
    pub fn is_active(&self) -> bool {
        self.is_active.as_ref().is_some_and(WireFlag::is_set)
    }
}

/// Why a product entry was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    MissingId,
    MissingName,
    MissingStock,
    MissingUnits,
    InvalidPrice,
}

impl Malformed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingId => "missing id",
            Self::MissingName => "missing name",
            Self::MissingStock => "missing numeric stock",
            Self::MissingUnits => "missing units array",
            Self::InvalidPrice => "invalid selling price",
        }
    }
}

impl ProductRecord {
    /// Flatten into one [`Unit`] per active sub-unit.
    pub fn into_units(self, currency: Currency) -> Result<Vec<Unit>, Malformed> {
        let product_id = self.id.ok_or(Malformed::MissingId)?;
        let product_name = self
            .name
            .as_deref()
            .map(sanitize_text)
            .filter(|n| !n.is_empty())
            .ok_or(Malformed::MissingName)?;
        let stock = self
            .stock
            .as_ref()
            .and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)))
            .ok_or(Malformed::MissingStock)?;
        let units = self.units.ok_or(Malformed::MissingUnits)?;

        let selling_price = self
            .selling_price
            .as_ref()
            .and_then(|p| p.to_money(currency).ok())
            .filter(|p| !p.is_negative())
            .ok_or(Malformed::InvalidPrice)?;
        let discount_price = match &self.discount_price {
            Some(raw) => match raw.to_money(currency) {
                Ok(price) if !price.is_negative() => Some(price),
                _ => {
                    tracing::debug!(product_id, "ignoring unparsable discount price");
                    None
                }
            },
            None => None,
        };

        let text = |field: &Option<String>| field.as_deref().map(sanitize_text).unwrap_or_default();
        let brand = text(&self.brand);
        let model = text(&self.model);
        let color = text(&self.color);
        let size = text(&self.size);

        Ok(units
            .into_iter()
            .filter(UnitRecord::is_active)
            .filter_map(|u| u.unit_code.as_deref().map(sanitize_text))
            .filter(|code| !code.is_empty())
            .map(|code| Unit {
                product_id,
                product_name: product_name.clone(),
                brand: brand.clone(),
                model: model.clone(),
                color: color.clone(),
                size: size.clone(),
                unit_code: UnitCode::new(code),
                selling_price,
                discount_price,
                stock,
                is_active: true,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ProductRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_amounts_accept_strings_and_numbers() {
        let text: WireAmount = serde_json::from_value(json!("150000.00")).unwrap();
        let number: WireAmount = serde_json::from_value(json!(150000)).unwrap();
        assert_eq!(text.to_money(Currency::IDR).unwrap().amount_minor, 150_000);
        assert_eq!(number.to_money(Currency::IDR).unwrap().amount_minor, 150_000);

        let junk: WireAmount = serde_json::from_value(json!("n/a")).unwrap();
        assert!(junk.to_money(Currency::IDR).is_err());
    }

    #[test]
    fn test_flags() {
        for (raw, expected) in [(json!(true), true), (json!(0), false), (json!("1"), true)] {
            let flag: WireFlag = serde_json::from_value(raw).unwrap();
            assert_eq!(flag.is_set(), expected);
        }
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(&json!(3)), Some(3));
        assert_eq!(page_number(&json!("4")), Some(4));
        assert_eq!(page_number(&json!(null)), None);
    }

    #[test]
    fn test_flatten_keeps_active_units_only() {
        let units = record(json!({
            "id": 7,
            "name": "Air \"Runner\"\n",
            "brand": "NikeCo",
            "model": "Runner",
            "color": "Black",
            "size": "42",
            "selling_price": "100000.00",
            "discount_price": "80000.00",
            "stock": 3,
            "units": [
                { "unit_code": "A-1", "qr_code": "x", "is_active": true },
                { "unit_code": "A-2", "is_active": 0 },
                { "unit_code": "A-3", "is_active": 1 },
                { "unit_code": "A-4" },
                { "unit_code": "  ", "is_active": true }
            ]
        }))
        .into_units(Currency::IDR)
        .unwrap();

        let codes: Vec<_> = units.iter().map(|u| u.unit_code.as_str()).collect();
        assert_eq!(codes, ["A-1", "A-3"]);
        assert_eq!(units[0].product_name, "Air Runner");
        assert_eq!(units[0].effective_price().amount_minor, 80_000);
        assert_eq!(units[0].stock, 3);
    }

    #[test]
    fn test_malformed_products() {
        let base = json!({
            "id": 1, "name": "Shoe", "selling_price": "1", "stock": 1, "units": []
        });

        let mut missing_stock = base.clone();
        missing_stock.as_object_mut().unwrap().remove("stock");
        assert_eq!(
            record(missing_stock).into_units(Currency::IDR),
            Err(Malformed::MissingStock)
        );

        let mut missing_units = base.clone();
        missing_units["units"] = Value::Null;
        assert_eq!(
            record(missing_units).into_units(Currency::IDR),
            Err(Malformed::MissingUnits)
        );

        let mut bad_price = base.clone();
        bad_price["selling_price"] = json!("free");
        assert_eq!(
            record(bad_price).into_units(Currency::IDR),
            Err(Malformed::InvalidPrice)
        );

        assert_eq!(record(base).into_units(Currency::IDR), Ok(vec![]));
    }

    #[test]
    fn test_non_numeric_stock_does_not_deserialize() {
        let result = serde_json::from_value::<ProductRecord>(json!({ "id": 1, "stock": "5" }));
        assert!(result.is_err());
    }
}
