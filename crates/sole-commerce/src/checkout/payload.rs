//! Outbound transaction payload.

use crate::cart::Cart;
use crate::checkout::{CardType, PaymentMethod};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Optional customer details captured at the register.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Customer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Customer {
    /// Customer with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Body of `POST /api/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionPayload {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub payment_method: PaymentMethod,
    /// Only set for card payments.
    pub card_type: Option<CardType>,
    pub notes: Option<String>,
    /// Discount granted through the total override, in major units.
    pub discount_amount: f64,
    pub products: Vec<PayloadProduct>,
}

/// One sold unit in the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadProduct {
    /// Upper-cased unit code.
    pub unit_code: String,
    /// Effective price per item, in major units.
    pub discount_price: f64,
    pub quantity: u32,
}

/// Blank strings become `None`.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build the submission payload from a cart. Performs no I/O.
pub fn build_transaction_payload(
    cart: &Cart,
    customer: &Customer,
    payment_method: PaymentMethod,
    card_type: Option<CardType>,
    notes: Option<&str>,
    discount: Money,
) -> TransactionPayload {
    let products = cart
        .items
        .iter()
        .map(|item| PayloadProduct {
            unit_code: item.unit.unit_code.to_wire(),
            discount_price: item.unit_price().to_f64(),
            quantity: item.quantity,
        })
        .collect();

    TransactionPayload {
        customer_name: non_blank(customer.name.as_deref()),
        customer_phone: non_blank(customer.phone.as_deref()),
        customer_email: non_blank(customer.email.as_deref()),
        payment_method,
        card_type: if payment_method.requires_card_type() {
            card_type
        } else {
            None
        },
        notes: non_blank(notes),
        discount_amount: discount.to_f64(),
        products,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::unit;
    use crate::money::Currency;
    use serde_json::json;

    fn cart() -> Cart {
        let mut cart = Cart::new(Currency::IDR);
        let mut first = unit("sh-42a", "NikeCo", "42", 100_000);
        first.discount_price = Some(Money::new(80_000, Currency::IDR));
        cart.add_unit(&first).unwrap();
        cart.add_unit(&unit("SH-43B", "Adibas", "43", 120_000)).unwrap();
        cart
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_transaction_payload(
            &cart(),
            &Customer::named("Budi"),
            PaymentMethod::Cash,
            None,
            Some("  "),
            Money::new(10_000, Currency::IDR),
        );

        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "customer_name": "Budi",
                "customer_phone": null,
                "customer_email": null,
                "payment_method": "cash",
                "card_type": null,
                "notes": null,
                "discount_amount": 10000.0,
                "products": [
                    { "unit_code": "SH-42A", "discount_price": 80000.0, "quantity": 1 },
                    { "unit_code": "SH-43B", "discount_price": 120000.0, "quantity": 1 }
                ]
            })
        );
    }

    #[test]
    fn test_card_type_only_for_card_payments() {
        let with_card = build_transaction_payload(
            &cart(),
            &Customer::default(),
            PaymentMethod::Card,
            Some(CardType::Credit),
            None,
            Money::zero(Currency::IDR),
        );
        assert_eq!(with_card.card_type, Some(CardType::Credit));

        let qris = build_transaction_payload(
            &cart(),
            &Customer::default(),
            PaymentMethod::Qris,
            Some(CardType::Credit),
            None,
            Money::zero(Currency::IDR),
        );
        assert_eq!(qris.card_type, None);
    }

    #[test]
    fn test_notes_and_customer_are_trimmed() {
        let customer = Customer {
            name: Some(" Sari ".into()),
            phone: Some("0812".into()),
            email: Some("".into()),
        };
        let payload = build_transaction_payload(
            &cart(),
            &customer,
            PaymentMethod::Transfer,
            None,
            Some(" gift wrap "),
            Money::zero(Currency::IDR),
        );
        assert_eq!(payload.customer_name.as_deref(), Some("Sari"));
        assert_eq!(payload.customer_phone.as_deref(), Some("0812"));
        assert_eq!(payload.customer_email, None);
        assert_eq!(payload.notes.as_deref(), Some("gift wrap"));
    }
}
