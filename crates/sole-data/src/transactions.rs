//! Transaction submission and listing.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sole_commerce::cart::{Cart, SharedCart};
use sole_commerce::checkout::{SaleForm, TransactionPayload};
use sole_commerce::invoice::{format_display_date, format_invoice_number, parse_timestamp};
use sole_commerce::{Currency, Money, UnitCode};

use crate::client::ApiClient;
use crate::transport::ApiRequest;
use crate::wire::{page_number, WireAmount};
use crate::{LoadError, SubmitError};

/// Transaction endpoint.
pub const TRANSACTIONS_PATH: &str = "/api/transactions";

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

/// Server acknowledgement of a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    id: Option<i64>,
    created_at: Option<String>,
    total_amount: Option<WireAmount>,
    discount_amount: Option<WireAmount>,
    payment_method: Option<String>,
    customer_name: Option<String>,
}

/// A recorded sale as listed by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub total: Money,
    pub discount: Money,
    pub payment_method: String,
    pub customer_name: Option<String>,
}

impl TransactionSummary {
    /// `INV-DDMMYYYY` in store time.
    pub fn invoice_number(&self) -> String {
        format_invoice_number(self.created_at)
    }

    /// `DD/MM/YYYY HH:MM` in store time.
    pub fn display_date(&self) -> String {
        format_display_date(self.created_at)
    }

    fn from_record(record: TransactionRecord, currency: Currency) -> Option<Self> {
        let created_at = parse_timestamp(record.created_at.as_deref()?).ok()?;
        let amount = |raw: &Option<WireAmount>| match raw {
            Some(raw) => raw.to_money(currency).ok(),
            None => Some(Money::zero(currency)),
        };
        Some(Self {
            id: record.id?,
            created_at,
            total: amount(&record.total_amount)?,
            discount: amount(&record.discount_amount)?,
            payment_method: record.payment_method.unwrap_or_default(),
            customer_name: record.customer_name.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// One page of the transaction listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionSummary>,
    pub page: u32,
    pub last_page: u32,
}

impl TransactionPage {
    pub fn has_more(&self) -> bool {
        self.page < self.last_page
    }
}

/// Client for the transaction endpoint.
#[derive(Debug, Clone)]
pub struct TransactionApi {
    client: ApiClient,
    currency: Currency,
}

impl TransactionApi {
    pub fn new(client: ApiClient, currency: Currency) -> Self {
        Self { client, currency }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Record a sale. Submissions are never retried automatically.
    pub async fn submit(&self, payload: &TransactionPayload) -> Result<SubmitReceipt, SubmitError> {
        let token = self.client.token().await?.ok_or(SubmitError::Unauthenticated)?;

        let request = ApiRequest::post(TRANSACTIONS_PATH)
            .bearer_auth(token)
            .accept("application/json")
            .json(payload)
            .map_err(SubmitError::Transport)?;

        let response = self.client.send(request).await?;
        let body: SubmitResponse = response.json().map_err(|e| {
            tracing::warn!(error = %e, "unreadable transaction response");
            SubmitError::SubmissionFailed {
                message: "unreadable response from server".to_string(),
            }
        })?;

        if !body.success {
            let message = body
                .message
                .unwrap_or_else(|| "transaction rejected".to_string());
            tracing::warn!(%message, "transaction rejected");
            return Err(SubmitError::SubmissionFailed { message });
        }

        tracing::info!(products = payload.products.len(), "transaction recorded");
        Ok(SubmitReceipt {
            message: body.message,
        })
    }

    /// Fetch one page of recorded sales, newest first as sent by the API.
    ///
    /// Records that cannot be read are skipped.
    pub async fn list(&self, page: u32) -> Result<TransactionPage, LoadError> {
        let token = self.client.token().await?.ok_or(LoadError::Unauthenticated)?;
        let page = page.max(1);

        let request = ApiRequest::get(TRANSACTIONS_PATH)
            .bearer_auth(token)
            .accept("application/json")
            .query("page", page);

        let body: Value = self.client.send(request).await?.json()?;
        let last_page = body
            .pointer("/data/pagination/last_page")
            .and_then(page_number)
            .unwrap_or(1);
        let records = body
            .pointer("/data/transactions")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                LoadError::InvalidResponseShape(
                    "data.transactions is missing or not an array".to_string(),
                )
            })?;

        let transactions = records
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let summary = TransactionRecord::deserialize(entry)
                    .ok()
                    .and_then(|r| TransactionSummary::from_record(r, self.currency));
                if summary.is_none() {
                    tracing::warn!(page, index, "skipping unreadable transaction");
                }
                summary
            })
            .collect();

        Ok(TransactionPage {
            transactions,
            page,
            last_page,
        })
    }
}

/// The register: one cart and the API to settle it.
#[derive(Debug, Clone)]
pub struct Register {
    cart: SharedCart,
    api: TransactionApi,
}

impl Register {
    pub fn new(api: TransactionApi) -> Self {
        let cart = SharedCart::new(Cart::new(api.currency()));
        Self { cart, api }
    }

    pub fn cart(&self) -> &SharedCart {
        &self.cart
    }

    /// Validate, submit, and on success remove the sold units and reset `form`.
    ///
    /// Units added while the submission is in flight stay in the cart. On any
    /// failure the cart and the form are left as they were.
    pub async fn checkout(&self, form: &mut SaleForm) -> Result<SubmitReceipt, SubmitError> {
        let sold = self.cart.snapshot();
        let payload = form.prepare(&sold)?;
        let receipt = self.api.submit(&payload).await?;

        let codes: Vec<UnitCode> = sold.items.into_iter().map(|i| i.unit.unit_code).collect();
        self.cart.remove_units(&codes);
        form.reset();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::*;
    use crate::FetchError;
    use serde_json::json;
    use sole_commerce::catalog::Unit;
    use sole_commerce::checkout::{PaymentMethod, PrepareError, ValidationError};
    use std::sync::{Arc, Mutex};

    fn unit(code: &str, price: i64) -> Unit {
        Unit {
            product_id: 1,
            product_name: "Runner".into(),
            brand: "NikeCo".into(),
            model: "Runner".into(),
            color: "Black".into(),
            size: "42".into(),
            unit_code: UnitCode::new(code),
            selling_price: Money::new(price, Currency::IDR),
            discount_price: None,
            stock: 3,
            is_active: true,
        }
    }

    fn cash_form(total: &str) -> SaleForm {
        SaleForm {
            payment_method: Some(PaymentMethod::Cash),
            new_total: total.into(),
            ..SaleForm::default()
        }
    }

    async fn register(transport: &std::sync::Arc<MockTransport>) -> Register {
        Register::new(TransactionApi::new(client(transport).await, Currency::IDR))
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart_and_form() {
        let transport = MockTransport::new(|_| {
            json_response(201, json!({ "success": true, "message": "Transaction created" }))
        });
        let register = register(&transport).await;
        register.cart().add_unit(&unit("sh-1", 100_000)).unwrap();
        let mut form = cash_form("90000");

        let receipt = register.checkout(&mut form).await.unwrap();

        assert_eq!(receipt.message.as_deref(), Some("Transaction created"));
        assert!(register.cart().is_empty());
        assert_eq!(form, SaleForm::default());

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, TRANSACTIONS_PATH);
        assert_eq!(sent.method, http::Method::POST);
        let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["products"][0]["unit_code"], "SH-1");
        assert_eq!(body["discount_amount"], 10000.0);
        assert_eq!(body["payment_method"], "cash");
    }

    #[tokio::test]
    async fn test_unit_added_during_submit_survives_checkout() {
        let live_cart: Arc<Mutex<Option<SharedCart>>> = Arc::new(Mutex::new(None));
        let handle = live_cart.clone();
        let transport = MockTransport::new(move |_| {
            if let Some(cart) = handle.lock().unwrap().as_ref() {
                cart.add_unit(&unit("sh-2", 50_000)).unwrap();
            }
            json_response(201, json!({ "success": true }))
        });
        let register = register(&transport).await;
        register.cart().add_unit(&unit("sh-1", 100_000)).unwrap();
        *live_cart.lock().unwrap() = Some(register.cart().clone());

        register.checkout(&mut cash_form("100000")).await.unwrap();

        let sent = &transport.requests()[0];
        let body: Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["products"].as_array().unwrap().len(), 1);
        assert_eq!(body["products"][0]["unit_code"], "SH-1");

        let remaining = register.cart().snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.items[0].unit.unit_code.as_str(), "sh-2");
    }

    #[tokio::test]
    async fn test_rejected_checkout_preserves_state() {
        let transport = MockTransport::new(|_| {
            json_response(200, json!({ "success": false, "message": "Unit already sold" }))
        });
        let register = register(&transport).await;
        register.cart().add_unit(&unit("sh-1", 100_000)).unwrap();
        let mut form = cash_form("100000");

        let err = register.checkout(&mut form).await.unwrap_err();

        match err {
            SubmitError::SubmissionFailed { message } => assert_eq!(message, "Unit already sold"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(register.cart().len(), 1);
        assert_eq!(form, cash_form("100000"));
    }

    #[tokio::test]
    async fn test_server_error_preserves_state() {
        let transport =
            MockTransport::new(|_| json_response(422, json!({ "message": "Invalid unit code" })));
        let register = register(&transport).await;
        register.cart().add_unit(&unit("sh-1", 100_000)).unwrap();
        let mut form = cash_form("100000");

        let err = register.checkout(&mut form).await.unwrap_err();
        assert!(matches!(err, SubmitError::SubmissionFailed { .. }));
        assert_eq!(register.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let transport = MockTransport::new(|_| Err(FetchError::Timeout("30s".into())));
        let register = register(&transport).await;
        register.cart().add_unit(&unit("sh-1", 100_000)).unwrap();

        let err = register.checkout(&mut cash_form("100000")).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
        assert_eq!(transport.request_count(), 1);
        assert_eq!(register.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_sale_sends_nothing() {
        let transport = MockTransport::new(|_| json_response(201, json!({ "success": true })));
        let register = register(&transport).await;

        let err = register.checkout(&mut cash_form("0")).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Validation(PrepareError::Validation(ValidationError::EmptyCart))
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_without_token() {
        let transport = MockTransport::new(|_| json_response(201, json!({ "success": true })));
        let api = TransactionApi::new(anonymous_client(&transport).await, Currency::IDR);
        let register = Register::new(api);
        register.cart().add_unit(&unit("sh-1", 100_000)).unwrap();

        let err = register.checkout(&mut cash_form("100000")).await.unwrap_err();
        assert!(matches!(err, SubmitError::Unauthenticated));
        assert_eq!(transport.request_count(), 0);
        assert_eq!(register.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_list_transactions() {
        let transport = MockTransport::new(|_| {
            json_response(
                200,
                json!({
                    "data": {
                        "transactions": [
                            {
                                "id": 12,
                                "created_at": "2025-01-05T20:30:00.000000Z",
                                "total_amount": "90000.00",
                                "discount_amount": "10000.00",
                                "payment_method": "qris",
                                "customer_name": "Sari"
                            },
                            { "id": 13, "created_at": "not a date", "total_amount": "1" },
                            {
                                "id": 14,
                                "created_at": "2025-01-05 10:00:00",
                                "total_amount": 50000,
                                "payment_method": "cash",
                                "customer_name": ""
                            }
                        ],
                        "pagination": { "last_page": 3 }
                    }
                }),
            )
        });
        let api = TransactionApi::new(client(&transport).await, Currency::IDR);

        let page = api.list(2).await.unwrap();

        assert_eq!(transport.requests()[0].query_value("page"), Some("2"));
        assert_eq!(page.transactions.len(), 2);
        assert!(page.has_more());

        let first = &page.transactions[0];
        assert_eq!(first.invoice_number(), "INV-06012025");
        assert_eq!(first.display_date(), "06/01/2025 03:30");
        assert_eq!(first.total.amount_minor, 90_000);
        assert_eq!(first.discount.amount_minor, 10_000);

        let second = &page.transactions[1];
        assert_eq!(second.invoice_number(), "INV-05012025");
        assert!(second.discount.is_zero());
        assert_eq!(second.customer_name, None);
    }

    #[tokio::test]
    async fn test_list_rejects_missing_array() {
        let transport = MockTransport::new(|_| json_response(200, json!({ "data": {} })));
        let api = TransactionApi::new(client(&transport).await, Currency::IDR);
        assert!(matches!(
            api.list(1).await,
            Err(LoadError::InvalidResponseShape(_))
        ));
    }
}
