//! API access for the register.
//!
//! This crate provides:
//! - `Transport` - Seam over HTTP, with a `reqwest` implementation
//! - `ApiClient` - Transport plus the operator session
//! - `attempt` / `RetryPolicy` - Bounded retry with a fixed pause
//! - `CatalogLoader` - Paginated catalog fetch with per-page retry and caching
//! - `TransactionApi` / `Register` - Sale submission and transaction listing

pub mod catalog;
mod client;
mod error;
mod retry;
pub mod transactions;
mod transport;
pub mod wire;

pub use catalog::{CatalogConfig, CatalogLoad, CatalogLoader, CatalogState};
pub use client::ApiClient;
pub use error::{FetchError, LoadError, SubmitError};
pub use retry::{attempt, RetryPolicy};
pub use transactions::{
    Register, SubmitReceipt, TransactionApi, TransactionPage, TransactionSummary,
};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
