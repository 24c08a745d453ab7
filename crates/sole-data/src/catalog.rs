//! Paginated catalog loading with per-page retry and a TTL cache.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use sole_cache::{cache_key, TtlCache, DEFAULT_TTL};
use sole_commerce::catalog::Unit;
use sole_commerce::Currency;

use crate::client::ApiClient;
use crate::retry::{attempt, RetryPolicy};
use crate::transport::ApiRequest;
use crate::wire::{page_number, ProductRecord};
use crate::LoadError;

/// Catalog endpoint.
pub const PRODUCTS_PATH: &str = "/api/products";

/// Products requested per page.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLoad {
    /// Units in API order (newest products first).
    Loaded(Vec<Unit>),
    /// The load succeeded but returned no units.
    Empty,
}

impl CatalogLoad {
    pub fn from_units(units: Vec<Unit>) -> Self {
        if units.is_empty() {
            Self::Empty
        } else {
            Self::Loaded(units)
        }
    }

    pub fn units(&self) -> &[Unit] {
        match self {
            Self::Loaded(units) => units,
            Self::Empty => &[],
        }
    }

    pub fn into_units(self) -> Vec<Unit> {
        match self {
            Self::Loaded(units) => units,
            Self::Empty => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Loader settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub per_page: u32,
    /// Applied to each page independently.
    pub retry: RetryPolicy,
    pub cache_ttl: Duration,
    pub currency: Currency,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            retry: RetryPolicy::fixed(3, Duration::from_secs(1)),
            cache_ttl: DEFAULT_TTL,
            currency: Currency::default(),
        }
    }
}

/// One parsed page.
#[derive(Debug)]
struct CatalogPage {
    units: Vec<Unit>,
    last_page: u32,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
}

/// Fetches the full catalog page by page.
///
/// # Example
///
/// ```rust,ignore
/// let loader = CatalogLoader::new(client, CatalogConfig::default());
/// match loader.load_or_cached(Some("nike"), None).await? {
///     CatalogLoad::Loaded(units) => println!("{} units", units.len()),
///     CatalogLoad::Empty => println!("no products"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    client: ApiClient,
    cache: TtlCache,
    config: CatalogConfig,
}

impl CatalogLoader {
    /// Create a loader caching into the client's session store.
    pub fn new(client: ApiClient, config: CatalogConfig) -> Self {
        let cache = TtlCache::new(client.session().cache().clone(), config.cache_ttl);
        Self {
            client,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Cache key for a query; filters are compared case-insensitively.
    pub fn cache_key(search: Option<&str>, size: Option<&str>) -> String {
        let norm = |v: Option<&str>| v.unwrap_or_default().trim().to_lowercase();
        cache_key!("catalog", norm(search), norm(size))
    }

    /// Fetch every page from the API and refresh the cache entry.
    ///
    /// Pages are requested in ascending order, each awaited before the next.
    /// Malformed products are dropped; a page failing every attempt fails
    /// the whole load.
    pub async fn load_catalog(
        &self,
        search: Option<&str>,
        size: Option<&str>,
    ) -> Result<CatalogLoad, LoadError> {
        let token = self.client.token().await?.ok_or(LoadError::Unauthenticated)?;

        let mut units = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1;
        loop {
            let fetched = attempt(
                &self.config.retry,
                |n| self.fetch_page(&token, search, size, page, n),
                LoadError::is_retryable,
            )
            .await?;

            for unit in fetched.units {
                if seen.insert(unit.unit_code.as_str().to_lowercase()) {
                    units.push(unit);
                } else {
                    tracing::debug!(unit_code = %unit.unit_code, page, "skipping duplicate unit code");
                }
            }

            if page >= fetched.last_page {
                break;
            }
            page += 1;
        }

        tracing::info!(units = units.len(), pages = page, "catalog loaded");

        let key = Self::cache_key(search, size);
        if let Err(e) = self.cache.set(&key, &units).await {
            tracing::warn!(key = %key, error = %e, "failed to cache catalog");
        }

        Ok(CatalogLoad::from_units(units))
    }

    /// Serve a fresh cache entry, or load from the API.
    pub async fn load_or_cached(
        &self,
        search: Option<&str>,
        size: Option<&str>,
    ) -> Result<CatalogLoad, LoadError> {
        let key = Self::cache_key(search, size);
        if let Some(units) = self.cache.get::<Vec<Unit>>(&key).await? {
            tracing::debug!(key = %key, units = units.len(), "catalog cache hit");
            return Ok(CatalogLoad::from_units(units));
        }
        tracing::debug!(key = %key, "catalog cache miss");
        self.load_catalog(search, size).await
    }

    async fn fetch_page(
        &self,
        token: &str,
        search: Option<&str>,
        size: Option<&str>,
        page: u32,
        attempt: u32,
    ) -> Result<CatalogPage, LoadError> {
        tracing::debug!(page, attempt = attempt + 1, "fetching catalog page");

        let request = ApiRequest::get(PRODUCTS_PATH)
            .bearer_auth(token)
            .accept("application/json")
            .query("search", search.unwrap_or_default())
            .query("size", size.unwrap_or_default())
            .query("page", page)
            .query("per_page", self.config.per_page)
            .query("no_cache", "true")
            .query("order_by", "created_at")
            .query("sort", "desc");

        let response = self.client.send(request).await?;
        let envelope: Envelope = response.json()?;
        parse_page(envelope.data.unwrap_or(Value::Null), page, self.config.currency)
    }
}

fn parse_page(mut data: Value, page: u32, currency: Currency) -> Result<CatalogPage, LoadError> {
    let last_page = data
        .pointer("/pagination/last_page")
        .and_then(page_number)
        .unwrap_or(1);

    let Some(Value::Array(products)) = data.get_mut("products").map(Value::take) else {
        return Err(LoadError::InvalidResponseShape(
            "data.products is missing or not an array".to_string(),
        ));
    };

    let mut units = Vec::new();
    let mut dropped = 0;
    for (index, entry) in products.into_iter().enumerate() {
        let flattened = serde_json::from_value::<ProductRecord>(entry)
            .map_err(|e| e.to_string())
            .and_then(|record| record.into_units(currency).map_err(|m| m.as_str().to_string()));
        match flattened {
            Ok(mut product_units) => units.append(&mut product_units),
            Err(reason) => {
                dropped += 1;
                tracing::warn!(page, index, reason = %reason, "dropping malformed product");
            }
        }
    }

    tracing::debug!(page, last_page, units = units.len(), dropped, "parsed catalog page");
    Ok(CatalogPage { units, last_page })
}

/// The catalog currently on screen.
///
/// A failed refresh leaves the previous snapshot in place.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    snapshot: Option<CatalogLoad>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units of the current snapshot; empty before the first load.
    pub fn units(&self) -> &[Unit] {
        self.snapshot.as_ref().map(CatalogLoad::units).unwrap_or(&[])
    }

    pub fn snapshot(&self) -> Option<&CatalogLoad> {
        self.snapshot.as_ref()
    }

    /// Reload from the API, replacing the snapshot only on success.
    pub async fn refresh(
        &mut self,
        loader: &CatalogLoader,
        search: Option<&str>,
        size: Option<&str>,
    ) -> Result<&CatalogLoad, LoadError> {
        let load = loader.load_catalog(search, size).await?;
        Ok(&*self.snapshot.insert(load))
    }
}
