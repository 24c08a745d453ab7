//! Client-side catalog filtering.

use crate::catalog::Unit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Brand selector value meaning "no brand filter".
pub const ALL_BRANDS: &str = "all";

/// Minimum length before a search term narrows results.
pub const MIN_SEARCH_LEN: usize = 2;

/// Minimum length before a size term narrows results.
pub const MIN_SIZE_LEN: usize = 1;

/// Operator-selected catalog filters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Exact brand, or [`ALL_BRANDS`].
    pub brand: String,
    /// Free text matched against brand or model.
    pub search: String,
    /// Text matched against the size label.
    pub size: String,
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self {
            brand: ALL_BRANDS.to_string(),
            search: String::new(),
            size: String::new(),
        }
    }
}

impl CatalogFilter {
    /// Create a filter with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Set the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the size term.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Check a unit against every active constraint.
    pub fn matches(&self, unit: &Unit) -> bool {
        let brand_ok = self.brand == ALL_BRANDS || unit.brand == self.brand;

        let search = self.search.trim().to_lowercase();
        let search_ok = search.chars().count() < MIN_SEARCH_LEN
            || unit.brand.to_lowercase().contains(&search)
            || unit.model.to_lowercase().contains(&search);

        let size = self.size.trim().to_lowercase();
        let size_ok =
            size.chars().count() < MIN_SIZE_LEN || unit.size.to_lowercase().contains(&size);

        brand_ok && search_ok && size_ok
    }
}

/// Result of filtering a catalog snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredCatalog {
    /// Matching units in catalog order.
    pub units: Vec<Unit>,
    /// Brand name to summed stock over the matching units.
    pub brand_stock: BTreeMap<String, i64>,
}

impl FilteredCatalog {
    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Filter units by brand, search term and size; filters compose with AND.
pub fn filter_catalog(units: &[Unit], filter: &CatalogFilter) -> FilteredCatalog {
    let units: Vec<Unit> = units.iter().filter(|u| filter.matches(u)).cloned().collect();
    let brand_stock = brand_stock_counts(&units);
    FilteredCatalog { units, brand_stock }
}

/// Sum stock per brand.
pub fn brand_stock_counts(units: &[Unit]) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    for unit in units {
        *counts.entry(unit.brand.clone()).or_insert(0) += unit.stock;
    }
    counts
}
