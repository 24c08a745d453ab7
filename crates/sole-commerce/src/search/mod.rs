//! Search module.
//!
//! Client-side filtering and pagination over a loaded catalog snapshot.

mod filter;
mod results;

pub use filter::{
    brand_stock_counts, filter_catalog, CatalogFilter, FilteredCatalog, ALL_BRANDS,
    MIN_SEARCH_LEN, MIN_SIZE_LEN,
};
pub use results::{paginate, Page, Pagination};
