//! Product catalog module.
//!
//! Contains the sellable unit type and scan resolution.

mod scan;
mod unit;

pub use scan::{resolve_scanned_code, ScannedCode};
pub use unit::{sanitize_text, Unit};

#[cfg(test)]
pub(crate) use unit::test_support;
