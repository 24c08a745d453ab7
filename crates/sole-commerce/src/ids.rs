//! Newtype identifiers.
//!
//! Unit codes are printed on shoe-box labels and typed or scanned by
//! operators, so comparisons between codes ignore ASCII case.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a sellable unit, unique within one catalog snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCode(String);

impl UnitCode {
    /// Create a new code from a string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased form sent to the transaction endpoint.
    pub fn to_wire(&self) -> String {
        self.0.to_uppercase()
    }

    /// Case-insensitive comparison against raw text.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl PartialEq for UnitCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for UnitCode {}

impl std::hash::Hash for UnitCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UnitCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UnitCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for UnitCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_equality_ignores_case() {
        assert_eq!(UnitCode::new("u-100a"), UnitCode::new("U-100A"));
        assert_ne!(UnitCode::new("U-100A"), UnitCode::new("U-100B"));
    }

    #[test]
    fn test_code_hash_ignores_case() {
        let mut set = HashSet::new();
        set.insert(UnitCode::new("abc"));
        assert!(set.contains(&UnitCode::new("ABC")));
    }

    #[test]
    fn test_matches_trims_scanner_noise() {
        assert!(UnitCode::new("SH-42").matches(" sh-42\n"));
    }

    #[test]
    fn test_wire_form_is_upper_case() {
        assert_eq!(UnitCode::new("sh-42a").to_wire(), "SH-42A");
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&UnitCode::new("U1")).unwrap();
        assert_eq!(json, "\"U1\"");
    }
}
