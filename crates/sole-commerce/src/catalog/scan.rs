//! Resolving barcode/QR scans to catalog units.
//!
//! Labels printed by the back office encode either the bare unit code or a
//! URL whose last path segment is the unit code, e.g.
//! `https://shop.example/units/SH-42A`.

use crate::catalog::Unit;

/// A decoded scan, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedCode {
    /// Plain text, compared directly against unit codes.
    RawCode(String),
    /// An http(s) URL carrying the unit code in its path.
    Url(String),
}

impl ScannedCode {
    /// Classify scanned text.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::RawCode(trimmed.to_string())
        }
    }

    /// The trailing non-empty path segment of a URL scan.
    pub fn url_suffix(&self) -> Option<&str> {
        let Self::Url(url) = self else {
            return None;
        };
        let without_scheme = url.split_once("://").map_or(url.as_str(), |(_, rest)| rest);
        let path = without_scheme
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        // The first segment is the authority, never a code.
        let (_, path) = path.split_once('/')?;
        path.split('/').filter(|s| !s.is_empty()).last()
    }

    /// The full scanned text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::RawCode(s) | Self::Url(s) => s,
        }
    }
}

/// Find the unit a scan refers to.
///
/// URL scans are matched by their trailing path segment first; if that does
/// not name a unit, the whole text is compared as a raw code.
pub fn resolve_scanned_code<'a>(units: &'a [Unit], text: &str) -> Option<&'a Unit> {
    let scanned = ScannedCode::parse(text);
    if scanned.as_str().is_empty() {
        return None;
    }

    if let Some(suffix) = scanned.url_suffix() {
        if let Some(unit) = units.iter().find(|u| u.unit_code.matches(suffix)) {
            return Some(unit);
        }
    }

    units.iter().find(|u| u.unit_code.matches(scanned.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::unit;

    fn catalog() -> Vec<Unit> {
        vec![
            unit("SH-42A", "NikeCo", "42", 100_000),
            unit("SH-43B", "Adibas", "43", 120_000),
        ]
    }

    #[test]
    fn test_parse_classifies_urls() {
        assert_eq!(
            ScannedCode::parse("https://x.test/u/A1"),
            ScannedCode::Url("https://x.test/u/A1".into())
        );
        assert_eq!(ScannedCode::parse(" A1 "), ScannedCode::RawCode("A1".into()));
    }

    #[test]
    fn test_url_suffix() {
        let scan = ScannedCode::parse("https://shop.test/units/SH-42A/?ref=label#top");
        assert_eq!(scan.url_suffix(), Some("SH-42A"));

        let bare_host = ScannedCode::parse("https://shop.test");
        assert_eq!(bare_host.url_suffix(), None);

        assert_eq!(ScannedCode::parse("SH-42A").url_suffix(), None);
    }

    #[test]
    fn test_resolve_raw_code_case_insensitive() {
        let units = catalog();
        let found = resolve_scanned_code(&units, "sh-43b").unwrap();
        assert_eq!(found.unit_code.as_str(), "SH-43B");
    }

    #[test]
    fn test_resolve_url_suffix() {
        let units = catalog();
        let found = resolve_scanned_code(&units, "https://shop.test/units/sh-42a").unwrap();
        assert_eq!(found.unit_code.as_str(), "SH-42A");
    }

    #[test]
    fn test_resolve_not_found() {
        let units = catalog();
        assert!(resolve_scanned_code(&units, "SH-99Z").is_none());
        assert!(resolve_scanned_code(&units, "https://shop.test/units/SH-99Z").is_none());
        assert!(resolve_scanned_code(&units, "   ").is_none());
    }
}
