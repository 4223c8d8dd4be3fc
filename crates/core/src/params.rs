//! Request parameter validation
//!
//! Every function here is total: malformed input is clamped or replaced by a
//! default, never rejected.

use crate::types::{SortField, SortOrder};

/// Page used when none (or garbage) is supplied
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when none (or garbage) is supplied
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a caller may request
pub const MAX_LIMIT: u32 = 100;

/// Largest page number a caller may request
pub const MAX_PAGE: u32 = 1000;

/// Upper bounds applied by [`ParamValidator::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub max_limit: u32,
    pub max_page: u32,
    pub default_limit: u32,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            max_limit: MAX_LIMIT,
            max_page: MAX_PAGE,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// Parse the leading integer of `raw`
///
/// Accepts optional leading whitespace, an optional sign and a run of digits;
/// anything after the digits is ignored. Values beyond `i64` saturate.
/// Returns `None` when no digit is found.
///
/// # Examples
///
/// ```
/// use questsearch_core::params::parse_leading_int;
///
/// assert_eq!(parse_leading_int(" 42abc"), Some(42));
/// assert_eq!(parse_leading_int("-5"), Some(-5));
/// assert_eq!(parse_leading_int("abc"), None);
/// ```
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    seen_digit.then(|| if negative { -value } else { value })
}

/// Validates and normalizes raw pagination and sort parameters
#[derive(Debug, Default, Clone, Copy)]
pub struct ParamValidator {
    bounds: PageBounds,
}

impl ParamValidator {
    pub fn new(bounds: PageBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> PageBounds {
        self.bounds
    }

    /// Clamp raw page and limit values into `(page, limit)`
    ///
    /// A limit below 1 falls back to the default size rather than 1.
    /// Pages above the maximum are capped silently.
    pub fn validate(&self, raw_page: Option<&str>, raw_limit: Option<&str>) -> (u32, u32) {
        let PageBounds {
            max_limit,
            max_page,
            default_limit,
        } = self.bounds;

        let limit = match raw_limit.and_then(parse_leading_int) {
            Some(n) if n < 1 => default_limit,
            Some(n) if n > i64::from(max_limit) => max_limit,
            Some(n) => n as u32,
            None => default_limit,
        };

        let page = match raw_page.and_then(parse_leading_int) {
            Some(n) if n < 1 => DEFAULT_PAGE,
            Some(n) if n > i64::from(max_page) => max_page,
            Some(n) => n as u32,
            None => DEFAULT_PAGE,
        };

        (page, limit)
    }

    /// Resolve the sort field and direction
    ///
    /// Unknown fields fall back to `createdAt`. Only the exact literal `asc`
    /// yields ascending order; everything else is descending.
    pub fn validate_sort(&self, raw_field: Option<&str>, raw_order: Option<&str>) -> (SortField, SortOrder) {
        let field = raw_field
            .and_then(SortField::from_name)
            .unwrap_or_default();
        let order = match raw_order {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };
        (field, order)
    }
}

/// Normalize type filters given as comma-joined and/or repeated values
///
/// Blank entries are dropped and duplicates collapse onto their first
/// occurrence.
pub fn normalize_types<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for value in raw {
        for part in value.as_ref().split(',') {
            let part = part.trim();
            if !part.is_empty() && !types.iter().any(|t| t == part) {
                types.push(part.to_string());
            }
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ParamValidator {
        ParamValidator::default()
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("7"), Some(7));
        assert_eq!(parse_leading_int("  12px"), Some(12));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("-0"), Some(0));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("x1"), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_limit_defaults_and_cap() {
        let v = validator();
        assert_eq!(v.validate(None, Some("-5")).1, 10);
        assert_eq!(v.validate(None, Some("0")).1, 10);
        assert_eq!(v.validate(None, Some("abc")).1, 10);
        assert_eq!(v.validate(None, None).1, 10);
        assert_eq!(v.validate(None, Some("1")).1, 1);
        assert_eq!(v.validate(None, Some("100")).1, 100);
        assert_eq!(v.validate(None, Some("101")).1, 100);
        assert_eq!(v.validate(None, Some("5000")).1, 100);
    }

    #[test]
    fn test_page_floor_and_cap() {
        let v = validator();
        assert_eq!(v.validate(Some("0"), None).0, 1);
        assert_eq!(v.validate(Some("-3"), None).0, 1);
        assert_eq!(v.validate(Some("nope"), None).0, 1);
        assert_eq!(v.validate(Some("2"), None).0, 2);
        assert_eq!(v.validate(Some("1000"), None).0, 1000);
        assert_eq!(v.validate(Some("1001"), None).0, 1000);
    }

    #[test]
    fn test_custom_bounds() {
        let v = ParamValidator::new(PageBounds {
            max_limit: 20,
            max_page: 5,
            default_limit: 4,
        });
        assert_eq!(v.validate(Some("9"), Some("50")), (5, 20));
        assert_eq!(v.validate(None, Some("0")), (1, 4));
    }

    #[test]
    fn test_sort_validation() {
        let v = validator();
        assert_eq!(
            v.validate_sort(Some("title"), Some("asc")),
            (SortField::Title, SortOrder::Asc)
        );
        assert_eq!(
            v.validate_sort(Some("anagramType"), Some("ASC")),
            (SortField::AnagramType, SortOrder::Desc)
        );
        assert_eq!(
            v.validate_sort(Some("password"), Some("desc")),
            (SortField::CreatedAt, SortOrder::Desc)
        );
        assert_eq!(
            v.validate_sort(None, None),
            (SortField::CreatedAt, SortOrder::Desc)
        );
        assert_eq!(v.validate_sort(None, Some(" asc")).1, SortOrder::Desc);
    }

    #[test]
    fn test_normalize_types() {
        let raw = vec!["MCQ,ANAGRAM", " MCQ ", "", "READ_ALONG,,"];
        assert_eq!(normalize_types(&raw), vec!["MCQ", "ANAGRAM", "READ_ALONG"]);
        assert!(normalize_types(&[",", " "]).is_empty());
    }
}
