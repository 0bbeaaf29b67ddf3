//! The `info` envelope attached to paginated list responses.

use serde::{Deserialize, Serialize};
use url::Url;

/// Listing metadata returned next to a page of results.
///
/// `next` and `prev` are absolute links to the neighbouring pages, or `null`
/// at either end of the listing.
///
/// # Examples
/// ```
/// use pagination::PageInfo;
///
/// let info: PageInfo = serde_json::from_str(
///     r#"{"count":826,"pages":42,"next":"https://example.test/api/character?page=2","prev":null}"#,
/// )
/// .expect("valid envelope");
/// assert_eq!(info.pages, 42);
/// assert!(info.prev.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total number of records across all pages.
    #[serde(default)]
    pub count: u32,
    /// Total number of pages.
    #[serde(default)]
    pub pages: u32,
    /// Link to the following page.
    #[serde(default)]
    pub next: Option<Url>,
    /// Link to the preceding page.
    #[serde(default)]
    pub prev: Option<Url>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_fields_default_to_empty_listing() {
        let info: PageInfo = serde_json::from_str("{}").expect("lenient envelope");
        assert_eq!(info, PageInfo::default());
    }
}
