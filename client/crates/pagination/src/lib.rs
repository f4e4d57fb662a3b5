//! Page-number pagination primitives shared by the sozdik service clients.
//!
//! The backend services paginate with 1-based `page`/`size` query parameters
//! and reply with a `meta` envelope describing the full result set. This
//! crate owns the validated request half and the decoded response half so
//! every client builds the same query pairs and reads the same envelope.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when a caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size the services accept.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation errors raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are 1-based; zero never addresses a page.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// Size must be within `1..=MAX_PAGE_SIZE`.
    #[error("page size must be between 1 and {MAX_PAGE_SIZE}, got {size}")]
    SizeOutOfRange {
        /// The rejected size.
        size: u32,
    },
}

/// A validated 1-based page request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20).expect("valid request");
/// assert_eq!(request.query_pairs(), [("page".to_owned(), "3".to_owned()),
///     ("size".to_owned(), "20".to_owned())]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Construct a request after validating both fields.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when the page is zero or the size is
    /// outside `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(PageRequestError::SizeOutOfRange { size });
        }
        Ok(Self { page, size })
    }

    /// First page with the default size.
    #[must_use]
    pub fn first() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Same size, given page.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroPage`] when `page` is zero.
    pub fn with_page(self, page: u32) -> Result<Self, PageRequestError> {
        Self::new(page, self.size)
    }

    /// 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Render the request as `page`/`size` query pairs.
    #[must_use]
    pub fn query_pairs(&self) -> [(String, String); 2] {
        [
            ("page".to_owned(), self.page.to_string()),
            ("size".to_owned(), self.size.to_string()),
        ]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Result-set envelope returned alongside paginated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-based page that was served.
    pub page: u32,
    /// Items per page the server applied.
    pub size: u32,
    /// Total matching items across all pages.
    pub total: u64,
    /// Total page count.
    pub pages: u32,
}

impl PageMeta {
    /// Whether another page follows the served one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

/// A page of items together with its [`PageMeta`] envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    /// Result-set envelope.
    pub meta: PageMeta,
    /// Items on the served page.
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    //! Validation and envelope decoding coverage.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero_page(0, 20)]
    #[case::zero_size(1, 0)]
    #[case::oversized(1, 101)]
    fn rejects_invalid_requests(#[case] page: u32, #[case] size: u32) {
        assert!(PageRequest::new(page, size).is_err());
    }

    #[test]
    fn renders_query_pairs_for_requested_page() {
        let request = PageRequest::first().with_page(3).expect("page 3 is valid");

        assert_eq!(
            request.query_pairs(),
            [
                ("page".to_owned(), "3".to_owned()),
                ("size".to_owned(), "20".to_owned()),
            ],
            "page 3 at the default size should produce page=3&size=20"
        );
    }

    #[test]
    fn decodes_search_style_envelope() {
        let body = r#"{
            "meta": { "page": 2, "size": 20, "total": 45, "pages": 3 },
            "items": ["a", "b"]
        }"#;

        let paged: Paged<String> = serde_json::from_str(body).expect("envelope decodes");
        assert_eq!(paged.items.len(), 2);
        assert!(paged.meta.has_next(), "page 2 of 3 has a successor");
    }

    #[test]
    fn last_page_has_no_successor() {
        let meta = PageMeta {
            page: 3,
            size: 20,
            total: 45,
            pages: 3,
        };
        assert!(!meta.has_next());
    }
}
