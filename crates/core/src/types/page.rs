//! Offset pagination for catalog listings.

/// Rejected pagination input.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("page must be at least 1")]
    PageTooSmall,
    #[error("limit must be at least 1")]
    LimitTooSmall,
}

/// A validated page/limit pair.
///
/// ```
/// use emporium_core::PageRequest;
///
/// let page = PageRequest::new(Some(3), Some(500)).unwrap();
/// assert_eq!(page.limit(), PageRequest::MAX_LIMIT);
/// assert_eq!(page.offset(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    /// Build a page request, filling defaults and capping `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] when `page` or `limit` is below 1.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, PageError> {
        let page = page.unwrap_or(i64::from(Self::DEFAULT_PAGE));
        let limit = limit.unwrap_or(i64::from(Self::DEFAULT_LIMIT));

        if page < 1 {
            return Err(PageError::PageTooSmall);
        }
        if limit < 1 {
            return Err(PageError::LimitTooSmall);
        }

        Ok(Self {
            page: u32::try_from(page).unwrap_or(u32::MAX),
            limit: u32::try_from(limit.min(i64::from(Self::MAX_LIMIT))).unwrap_or(Self::MAX_LIMIT),
        })
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::new(None, None).unwrap();
        assert_eq!(page, PageRequest::default());
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_limit_is_capped() {
        let page = PageRequest::new(Some(1), Some(1000)).unwrap();
        assert_eq!(page.limit(), 100);
    }

    #[test]
    fn test_offset() {
        let page = PageRequest::new(Some(4), Some(25)).unwrap();
        assert_eq!(page.offset(), 75);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(PageRequest::new(Some(0), None), Err(PageError::PageTooSmall));
        assert_eq!(PageRequest::new(None, Some(0)), Err(PageError::LimitTooSmall));
        assert_eq!(PageRequest::new(Some(-2), Some(5)), Err(PageError::PageTooSmall));
    }

    #[test]
    fn test_huge_page_saturates() {
        let page = PageRequest::new(Some(i64::MAX), Some(10)).unwrap();
        assert_eq!(page.page(), u32::MAX);
    }
}
