//! CallRecordQuery - Validated listing parameters

use crate::domain::{errors::DomainError, ZonedDateTime};

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 500;

/// Page size used when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Filter and pagination for call record listings.
///
/// Construction validates the page bounds; out-of-range values are rejected
/// rather than clamped so the caller learns about the mistake.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecordQuery {
    page: u32,
    page_size: u32,
    search: Option<String>,
    date_from: Option<ZonedDateTime>,
    date_to: Option<ZonedDateTime>,
}

impl CallRecordQuery {
    /// Build a query. `page` is 1-indexed.
    pub fn new(
        page: u32,
        page_size: u32,
        search: Option<String>,
        date_from: Option<ZonedDateTime>,
        date_to: Option<ZonedDateTime>,
    ) -> Result<Self, DomainError> {
        if page < 1 {
            return Err(DomainError::Validation("page must be >= 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(DomainError::Validation(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        // Blank search text means no text filter; anything else is matched as given
        let search = search.filter(|s| !s.trim().is_empty());

        Ok(Self {
            page,
            page_size,
            search,
            date_from,
            date_to,
        })
    }

    /// First page, default size, no filters
    pub fn first_page() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            date_from: None,
            date_to: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn date_from(&self) -> Option<&ZonedDateTime> {
        self.date_from.as_ref()
    }

    pub fn date_to(&self) -> Option<&ZonedDateTime> {
        self.date_to.as_ref()
    }

    /// Number of matching records skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}
