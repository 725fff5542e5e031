//! Listing filters and pagination.

use super::{RegionCode, Report, ReportStatus};
use crate::domain::UserId;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Offset pagination with a clamped limit.
///
/// # Examples
/// ```
/// use roadwatch::domain::report::PageRequest;
///
/// let page = PageRequest::new(Some(500), Some(40));
/// assert_eq!(page.limit(), 100);
/// assert_eq!(page.page(), 1);
///
/// let page = PageRequest::new(None, Some(40));
/// assert_eq!(page.limit(), 20);
/// assert_eq!(page.page(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Build a page request; a missing or zero limit uses the default and
    /// larger limits are clamped.
    pub fn new(limit: Option<u32>, offset: Option<u64>) -> Self {
        let limit = match limit {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(value) => value.min(MAX_PAGE_LIMIT),
        };
        Self {
            limit,
            offset: offset.unwrap_or(0),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// One-based page number implied by the offset.
    pub fn page(&self) -> u64 {
        self.offset / u64::from(self.limit) + 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Optional filters for listing reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportListFilter {
    pub status: Option<ReportStatus>,
    pub region_code: Option<RegionCode>,
    pub author_id: Option<UserId>,
    pub page: PageRequest,
}

impl ReportListFilter {
    /// Whether `report` satisfies every filter that is set.
    pub fn matches(&self, report: &Report) -> bool {
        self.status.is_none_or(|status| report.status() == status)
            && self
                .region_code
                .as_ref()
                .is_none_or(|code| report.region_code() == code)
            && self
                .author_id
                .as_ref()
                .is_none_or(|author| report.author_id() == author)
    }
}

/// One page of reports plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub reports: Vec<Report>,
    pub total: u64,
}
