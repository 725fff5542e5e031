//! Driving port for reading reports.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::report::{Report, ReportId, ReportListFilter, ReportPage};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportQuery: Send + Sync {
    /// Fetch one report, or `NotFound`.
    async fn get(&self, report_id: ReportId) -> Result<Report, Error>;

    /// List reports matching `filter`, newest first.
    async fn list(&self, filter: ReportListFilter) -> Result<ReportPage, Error>;
}
