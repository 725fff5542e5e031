//! Port for durable report storage.
//!
//! Status and content writes are conditional on the status the caller last
//! observed, so two verifiers racing on the same report cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::report::{Report, ReportId, ReportListFilter, ReportPage, ReportStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by report repository adapters.
    pub enum ReportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "report repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "report repository query failed: {message}",
        /// The report is still referenced by other records.
        Referenced { report_id: String } =>
            "report {report_id} is still referenced",
    }
}

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The stored status matched and the write was applied.
    Applied,
    /// The report exists but its status moved on since it was read.
    Stale,
    /// No report with that identifier exists.
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a newly assembled report.
    async fn save(&self, report: &Report) -> Result<(), ReportRepositoryError>;

    /// Fetch a report by identifier.
    ///
    /// Returns `None` when no report exists with the given ID.
    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report>, ReportRepositoryError>;

    /// List reports matching `filter`, newest first.
    async fn list(&self, filter: &ReportListFilter) -> Result<ReportPage, ReportRepositoryError>;

    /// Set the status of `id` to `status` if it is currently `expected`.
    async fn update_status(
        &self,
        id: &ReportId,
        expected: ReportStatus,
        status: ReportStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<WriteOutcome, ReportRepositoryError>;

    /// Replace a stored report if its status is still `expected`.
    async fn update(
        &self,
        report: &Report,
        expected: ReportStatus,
    ) -> Result<WriteOutcome, ReportRepositoryError>;

    /// Delete a report.
    ///
    /// Returns `Ok(true)` if the report was deleted, `Ok(false)` if it didn't
    /// exist.
    async fn delete(&self, id: &ReportId) -> Result<bool, ReportRepositoryError>;
}
