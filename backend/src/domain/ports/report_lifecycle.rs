//! Driving port for status changes and deletion.

use async_trait::async_trait;

use crate::domain::report::{Report, ReportId, ReportStatus};
use crate::domain::{Error, UserId};

/// Request to advance a report to its next status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStatusRequest {
    pub report_id: ReportId,
    pub actor: UserId,
    pub target: ReportStatus,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportLifecycle: Send + Sync {
    /// Move a report one step forward.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `NotFound`: no such report.
    /// - `Forbidden`: the actor may not change this report's status.
    /// - `Conflict`: the target is not the next state, or concurrent updates
    ///   kept winning.
    async fn change_status(&self, request: ChangeStatusRequest) -> Result<Report, Error>;

    /// Delete a report on behalf of its author.
    async fn delete(&self, report_id: ReportId, actor: UserId) -> Result<(), Error>;
}
