//! Driving port for submitting and revising reports.
//!
//! Inbound adapters hand over raw field values; the service owns every
//! validation step, so nothing here is pre-checked.

use async_trait::async_trait;

use crate::domain::report::{Report, ReportId};
use crate::domain::{Error, UserId};

/// Raw path point as supplied by a client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPointInput {
    pub lat: f64,
    pub lng: f64,
}

/// Unvalidated report fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub region_code: String,
    pub path_points: Vec<PathPointInput>,
    pub photo_urls: Vec<String>,
    pub description: Option<String>,
}

/// Request to create a report.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReportRequest {
    /// Authenticated submitter.
    pub author_id: UserId,
    pub draft: ReportDraft,
}

/// Request to replace the content of an existing report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviseReportRequest {
    pub report_id: ReportId,
    /// Authenticated caller; must be the original author.
    pub actor: UserId,
    pub draft: ReportDraft,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSubmission: Send + Sync {
    /// Validate a draft and persist it as a new `submitted` report.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `InvalidRequest`: a field or boundary check failed.
    /// - `UnprocessableEntity`: unknown region, proximity or photo failures.
    /// - `ServiceUnavailable`: a dependency was unreachable.
    async fn submit(&self, request: SubmitReportRequest) -> Result<Report, Error>;

    /// Re-validate a draft and replace the content of a `submitted` report.
    ///
    /// # Errors
    ///
    /// As [`ReportSubmission::submit`], plus `NotFound`, `Forbidden` when the
    /// caller is not the author, and `Conflict` once verification started.
    async fn revise(&self, request: ReviseReportRequest) -> Result<Report, Error>;
}
