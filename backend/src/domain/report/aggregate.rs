//! The report aggregate.

use chrono::{DateTime, Utc};

use super::{
    PhotoUrls, RegionCode, ReportDescription, ReportId, ReportPath, ReportStatus, ReportTitle,
};
use crate::domain::UserId;

/// Rejected lifecycle transition; names both the current and requested state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot transition report from {from} to {to}")]
pub struct InvalidTransition {
    /// State the report was in.
    pub from: ReportStatus,
    /// State that was requested.
    pub to: ReportStatus,
}

/// Content edits are only allowed before verification starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("report can no longer be edited once it is {status}")]
pub struct ReportNotEditable {
    /// Current state of the report.
    pub status: ReportStatus,
}

/// Validated, author-editable fields of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContent {
    pub title: ReportTitle,
    pub region_code: RegionCode,
    pub path: ReportPath,
    pub photo_urls: PhotoUrls,
    pub description: Option<ReportDescription>,
}

/// A road-damage report.
///
/// Only built once every submission check has passed, so a partially valid
/// report never exists. Status moves through [`Report::transition`] and
/// content through [`Report::revise`]; both refresh `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    id: ReportId,
    content: ReportContent,
    author_id: UserId,
    status: ReportStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Report {
    /// Create a freshly submitted report.
    pub fn new(id: ReportId, author_id: UserId, content: ReportContent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            author_id,
            status: ReportStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ReportId {
        self.id
    }

    pub fn title(&self) -> &ReportTitle {
        &self.content.title
    }

    pub fn region_code(&self) -> &RegionCode {
        &self.content.region_code
    }

    pub fn path(&self) -> &ReportPath {
        &self.content.path
    }

    pub fn photo_urls(&self) -> &PhotoUrls {
        &self.content.photo_urls
    }

    pub fn description(&self) -> Option<&ReportDescription> {
        self.content.description.as_ref()
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` submitted this report.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }

    /// Move to `target` if it is the next lifecycle state.
    ///
    /// On failure the report is left untouched, so callers can reload and
    /// retry against the latest stored status.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use roadwatch::domain::UserId;
    /// use roadwatch::domain::report::{
    ///     PhotoUrls, RegionCode, Report, ReportContent, ReportId, ReportPath, ReportStatus,
    ///     ReportTitle,
    /// };
    ///
    /// let content = ReportContent {
    ///     title: ReportTitle::new("Jalan berlubang").expect("title"),
    ///     region_code: RegionCode::new("35.10.02.2005").expect("code"),
    ///     path: ReportPath::from_pairs(&[(-7.2575, 112.7521)]).expect("path"),
    ///     photo_urls: PhotoUrls::new(vec!["https://example.com/a.jpg".into()]).expect("photos"),
    ///     description: None,
    /// };
    /// let created = Utc::now();
    /// let mut report = Report::new(ReportId::random(), UserId::random(), content, created);
    ///
    /// assert!(report.transition(ReportStatus::Verified, created).is_err());
    /// let later = created + Duration::minutes(5);
    /// report
    ///     .transition(ReportStatus::UnderVerification, later)
    ///     .expect("adjacent state");
    /// assert_eq!(report.updated_at(), later);
    /// ```
    pub fn transition(
        &mut self,
        target: ReportStatus,
        now: DateTime<Utc>,
    ) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(target) {
            return Err(InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    /// Whether content edits are still permitted.
    pub fn is_editable(&self) -> bool {
        self.status == ReportStatus::Submitted
    }

    /// Replace the author-editable content.
    pub fn revise(
        &mut self,
        content: ReportContent,
        now: DateTime<Utc>,
    ) -> Result<(), ReportNotEditable> {
        if !self.is_editable() {
            return Err(ReportNotEditable {
                status: self.status,
            });
        }
        self.content = content;
        self.updated_at = now;
        Ok(())
    }
}
