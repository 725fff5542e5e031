//! Report assembly: validate a draft end to end and persist it.
//!
//! The pipeline is strictly sequential and stops at the first failing
//! stage, so malformed input never costs a network round trip:
//!
//! 1. field checks (title, region code format, description)
//! 2. path size and national bounding box
//! 3. region centroid lookup
//! 4. centroid proximity, when enabled
//! 5. photo count and per-URL vetting, reporting every failing URL
//! 6. persistence as `submitted`
//!
//! The whole run is bounded by a deadline. Hitting it drops in-flight probes
//! and persists nothing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::geo::{BoundaryViolation, GeoValidator};
use crate::domain::photo_evidence::{PhotoEvidenceValidator, PhotoRejection};
use crate::domain::ports::{
    BoundaryRepositoryError, PathPointInput, ReportDraft, ReportRepository, ReportRepositoryError,
    ReportSubmission, ReviseReportRequest, SubmitReportRequest, WriteOutcome,
};
use crate::domain::report::{
    PhotoUrls, RegionCode, Report, ReportContent, ReportDescription, ReportId, ReportNotEditable,
    ReportPath, ReportStatus, ReportTitle, ReportValidationError,
};
use crate::domain::{BestEffortEvents, BoundaryLookup, Error, ReportEvent, UserId};

/// Distance a path point may lie from its region centroid.
pub const DEFAULT_PROXIMITY_THRESHOLD_METERS: f64 = 200.0;
/// Upper bound on one submission, photo probes included.
pub const DEFAULT_SUBMISSION_DEADLINE: Duration = Duration::from_secs(30);

/// Centroid proximity rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityPolicy {
    pub enabled: bool,
    pub threshold_meters: f64,
}

impl ProximityPolicy {
    pub fn enforced(threshold_meters: f64) -> Self {
        Self {
            enabled: true,
            threshold_meters,
        }
    }

    /// Whether a path whose closest point is `min_distance_meters` away
    /// passes this rule.
    pub fn allows(&self, min_distance_meters: f64) -> bool {
        !self.enabled || min_distance_meters <= self.threshold_meters
    }
}

impl Default for ProximityPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_meters: DEFAULT_PROXIMITY_THRESHOLD_METERS,
        }
    }
}

/// One rejected photo URL within a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFailure {
    /// Position in the submitted list.
    pub index: usize,
    pub url: String,
    pub rejection: PhotoRejection,
}

/// Why a submission or revision was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportSubmissionError {
    #[error(transparent)]
    FieldValidation(#[from] ReportValidationError),
    #[error(transparent)]
    BoundaryViolation(#[from] BoundaryViolation),
    #[error("region {region_code} is not in the boundary dataset")]
    RegionNotFound { region_code: RegionCode },
    #[error(
        "none of the path points lie near the claimed region: closest is {min_distance_meters:.0} m, limit is {threshold_meters:.0} m"
    )]
    ProximityViolation {
        min_distance_meters: f64,
        threshold_meters: f64,
    },
    #[error("{} photo URL(s) failed validation", .failures.len())]
    PhotoValidation { failures: Vec<PhotoFailure> },
    #[error("report {report_id} not found")]
    NotFound { report_id: ReportId },
    #[error("only the author may revise report {report_id}")]
    Unauthorized { report_id: ReportId },
    #[error(transparent)]
    NotEditable(#[from] ReportNotEditable),
    #[error("report {report_id} changed while it was being revised")]
    Stale { report_id: ReportId },
    #[error("submission did not finish within {} seconds", .deadline.as_secs())]
    DeadlineExceeded { deadline: Duration },
    #[error("{message}")]
    Unavailable { message: String },
    #[error("{message}")]
    Internal { message: String },
}

impl ReportSubmissionError {
    /// Stable snake_case name of the rejection kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FieldValidation(_) => "field_validation",
            Self::BoundaryViolation(_) => "boundary_violation",
            Self::RegionNotFound { .. } => "region_not_found",
            Self::ProximityViolation { .. } => "proximity_violation",
            Self::PhotoValidation { .. } => "photo_validation",
            Self::NotFound { .. } => "not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::NotEditable(_) => "not_editable",
            Self::Stale { .. } => "stale",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
            Self::Unavailable { .. } => "unavailable",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<ReportSubmissionError> for Error {
    fn from(error: ReportSubmissionError) -> Self {
        let message = error.to_string();
        match error {
            ReportSubmissionError::FieldValidation(source) => Error::invalid_request(message)
                .with_details(json!({
                    "code": "field_validation",
                    "field": source.field(),
                })),
            ReportSubmissionError::BoundaryViolation(violation) => Error::invalid_request(message)
                .with_details(json!({
                    "code": "boundary_violation",
                    "field": "path_points",
                    "index": violation.index,
                    "axis": violation.axis.as_str(),
                    "value": violation.value,
                    "range": [violation.min, violation.max],
                })),
            ReportSubmissionError::RegionNotFound { region_code } => Error::unprocessable(message)
                .with_details(json!({
                    "code": "region_not_found",
                    "field": "region_code",
                    "region_code": region_code.as_ref(),
                })),
            ReportSubmissionError::ProximityViolation {
                min_distance_meters,
                threshold_meters,
            } => Error::unprocessable(message).with_details(json!({
                "code": "proximity_violation",
                "field": "path_points",
                "min_distance_meters": min_distance_meters,
                "threshold_meters": threshold_meters,
            })),
            ReportSubmissionError::PhotoValidation { failures } => {
                let failures: Vec<_> = failures
                    .iter()
                    .map(|failure| {
                        json!({
                            "index": failure.index,
                            "url": failure.url,
                            "reason": failure.rejection.code(),
                            "message": failure.rejection.to_string(),
                        })
                    })
                    .collect();
                Error::unprocessable(message).with_details(json!({
                    "code": "photo_validation",
                    "field": "photo_urls",
                    "failures": failures,
                }))
            }
            ReportSubmissionError::NotFound { .. } => Error::not_found(message),
            ReportSubmissionError::Unauthorized { .. } => Error::forbidden(message),
            ReportSubmissionError::NotEditable(source) => {
                Error::conflict(message).with_details(json!({
                    "code": "not_editable",
                    "status": source.status.as_str(),
                }))
            }
            ReportSubmissionError::Stale { .. } => Error::conflict(message),
            ReportSubmissionError::DeadlineExceeded { .. }
            | ReportSubmissionError::Unavailable { .. } => Error::service_unavailable(message),
            ReportSubmissionError::Internal { .. } => Error::internal(message),
        }
    }
}

fn map_repository_error(error: ReportRepositoryError) -> ReportSubmissionError {
    match error {
        ReportRepositoryError::Connection { message } => ReportSubmissionError::Unavailable {
            message: format!("report repository unavailable: {message}"),
        },
        other => ReportSubmissionError::Internal {
            message: format!("report repository error: {other}"),
        },
    }
}

fn map_boundary_error(error: BoundaryRepositoryError) -> ReportSubmissionError {
    ReportSubmissionError::Unavailable {
        message: error.to_string(),
    }
}

/// Parse raw `(lat, lng)` input into a validated path.
pub(crate) fn path_from_input(points: &[PathPointInput]) -> Result<ReportPath, ReportValidationError> {
    let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p.lat, p.lng)).collect();
    ReportPath::from_pairs(&pairs)
}

/// Collaborators of [`ReportSubmissionService`].
#[derive(Clone)]
pub struct ReportSubmissionDeps {
    pub geo: GeoValidator,
    pub boundaries: BoundaryLookup,
    pub photos: PhotoEvidenceValidator,
    pub repository: Arc<dyn ReportRepository>,
    pub events: BestEffortEvents,
    pub clock: Arc<dyn Clock>,
}

/// Assembles, validates, and persists reports.
#[derive(Clone)]
pub struct ReportSubmissionService {
    deps: ReportSubmissionDeps,
    proximity: ProximityPolicy,
    deadline: Duration,
}

impl ReportSubmissionService {
    pub fn new(deps: ReportSubmissionDeps) -> Self {
        Self {
            deps,
            proximity: ProximityPolicy::default(),
            deadline: DEFAULT_SUBMISSION_DEADLINE,
        }
    }

    pub fn with_proximity(mut self, proximity: ProximityPolicy) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run the full pipeline and persist a new `submitted` report.
    pub async fn assemble(
        &self,
        author_id: UserId,
        draft: ReportDraft,
    ) -> Result<Report, ReportSubmissionError> {
        let report = self
            .within_deadline(async {
                let content = self.validate_content(draft).await?;
                let report = Report::new(ReportId::random(), author_id, content, self.deps.clock.utc());
                self.deps
                    .repository
                    .save(&report)
                    .await
                    .map_err(map_repository_error)?;
                Ok(report)
            })
            .await?;

        info!(
            report_id = %report.id(),
            region_code = %report.region_code(),
            photos = report.photo_urls().as_slice().len(),
            "report submitted"
        );
        self.deps
            .events
            .emit(ReportEvent::Submitted {
                report_id: report.id(),
                author_id,
                region_code: report.region_code().clone(),
            })
            .await;
        Ok(report)
    }

    /// Re-validate and replace the content of a report still in `submitted`.
    pub async fn revise_content(
        &self,
        report_id: ReportId,
        actor: UserId,
        draft: ReportDraft,
    ) -> Result<Report, ReportSubmissionError> {
        let report = self
            .within_deadline(async {
                let mut report = self
                    .deps
                    .repository
                    .find_by_id(&report_id)
                    .await
                    .map_err(map_repository_error)?
                    .ok_or(ReportSubmissionError::NotFound { report_id })?;
                if !report.is_authored_by(&actor) {
                    return Err(ReportSubmissionError::Unauthorized { report_id });
                }
                if !report.is_editable() {
                    return Err(ReportNotEditable {
                        status: report.status(),
                    }
                    .into());
                }

                let content = self.validate_content(draft).await?;
                report.revise(content, self.deps.clock.utc())?;
                match self
                    .deps
                    .repository
                    .update(&report, ReportStatus::Submitted)
                    .await
                    .map_err(map_repository_error)?
                {
                    WriteOutcome::Applied => Ok(report),
                    WriteOutcome::Stale => Err(ReportSubmissionError::Stale { report_id }),
                    WriteOutcome::Missing => Err(ReportSubmissionError::NotFound { report_id }),
                }
            })
            .await?;

        info!(report_id = %report_id, "report revised");
        self.deps
            .events
            .emit(ReportEvent::Revised {
                report_id,
                author_id: actor,
            })
            .await;
        Ok(report)
    }

    async fn within_deadline<T>(
        &self,
        work: impl Future<Output = Result<T, ReportSubmissionError>>,
    ) -> Result<T, ReportSubmissionError> {
        let outcome = match timeout(self.deadline, work).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ReportSubmissionError::DeadlineExceeded {
                deadline: self.deadline,
            }),
        };
        if let Err(error) = &outcome {
            warn!(kind = error.kind(), %error, "report rejected");
        }
        outcome
    }

    /// Stages 1 to 5.
    async fn validate_content(
        &self,
        draft: ReportDraft,
    ) -> Result<ReportContent, ReportSubmissionError> {
        let ReportDraft {
            title,
            region_code,
            path_points,
            photo_urls,
            description,
        } = draft;

        let title = ReportTitle::new(title)?;
        let region_code = RegionCode::new(region_code)?;
        let description = description.map(ReportDescription::new).transpose()?;

        let path = path_from_input(&path_points)?;
        self.deps.geo.validate_within_boundary(path.points())?;

        let centroid = self
            .deps
            .boundaries
            .get_centroid(&region_code)
            .await
            .map_err(map_boundary_error)?
            .ok_or_else(|| ReportSubmissionError::RegionNotFound {
                region_code: region_code.clone(),
            })?;

        if self.proximity.enabled {
            let min_distance_meters = self
                .deps
                .geo
                .min_distance_to_point(path.points(), centroid.point())
                .unwrap_or(f64::INFINITY);
            if !self.proximity.allows(min_distance_meters) {
                return Err(ReportSubmissionError::ProximityViolation {
                    min_distance_meters,
                    threshold_meters: self.proximity.threshold_meters,
                });
            }
        }

        let photo_urls = PhotoUrls::new(photo_urls)?;
        self.vet_photos(&photo_urls).await?;

        Ok(ReportContent {
            title,
            region_code,
            path,
            photo_urls,
            description,
        })
    }

    async fn vet_photos(&self, urls: &PhotoUrls) -> Result<(), ReportSubmissionError> {
        let results = self.deps.photos.validate_all(urls.as_slice()).await;

        if let Some(outage) = results
            .iter()
            .filter_map(|result| result.rejection())
            .find(|rejection| rejection.is_infrastructure())
        {
            return Err(ReportSubmissionError::Unavailable {
                message: outage.to_string(),
            });
        }

        let failures: Vec<PhotoFailure> = results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| {
                result.outcome.err().map(|rejection| PhotoFailure {
                    index,
                    url: result.url,
                    rejection,
                })
            })
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ReportSubmissionError::PhotoValidation { failures })
        }
    }
}

#[async_trait]
impl ReportSubmission for ReportSubmissionService {
    async fn submit(&self, request: SubmitReportRequest) -> Result<Report, Error> {
        Ok(self.assemble(request.author_id, request.draft).await?)
    }

    async fn revise(&self, request: ReviseReportRequest) -> Result<Report, Error> {
        Ok(self
            .revise_content(request.report_id, request.actor, request.draft)
            .await?)
    }
}

#[cfg(test)]
#[path = "report_submission_tests.rs"]
mod tests;
