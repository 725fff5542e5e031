//! Report lifecycle and read services.
//!
//! Status changes read the report, check the actor with the injected
//! authorizer, apply [`Report::transition`], and persist with a conditional
//! write keyed on the status that was read. A stale write re-reads and tries
//! again, so a report that someone else already advanced fails with an
//! invalid transition instead of moving twice.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ChangeStatusRequest, ReportLifecycle, ReportQuery, ReportRepository, ReportRepositoryError,
    StatusChangeAuthorizer, StatusAuthorizerError, WriteOutcome,
};
use crate::domain::report::{
    InvalidTransition, Report, ReportId, ReportListFilter, ReportPage, ReportStatus,
};
use crate::domain::{BestEffortEvents, Error, ReportEvent, UserId};

/// Conditional write attempts before a status change gives up.
pub const MAX_STATUS_WRITE_ATTEMPTS: usize = 3;

/// Why a lifecycle operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportLifecycleError {
    #[error("report {report_id} not found")]
    NotFound { report_id: ReportId },
    #[error("user {actor} may not change report {report_id} to {target}")]
    Unauthorized {
        report_id: ReportId,
        actor: UserId,
        target: ReportStatus,
    },
    #[error("only the author may delete report {report_id}")]
    NotAuthor { report_id: ReportId },
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    #[error("report {report_id} kept changing; gave up after {attempts} attempts")]
    Contended { report_id: ReportId, attempts: usize },
    #[error("report {report_id} is still referenced and cannot be deleted")]
    Referenced { report_id: ReportId },
    #[error("{message}")]
    Unavailable { message: String },
    #[error("{message}")]
    Internal { message: String },
}

impl From<ReportLifecycleError> for Error {
    fn from(error: ReportLifecycleError) -> Self {
        let message = error.to_string();
        match error {
            ReportLifecycleError::NotFound { .. } => Error::not_found(message),
            ReportLifecycleError::Unauthorized { .. } | ReportLifecycleError::NotAuthor { .. } => {
                Error::forbidden(message)
            }
            ReportLifecycleError::InvalidTransition(InvalidTransition { from, to }) => {
                Error::conflict(message).with_details(json!({
                    "code": "invalid_transition",
                    "from": from.as_str(),
                    "to": to.as_str(),
                }))
            }
            ReportLifecycleError::Contended { .. } | ReportLifecycleError::Referenced { .. } => {
                Error::conflict(message)
            }
            ReportLifecycleError::Unavailable { .. } => Error::service_unavailable(message),
            ReportLifecycleError::Internal { .. } => Error::internal(message),
        }
    }
}

fn map_repository_error(error: ReportRepositoryError) -> ReportLifecycleError {
    match error {
        ReportRepositoryError::Connection { message } => ReportLifecycleError::Unavailable {
            message: format!("report repository unavailable: {message}"),
        },
        ReportRepositoryError::Query { message } => ReportLifecycleError::Internal {
            message: format!("report repository error: {message}"),
        },
        ReportRepositoryError::Referenced { report_id } => ReportLifecycleError::Internal {
            message: format!("unexpected reference conflict on report {report_id}"),
        },
    }
}

fn map_authorizer_error(error: StatusAuthorizerError) -> ReportLifecycleError {
    ReportLifecycleError::Unavailable {
        message: error.to_string(),
    }
}

/// Lifecycle and query service over a report repository.
#[derive(Clone)]
pub struct ReportLifecycleService {
    repository: Arc<dyn ReportRepository>,
    authorizer: Arc<dyn StatusChangeAuthorizer>,
    events: BestEffortEvents,
    clock: Arc<dyn Clock>,
}

impl ReportLifecycleService {
    pub fn new(
        repository: Arc<dyn ReportRepository>,
        authorizer: Arc<dyn StatusChangeAuthorizer>,
        events: BestEffortEvents,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            authorizer,
            events,
            clock,
        }
    }

    async fn load(&self, report_id: ReportId) -> Result<Report, ReportLifecycleError> {
        self.repository
            .find_by_id(&report_id)
            .await
            .map_err(map_repository_error)?
            .ok_or(ReportLifecycleError::NotFound { report_id })
    }

    /// Advance a report by one state on behalf of `actor`.
    pub async fn advance(
        &self,
        report_id: ReportId,
        actor: UserId,
        target: ReportStatus,
    ) -> Result<Report, ReportLifecycleError> {
        for attempt in 1..=MAX_STATUS_WRITE_ATTEMPTS {
            let mut report = self.load(report_id).await?;
            let allowed = self
                .authorizer
                .may_change_status(&actor, &report, target)
                .await
                .map_err(map_authorizer_error)?;
            if !allowed {
                warn!(%report_id, %actor, %target, "status change refused");
                return Err(ReportLifecycleError::Unauthorized {
                    report_id,
                    actor,
                    target,
                });
            }

            let from = report.status();
            let now = self.clock.utc();
            report.transition(target, now)?;

            match self
                .repository
                .update_status(&report_id, from, target, now)
                .await
                .map_err(map_repository_error)?
            {
                WriteOutcome::Applied => {
                    info!(%report_id, %from, to = %target, "report status changed");
                    self.events
                        .emit(ReportEvent::StatusChanged {
                            report_id,
                            actor,
                            from,
                            to: target,
                        })
                        .await;
                    return Ok(report);
                }
                WriteOutcome::Stale => {
                    warn!(%report_id, attempt, "stale status write; retrying");
                }
                WriteOutcome::Missing => return Err(ReportLifecycleError::NotFound { report_id }),
            }
        }
        Err(ReportLifecycleError::Contended {
            report_id,
            attempts: MAX_STATUS_WRITE_ATTEMPTS,
        })
    }

    /// Delete a report; only its author may do so.
    pub async fn remove(
        &self,
        report_id: ReportId,
        actor: UserId,
    ) -> Result<(), ReportLifecycleError> {
        let report = self.load(report_id).await?;
        if !report.is_authored_by(&actor) {
            warn!(%report_id, %actor, "deletion refused");
            return Err(ReportLifecycleError::NotAuthor { report_id });
        }

        let deleted = match self.repository.delete(&report_id).await {
            Ok(deleted) => deleted,
            Err(ReportRepositoryError::Referenced { .. }) => {
                return Err(ReportLifecycleError::Referenced { report_id });
            }
            Err(other) => return Err(map_repository_error(other)),
        };
        if !deleted {
            return Err(ReportLifecycleError::NotFound { report_id });
        }

        info!(%report_id, "report deleted");
        self.events
            .emit(ReportEvent::Deleted { report_id, actor })
            .await;
        Ok(())
    }
}

#[async_trait]
impl ReportLifecycle for ReportLifecycleService {
    async fn change_status(&self, request: ChangeStatusRequest) -> Result<Report, Error> {
        Ok(self
            .advance(request.report_id, request.actor, request.target)
            .await?)
    }

    async fn delete(&self, report_id: ReportId, actor: UserId) -> Result<(), Error> {
        Ok(self.remove(report_id, actor).await?)
    }
}

#[async_trait]
impl ReportQuery for ReportLifecycleService {
    async fn get(&self, report_id: ReportId) -> Result<Report, Error> {
        Ok(self.load(report_id).await?)
    }

    async fn list(&self, filter: ReportListFilter) -> Result<ReportPage, Error> {
        self.repository
            .list(&filter)
            .await
            .map_err(|err| Error::from(map_repository_error(err)))
    }
}

#[cfg(test)]
#[path = "report_lifecycle_tests.rs"]
mod tests;
