//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (storage, boundary data, DNS, probing, events) expose typed
//! errors that services map into [`crate::domain::Error`]. Driving ports are
//! what inbound adapters call and already speak in domain errors.

mod macros;
pub(crate) use macros::define_port_error;

mod boundary_repository;
mod centroid_cache;
mod host_resolver;
mod photo_probe;
mod pre_submission_check;
mod report_event_publisher;
mod report_lifecycle;
mod report_query;
mod report_repository;
mod report_submission;
mod status_authorizer;

#[cfg(test)]
pub use boundary_repository::MockBoundaryRepository;
pub use boundary_repository::{BoundaryRepository, BoundaryRepositoryError};
#[cfg(test)]
pub use centroid_cache::MockCentroidCache;
pub use centroid_cache::{CentroidCache, CentroidCacheError};
#[cfg(test)]
pub use host_resolver::MockHostResolver;
pub use host_resolver::{HostResolver, HostResolverError};
#[cfg(test)]
pub use photo_probe::MockPhotoProbe;
pub use photo_probe::{PhotoProbe, PhotoProbeError, ProbeRequest, ProbeResponse};
#[cfg(test)]
pub use pre_submission_check::MockPreSubmissionCheck;
pub use pre_submission_check::{LocationCheck, LocationCheckRequest, PhotoCheck, PreSubmissionCheck};
#[cfg(test)]
pub use report_event_publisher::MockReportEventPublisher;
pub use report_event_publisher::{ReportEventPublisher, ReportEventPublisherError};
#[cfg(test)]
pub use report_lifecycle::MockReportLifecycle;
pub use report_lifecycle::{ChangeStatusRequest, ReportLifecycle};
#[cfg(test)]
pub use report_query::MockReportQuery;
pub use report_query::ReportQuery;
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::{ReportRepository, ReportRepositoryError, WriteOutcome};
#[cfg(test)]
pub use report_submission::MockReportSubmission;
pub use report_submission::{
    PathPointInput, ReportDraft, ReportSubmission, ReviseReportRequest, SubmitReportRequest,
};
#[cfg(test)]
pub use status_authorizer::MockStatusChangeAuthorizer;
pub use status_authorizer::{StatusAuthorizerError, StatusChangeAuthorizer};
