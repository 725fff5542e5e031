//! Domain primitives, services, and ports for road-damage reporting.
//!
//! Purpose: hold every business rule independent of transport and storage.
//! Validated value types can only be built through their smart
//! constructors, and services receive their collaborators explicitly.
//!
//! Public surface:
//! - Error / ErrorCode: API-facing error payload and stable identifiers.
//! - geo: coordinates, bounding box and Haversine distance.
//! - report: the report aggregate, value types and lifecycle states.
//! - photo_evidence: SSRF-safe vetting of photo URLs.
//! - Services: [`ReportSubmissionService`], [`ReportLifecycleService`],
//!   [`PreSubmissionService`], [`BoundaryLookup`].

pub mod boundary_lookup;
pub mod error;
pub mod geo;
pub mod photo_evidence;
pub mod ports;
pub mod pre_submission;
pub mod report;
pub mod report_events;
pub mod report_lifecycle;
pub mod report_submission;
pub mod trace_id;
pub mod user;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::boundary_lookup::{BoundaryLookup, RegionCentroid};
pub use self::error::{Error, ErrorCode};
pub use self::photo_evidence::{PhotoEvidenceValidator, PhotoPolicy, PhotoValidationResult};
pub use self::pre_submission::PreSubmissionService;
pub use self::report_events::{BestEffortEvents, ReportEvent};
pub use self::report_lifecycle::{ReportLifecycleError, ReportLifecycleService};
pub use self::report_submission::{
    ProximityPolicy, ReportSubmissionDeps, ReportSubmissionError, ReportSubmissionService,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdValidationError};
