//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so tests can swap in mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{PreSubmissionCheck, ReportLifecycle, ReportQuery, ReportSubmission};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub submission: Arc<dyn ReportSubmission>,
    pub lifecycle: Arc<dyn ReportLifecycle>,
    pub reports: Arc<dyn ReportQuery>,
    pub checks: Arc<dyn PreSubmissionCheck>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub submission: Arc<dyn ReportSubmission>,
    pub lifecycle: Arc<dyn ReportLifecycle>,
    pub reports: Arc<dyn ReportQuery>,
    pub checks: Arc<dyn PreSubmissionCheck>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            submission,
            lifecycle,
            reports,
            checks,
        } = ports;
        Self {
            submission,
            lifecycle,
            reports,
            checks,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
