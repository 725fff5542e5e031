//! Report lifecycle events and their best-effort dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::domain::UserId;
use crate::domain::ports::ReportEventPublisher;
use crate::domain::report::{RegionCode, ReportId, ReportStatus};

/// Upper bound on how long a core operation waits for the event sink.
pub const DEFAULT_PUBLISH_BUDGET: Duration = Duration::from_secs(2);

/// Something that happened to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Submitted {
        report_id: ReportId,
        author_id: UserId,
        region_code: RegionCode,
    },
    Revised {
        report_id: ReportId,
        author_id: UserId,
    },
    StatusChanged {
        report_id: ReportId,
        actor: UserId,
        from: ReportStatus,
        to: ReportStatus,
    },
    Deleted {
        report_id: ReportId,
        actor: UserId,
    },
}

impl ReportEvent {
    /// Stable event name for sinks and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "report.submitted",
            Self::Revised { .. } => "report.revised",
            Self::StatusChanged { .. } => "report.status_changed",
            Self::Deleted { .. } => "report.deleted",
        }
    }

    pub fn report_id(&self) -> ReportId {
        match self {
            Self::Submitted { report_id, .. }
            | Self::Revised { report_id, .. }
            | Self::StatusChanged { report_id, .. }
            | Self::Deleted { report_id, .. } => *report_id,
        }
    }
}

/// Publishes events without letting the sink affect the caller.
///
/// Failures and slow sinks are logged and swallowed; `emit` never fails.
#[derive(Clone)]
pub struct BestEffortEvents {
    publisher: Arc<dyn ReportEventPublisher>,
    budget: Duration,
}

impl BestEffortEvents {
    pub fn new(publisher: Arc<dyn ReportEventPublisher>) -> Self {
        Self {
            publisher,
            budget: DEFAULT_PUBLISH_BUDGET,
        }
    }

    /// Override how long `emit` waits for the sink.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub async fn emit(&self, event: ReportEvent) {
        match timeout(self.budget, self.publisher.publish(&event)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => warn!(
                event = event.kind(),
                report_id = %event.report_id(),
                %error,
                "report event dropped"
            ),
            Err(_) => warn!(
                event = event.kind(),
                report_id = %event.report_id(),
                budget_ms = self.budget.as_millis() as u64,
                "report event publisher timed out"
            ),
        }
    }
}
