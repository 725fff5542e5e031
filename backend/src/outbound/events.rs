//! Report events written to the structured log.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ReportEvent;
use crate::domain::ports::{ReportEventPublisher, ReportEventPublisherError};

/// [`ReportEventPublisher`] that records each event as an `info` log line.
///
/// Stands in for a message broker; downstream consumers can tail the JSON
/// log for `event` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReportEventPublisher;

impl TracingReportEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportEventPublisher for TracingReportEventPublisher {
    async fn publish(&self, event: &ReportEvent) -> Result<(), ReportEventPublisherError> {
        match event {
            ReportEvent::Submitted {
                report_id,
                author_id,
                region_code,
            } => info!(
                event = event.kind(),
                %report_id,
                %author_id,
                %region_code,
                "report event"
            ),
            ReportEvent::Revised {
                report_id,
                author_id,
            } => info!(event = event.kind(), %report_id, %author_id, "report event"),
            ReportEvent::StatusChanged {
                report_id,
                actor,
                from,
                to,
            } => info!(
                event = event.kind(),
                %report_id,
                %actor,
                from = from.as_str(),
                to = to.as_str(),
                "report event"
            ),
            ReportEvent::Deleted { report_id, actor } => {
                info!(event = event.kind(), %report_id, %actor, "report event")
            }
        }
        Ok(())
    }
}
