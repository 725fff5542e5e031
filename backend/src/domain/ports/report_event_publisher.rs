//! Outbound channel for report lifecycle events.
//!
//! Delivery is best effort: the domain logs publish failures and carries on.

use async_trait::async_trait;

use crate::domain::ReportEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by event publishers.
    pub enum ReportEventPublisherError {
        /// The event sink rejected or dropped the event.
        Delivery { message: String } => "report event delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportEventPublisher: Send + Sync {
    async fn publish(&self, event: &ReportEvent) -> Result<(), ReportEventPublisherError>;
}
