//! Port deciding who may advance a report through its lifecycle.

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::report::{Report, ReportStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by authorization adapters.
    pub enum StatusAuthorizerError {
        /// The identity backend could not be consulted.
        Unavailable { message: String } =>
            "status authorizer unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusChangeAuthorizer: Send + Sync {
    /// Whether `actor` may move `report` to `target`.
    async fn may_change_status(
        &self,
        actor: &UserId,
        report: &Report,
        target: ReportStatus,
    ) -> Result<bool, StatusAuthorizerError>;
}
