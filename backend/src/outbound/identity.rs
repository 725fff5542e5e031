//! Status-change authorization from a configured verifier list.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::ports::{StatusChangeAuthorizer, StatusAuthorizerError};
use crate::domain::report::{Report, ReportStatus};

/// Allows configured verifiers to advance any report and refuses everyone
/// else, authors included.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredStatusAuthorizer {
    verifiers: HashSet<UserId>,
}

impl ConfiguredStatusAuthorizer {
    pub fn new(verifiers: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            verifiers: verifiers.into_iter().collect(),
        }
    }

    /// Number of users allowed to change statuses.
    pub fn verifier_count(&self) -> usize {
        self.verifiers.len()
    }
}

#[async_trait]
impl StatusChangeAuthorizer for ConfiguredStatusAuthorizer {
    async fn may_change_status(
        &self,
        actor: &UserId,
        _report: &Report,
        _target: ReportStatus,
    ) -> Result<bool, StatusAuthorizerError> {
        Ok(self.verifiers.contains(actor))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::test_fixtures::report_at;

    #[rstest]
    #[tokio::test]
    async fn verifiers_may_advance_reports() {
        let verifier = UserId::random();
        let authorizer = ConfiguredStatusAuthorizer::new([verifier]);
        let report = report_at(ReportStatus::Submitted, UserId::random());

        let allowed = authorizer
            .may_change_status(&verifier, &report, ReportStatus::UnderVerification)
            .await
            .expect("decision");
        assert!(allowed);
    }

    #[rstest]
    #[tokio::test]
    async fn authors_are_not_verifiers() {
        let author = UserId::random();
        let authorizer = ConfiguredStatusAuthorizer::new([UserId::random()]);
        let report = report_at(ReportStatus::Submitted, author);

        let allowed = authorizer
            .may_change_status(&author, &report, ReportStatus::UnderVerification)
            .await
            .expect("decision");
        assert!(!allowed);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_list_refuses_everyone() {
        let authorizer = ConfiguredStatusAuthorizer::default();
        let report = report_at(ReportStatus::Verified, UserId::random());

        let allowed = authorizer
            .may_change_status(report.author_id(), &report, ReportStatus::PendingResolved)
            .await
            .expect("decision");
        assert!(!allowed);
        assert_eq!(authorizer.verifier_count(), 0);
    }
}
