//! `ReportRepository` held in process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{ReportRepository, ReportRepositoryError, WriteOutcome};
use crate::domain::report::{Report, ReportId, ReportListFilter, ReportPage, ReportStatus};

/// Report store guarded by an async read/write lock.
///
/// Each conditional write compares and swaps under a single write guard, so
/// two racing status changes observe each other.
#[derive(Debug, Default)]
pub struct InMemoryReportRepository {
    reports: RwLock<HashMap<ReportId, Report>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn save(&self, report: &Report) -> Result<(), ReportRepositoryError> {
        let mut reports = self.reports.write().await;
        if reports.contains_key(&report.id()) {
            return Err(ReportRepositoryError::query(format!(
                "report {} already exists",
                report.id()
            )));
        }
        reports.insert(report.id(), report.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report>, ReportRepositoryError> {
        Ok(self.reports.read().await.get(id).cloned())
    }

    async fn list(&self, filter: &ReportListFilter) -> Result<ReportPage, ReportRepositoryError> {
        let reports = self.reports.read().await;
        let mut matching: Vec<&Report> = reports
            .values()
            .filter(|report| filter.matches(report))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(filter.page.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(filter.page.limit() as usize)
            .cloned()
            .collect();
        Ok(ReportPage {
            reports: page,
            total,
        })
    }

    async fn update_status(
        &self,
        id: &ReportId,
        expected: ReportStatus,
        status: ReportStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<WriteOutcome, ReportRepositoryError> {
        let mut reports = self.reports.write().await;
        let Some(stored) = reports.get_mut(id) else {
            return Ok(WriteOutcome::Missing);
        };
        if stored.status() != expected {
            debug!(report_id = %id, stored = %stored.status(), %expected, "stale status write");
            return Ok(WriteOutcome::Stale);
        }
        stored
            .transition(status, updated_at)
            .map_err(|error| ReportRepositoryError::query(error.to_string()))?;
        Ok(WriteOutcome::Applied)
    }

    async fn update(
        &self,
        report: &Report,
        expected: ReportStatus,
    ) -> Result<WriteOutcome, ReportRepositoryError> {
        let mut reports = self.reports.write().await;
        let Some(stored) = reports.get_mut(&report.id()) else {
            return Ok(WriteOutcome::Missing);
        };
        if stored.status() != expected {
            return Ok(WriteOutcome::Stale);
        }
        *stored = report.clone();
        Ok(WriteOutcome::Applied)
    }

    async fn delete(&self, id: &ReportId) -> Result<bool, ReportRepositoryError> {
        Ok(self.reports.write().await.remove(id).is_some())
    }
}
