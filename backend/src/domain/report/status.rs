//! Report lifecycle states and the forward-only transition rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a report.
///
/// ```text
/// submitted -> under_verification -> verified -> pending_resolved -> resolved -> archived
/// ```
///
/// Transitions move exactly one step forward. `archived` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Submitted,
    UnderVerification,
    Verified,
    PendingResolved,
    Resolved,
    Archived,
}

impl ReportStatus {
    /// Every state in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Submitted,
        Self::UnderVerification,
        Self::Verified,
        Self::PendingResolved,
        Self::Resolved,
        Self::Archived,
    ];

    /// Return the canonical storage/wire value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::UnderVerification => "under_verification",
            Self::Verified => "verified",
            Self::PendingResolved => "pending_resolved",
            Self::Resolved => "resolved",
            Self::Archived => "archived",
        }
    }

    /// The single state reachable from this one, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Submitted => Some(Self::UnderVerification),
            Self::UnderVerification => Some(Self::Verified),
            Self::Verified => Some(Self::PendingResolved),
            Self::PendingResolved => Some(Self::Resolved),
            Self::Resolved => Some(Self::Archived),
            Self::Archived => None,
        }
    }

    /// Whether a report in this state may move directly to `target`.
    ///
    /// # Examples
    /// ```
    /// use roadwatch::domain::report::ReportStatus;
    ///
    /// assert!(ReportStatus::Verified.can_transition_to(ReportStatus::PendingResolved));
    /// assert!(!ReportStatus::Verified.can_transition_to(ReportStatus::Resolved));
    /// assert!(!ReportStatus::Verified.can_transition_to(ReportStatus::Verified));
    /// ```
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    /// Whether no further transitions are possible.
    pub const fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`ReportStatus`] fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report status: {input}")]
pub struct ParseReportStatusError {
    /// Value that failed to parse.
    pub input: String,
}

impl FromStr for ReportStatus {
    type Err = ParseReportStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseReportStatusError {
                input: s.to_owned(),
            })
    }
}
