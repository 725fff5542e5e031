//! Shared fixtures for domain service tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::UserId;
use crate::domain::report::{
    PhotoUrls, RegionCode, Report, ReportContent, ReportId, ReportPath, ReportStatus, ReportTitle,
};

pub(crate) const KNOWN_REGION: &str = "35.10.02.2005";

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Clock frozen at [`fixture_timestamp`].
pub(crate) struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

pub(crate) fn sample_content() -> ReportContent {
    ReportContent {
        title: ReportTitle::new("Jalan berlubang").expect("title"),
        region_code: RegionCode::new(KNOWN_REGION).expect("code"),
        path: ReportPath::from_pairs(&[(-7.2575, 112.7521)]).expect("path"),
        photo_urls: PhotoUrls::new(vec!["https://example.com/photo1.jpg".to_owned()])
            .expect("photos"),
        description: None,
    }
}

/// A report by `author` walked forward to `status`.
pub(crate) fn report_at(status: ReportStatus, author: UserId) -> Report {
    let mut report = Report::new(ReportId::random(), author, sample_content(), fixture_timestamp());
    for step in ReportStatus::ALL.into_iter().skip(1) {
        if report.status() == status {
            break;
        }
        report
            .transition(step, fixture_timestamp())
            .expect("walk forward");
    }
    report
}
