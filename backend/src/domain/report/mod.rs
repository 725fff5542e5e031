//! Road-damage report aggregate and its validated value types.
//!
//! Raw request strings never reach the aggregate directly: every field is
//! wrapped in a type that can only be built through a validating
//! constructor.

mod aggregate;
mod query;
mod status;
mod values;

pub use aggregate::{InvalidTransition, Report, ReportContent, ReportNotEditable};
pub use query::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, PageRequest, ReportListFilter, ReportPage,
};
pub use status::{ParseReportStatusError, ReportStatus};
pub use values::{
    DESCRIPTION_MAX, PATH_MAX_POINTS, PATH_MIN_POINTS, PHOTOS_MAX, PHOTOS_MIN, PhotoUrls,
    RegionCode, ReportDescription, ReportId, ReportPath, ReportTitle, ReportValidationError,
    TITLE_MAX, TITLE_MIN,
};
