//! Smart-constructor value types for report fields.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::domain::geo::{Axis, Coordinate};

/// Minimum title length in characters.
pub const TITLE_MIN: usize = 3;
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 500;
/// Minimum number of points in a damage path.
pub const PATH_MIN_POINTS: usize = 1;
/// Maximum number of points in a damage path.
pub const PATH_MAX_POINTS: usize = 100;
/// Minimum number of photo references.
pub const PHOTOS_MIN: usize = 1;
/// Maximum number of photo references.
pub const PHOTOS_MAX: usize = 10;

const REGION_SEGMENT_WIDTHS: [usize; 4] = [2, 2, 2, 4];

/// Field-level validation failures.
///
/// Each variant names the offending field through [`Self::field`]; the
/// `Display` text describes the violated constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportValidationError {
    #[error("title must be between {min} and {max} characters, got {actual}")]
    TitleLength {
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("title must not be blank")]
    TitleBlank,
    #[error("region code must match NN.NN.NN.NNNN, got '{value}'")]
    RegionCodeFormat { value: String },
    #[error("description must be at most {max} characters, got {actual}")]
    DescriptionTooLong { max: usize, actual: usize },
    #[error("path must contain between {min} and {max} points, got {actual}")]
    PathPointCount {
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("path point {index} has a non-finite {axis}")]
    NonFiniteCoordinate { index: usize, axis: Axis },
    #[error("between {min} and {max} photo URLs are required, got {actual}")]
    PhotoCount {
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("status '{value}' is not a recognised lifecycle state")]
    UnknownStatus { value: String },
}

impl ReportValidationError {
    /// Wire name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleLength { .. } | Self::TitleBlank => "title",
            Self::RegionCodeFormat { .. } => "region_code",
            Self::DescriptionTooLong { .. } => "description",
            Self::PathPointCount { .. } | Self::NonFiniteCoordinate { .. } => "path_points",
            Self::PhotoCount { .. } => "photo_urls",
            Self::UnknownStatus { .. } => "status",
        }
    }
}

/// Opaque report identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportId(Uuid);

impl ReportId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Report title: 3 to 100 characters and not blank.
///
/// # Examples
/// ```
/// use roadwatch::domain::report::ReportTitle;
///
/// assert!(ReportTitle::new("Jalan berlubang").is_ok());
/// assert!(ReportTitle::new("ab").is_err());
/// assert!(ReportTitle::new("     ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTitle(String);

impl ReportTitle {
    /// Validate and construct a title.
    pub fn new(title: impl Into<String>) -> Result<Self, ReportValidationError> {
        let title = title.into();
        let actual = title.chars().count();
        if !(TITLE_MIN..=TITLE_MAX).contains(&actual) {
            return Err(ReportValidationError::TitleLength {
                min: TITLE_MIN,
                max: TITLE_MAX,
                actual,
            });
        }
        if title.trim().is_empty() {
            return Err(ReportValidationError::TitleBlank);
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for ReportTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hierarchical administrative code `province.district.subdistrict.village`.
///
/// Only the shape is validated here; whether the region exists is a
/// question for the boundary lookup.
///
/// # Examples
/// ```
/// use roadwatch::domain::report::RegionCode;
///
/// let code = RegionCode::new("35.10.02.2005").expect("well-formed");
/// assert_eq!(code.province(), "35");
/// assert_eq!(code.village(), "2005");
/// assert!(RegionCode::new("35.10.2.2005").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionCode(String);

impl RegionCode {
    /// Validate and construct a region code.
    pub fn new(code: impl Into<String>) -> Result<Self, ReportValidationError> {
        let code = code.into();
        if Self::is_well_formed(&code) {
            Ok(Self(code))
        } else {
            Err(ReportValidationError::RegionCodeFormat { value: code })
        }
    }

    fn is_well_formed(code: &str) -> bool {
        let segments: Vec<&str> = code.split('.').collect();
        segments.len() == REGION_SEGMENT_WIDTHS.len()
            && segments
                .iter()
                .zip(REGION_SEGMENT_WIDTHS)
                .all(|(segment, width)| {
                    segment.len() == width && segment.bytes().all(|b| b.is_ascii_digit())
                })
    }

    fn segment(&self, index: usize) -> &str {
        self.0.split('.').nth(index).unwrap_or_default()
    }

    /// Two-digit province segment.
    pub fn province(&self) -> &str {
        self.segment(0)
    }

    /// Two-digit district segment.
    pub fn district(&self) -> &str {
        self.segment(1)
    }

    /// Two-digit subdistrict segment.
    pub fn subdistrict(&self) -> &str {
        self.segment(2)
    }

    /// Four-digit village segment.
    pub fn village(&self) -> &str {
        self.segment(3)
    }
}

impl AsRef<str> for RegionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RegionCode {
    type Err = ReportValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Free-text description of at most 500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDescription(String);

impl ReportDescription {
    /// Validate and construct a description.
    pub fn new(description: impl Into<String>) -> Result<Self, ReportValidationError> {
        let description = description.into();
        let actual = description.chars().count();
        if actual > DESCRIPTION_MAX {
            return Err(ReportValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX,
                actual,
            });
        }
        Ok(Self(description))
    }
}

impl AsRef<str> for ReportDescription {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered damage path of 1 to 100 points.
///
/// Point order traces the damaged segment and is preserved verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPath(Vec<Coordinate>);

impl ReportPath {
    /// Validate the point count and construct a path.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, ReportValidationError> {
        let actual = points.len();
        if !(PATH_MIN_POINTS..=PATH_MAX_POINTS).contains(&actual) {
            return Err(ReportValidationError::PathPointCount {
                min: PATH_MIN_POINTS,
                max: PATH_MAX_POINTS,
                actual,
            });
        }
        Ok(Self(points))
    }

    /// Build a path from raw `(lat, lng)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, ReportValidationError> {
        let points = pairs
            .iter()
            .enumerate()
            .map(|(index, (lat, lng))| {
                Coordinate::new(*lat, *lng).map_err(|err| match err {
                    crate::domain::geo::CoordinateError::NonFinite { axis } => {
                        ReportValidationError::NonFiniteCoordinate { index, axis }
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points)
    }

    /// Points in submission order.
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }
}

/// Between 1 and 10 photo URLs, as submitted.
///
/// Count only; each URL is vetted separately by the photo evidence
/// validator before a report may reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUrls(Vec<String>);

impl PhotoUrls {
    /// Validate the count and construct the set.
    pub fn new(urls: Vec<String>) -> Result<Self, ReportValidationError> {
        let actual = urls.len();
        if !(PHOTOS_MIN..=PHOTOS_MAX).contains(&actual) {
            return Err(ReportValidationError::PhotoCount {
                min: PHOTOS_MIN,
                max: PHOTOS_MAX,
                actual,
            });
        }
        Ok(Self(urls))
    }

    /// URLs in submission order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
