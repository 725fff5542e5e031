//! Driving port for advisory checks a client can run before submitting.
//!
//! These never persist anything and report problems as data rather than as
//! errors; only infrastructure failures surface as [`Error`].

use async_trait::async_trait;

use super::PathPointInput;
use crate::domain::{Error, PhotoValidationResult, RegionCentroid};

/// Location fields to check.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCheckRequest {
    pub region_code: String,
    pub path_points: Vec<PathPointInput>,
}

/// Result of a location check.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCheck {
    /// Whether a submission with this location would pass.
    pub valid: bool,
    /// Human-readable summary of the first problem, or a success note.
    pub message: String,
    pub region_exists: bool,
    pub within_boundaries: bool,
    /// Whether some point lies within the proximity threshold. `true` when
    /// enforcement is disabled and the proximity stage was reached, `false`
    /// whenever an earlier stage failed.
    pub near_centroid: bool,
    pub min_distance_to_centroid_meters: Option<f64>,
    pub centroid: Option<RegionCentroid>,
}

/// Result of a photo check.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoCheck {
    pub all_valid: bool,
    /// One entry per submitted URL, in submission order.
    pub results: Vec<PhotoValidationResult>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreSubmissionCheck: Send + Sync {
    async fn check_location(&self, request: LocationCheckRequest) -> Result<LocationCheck, Error>;

    async fn check_photos(&self, urls: Vec<String>) -> Result<PhotoCheck, Error>;
}
