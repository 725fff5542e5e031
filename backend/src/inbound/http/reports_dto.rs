//! Report request and response bodies.
//!
//! Field names are snake_case. Paths go out as GeoJSON `LineString`s, so
//! coordinates are `[lng, lat]` pairs, while requests take `{lat, lng}`
//! objects.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    LocationCheck, LocationCheckRequest, PathPointInput, PhotoCheck, ReportDraft,
};
use crate::domain::report::{PageRequest, Report, ReportPage};
use crate::domain::{PhotoValidationResult, RegionCentroid};

#[derive(Debug, Deserialize)]
pub(super) struct ReportPath {
    pub(super) id: String,
}

/// One path point in a request.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct PathPointBody {
    #[schema(example = -7.2575)]
    pub lat: f64,
    #[schema(example = 112.7521)]
    pub lng: f64,
}

/// Report fields for submission and revision.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReportDraftBody {
    #[schema(example = "Jalan berlubang")]
    pub title: String,
    #[schema(example = "35.10.02.2005")]
    pub region_code: String,
    #[schema(max_items = 100)]
    pub path_points: Vec<PathPointBody>,
    #[schema(max_items = 10)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<ReportDraftBody> for ReportDraft {
    fn from(body: ReportDraftBody) -> Self {
        Self {
            title: body.title,
            region_code: body.region_code,
            path_points: points_from_body(&body.path_points),
            photo_urls: body.photo_urls,
            description: body.description,
        }
    }
}

fn points_from_body(points: &[PathPointBody]) -> Vec<PathPointInput> {
    points
        .iter()
        .map(|point| PathPointInput {
            lat: point.lat,
            lng: point.lng,
        })
        .collect()
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LineStringBody {
    #[serde(rename = "type")]
    #[schema(example = "LineString")]
    pub kind: String,
    /// `[lng, lat]` pairs in path order.
    pub coordinates: Vec<[f64; 2]>,
}

/// A stored report.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReportBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub title: String,
    pub region_code: String,
    pub path: LineStringBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub photo_urls: Vec<String>,
    #[schema(format = "uuid")]
    pub author_id: String,
    #[schema(example = "submitted")]
    pub status: String,
    #[schema(format = "date-time")]
    pub created_at: String,
    #[schema(format = "date-time")]
    pub updated_at: String,
}

impl From<&Report> for ReportBody {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id().to_string(),
            title: report.title().as_ref().to_owned(),
            region_code: report.region_code().to_string(),
            path: LineStringBody {
                kind: "LineString".to_owned(),
                coordinates: report
                    .path()
                    .points()
                    .iter()
                    .map(|point| [point.lng(), point.lat()])
                    .collect(),
            },
            description: report.description().map(|d| d.as_ref().to_owned()),
            photo_urls: report.photo_urls().as_slice().to_vec(),
            author_id: report.author_id().to_string(),
            status: report.status().as_str().to_owned(),
            created_at: report.created_at().to_rfc3339(),
            updated_at: report.updated_at().to_rfc3339(),
        }
    }
}

/// Listing filters and pagination.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportListQuery {
    /// Lifecycle state, e.g. `verified`.
    pub status: Option<String>,
    /// Region code `PP.DD.SS.VVVV`.
    pub region_code: Option<String>,
    #[param(format = "uuid")]
    pub author_id: Option<String>,
    /// Page size; defaults to 20 and is clamped to 100.
    pub limit: Option<i64>,
    /// Reports to skip; negative values count as zero.
    pub offset: Option<i64>,
}

/// Pagination metadata for a listing.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginationBody {
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
    /// One-based page number.
    pub page: u64,
}

/// One page of reports.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReportListBody {
    pub reports: Vec<ReportBody>,
    pub pagination: PaginationBody,
}

impl ReportListBody {
    pub(super) fn new(page: &ReportPage, request: PageRequest) -> Self {
        Self {
            reports: page.reports.iter().map(ReportBody::from).collect(),
            pagination: PaginationBody {
                total: page.total,
                limit: request.limit(),
                offset: request.offset(),
                page: request.page(),
            },
        }
    }
}

/// Requested next lifecycle state.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ChangeStatusBody {
    #[schema(example = "under_verification")]
    pub status: String,
}

/// Location fields to check before submitting.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LocationCheckBody {
    pub region_code: String,
    pub path_points: Vec<PathPointBody>,
}

impl From<LocationCheckBody> for LocationCheckRequest {
    fn from(body: LocationCheckBody) -> Self {
        Self {
            region_code: body.region_code,
            path_points: points_from_body(&body.path_points),
        }
    }
}

/// Region centroid in a location check.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct CentroidBody {
    pub lat: f64,
    pub lng: f64,
}

impl From<RegionCentroid> for CentroidBody {
    fn from(centroid: RegionCentroid) -> Self {
        Self {
            lat: centroid.lat(),
            lng: centroid.lng(),
        }
    }
}

/// Outcome of a location check.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LocationCheckResponseBody {
    pub valid: bool,
    pub message: String,
    pub region_exists: bool,
    pub within_boundaries: bool,
    pub near_centroid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_distance_to_centroid_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centroid: Option<CentroidBody>,
}

impl From<LocationCheck> for LocationCheckResponseBody {
    fn from(check: LocationCheck) -> Self {
        Self {
            valid: check.valid,
            message: check.message,
            region_exists: check.region_exists,
            within_boundaries: check.within_boundaries,
            near_centroid: check.near_centroid,
            min_distance_to_centroid_meters: check.min_distance_to_centroid_meters,
            centroid: check.centroid.map(CentroidBody::from),
        }
    }
}

/// Photo URLs to check before submitting.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PhotoCheckBody {
    #[schema(max_items = 10)]
    pub photo_urls: Vec<String>,
}

/// Verdict for one photo URL.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PhotoResultBody {
    pub url: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Machine-readable rejection code, e.g. `blocked_address`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&PhotoValidationResult> for PhotoResultBody {
    fn from(result: &PhotoValidationResult) -> Self {
        match &result.outcome {
            Ok(evidence) => Self {
                url: result.url.clone(),
                valid: true,
                content_type: Some(evidence.content_type.clone()),
                size_bytes: evidence.size_bytes,
                reason: None,
                message: None,
            },
            Err(rejection) => Self {
                url: result.url.clone(),
                valid: false,
                content_type: None,
                size_bytes: None,
                reason: Some(rejection.code().to_owned()),
                message: Some(rejection.to_string()),
            },
        }
    }
}

/// Outcome of a photo check, one result per URL in request order.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PhotoCheckResponseBody {
    pub all_valid: bool,
    pub results: Vec<PhotoResultBody>,
}

impl From<PhotoCheck> for PhotoCheckResponseBody {
    fn from(check: PhotoCheck) -> Self {
        Self {
            all_valid: check.all_valid,
            results: check.results.iter().map(PhotoResultBody::from).collect(),
        }
    }
}
