//! Advisory location and photo checks for clients filling in a report.
//!
//! Each check runs the same validators as submission but reports the outcome
//! as data, so a form can flag problems before the user submits. The location
//! check runs its stages in submission order and stops at the first failure;
//! flags for stages it never reached stay `false`.

use async_trait::async_trait;

use crate::domain::geo::GeoValidator;
use crate::domain::photo_evidence::PhotoEvidenceValidator;
use crate::domain::ports::{
    LocationCheck, LocationCheckRequest, PhotoCheck, PreSubmissionCheck,
};
use crate::domain::report::{PhotoUrls, RegionCode};
use crate::domain::report_submission::path_from_input;
use crate::domain::{BoundaryLookup, Error, ProximityPolicy};

/// Runs pre-submission checks.
#[derive(Clone)]
pub struct PreSubmissionService {
    geo: GeoValidator,
    boundaries: BoundaryLookup,
    photos: PhotoEvidenceValidator,
    proximity: ProximityPolicy,
}

impl PreSubmissionService {
    pub fn new(
        geo: GeoValidator,
        boundaries: BoundaryLookup,
        photos: PhotoEvidenceValidator,
        proximity: ProximityPolicy,
    ) -> Self {
        Self {
            geo,
            boundaries,
            photos,
            proximity,
        }
    }
}

/// Outcome of a check that stopped before the proximity stage.
fn stopped(message: String, within_boundaries: bool) -> LocationCheck {
    LocationCheck {
        valid: false,
        message,
        region_exists: false,
        within_boundaries,
        near_centroid: false,
        min_distance_to_centroid_meters: None,
        centroid: None,
    }
}

#[async_trait]
impl PreSubmissionCheck for PreSubmissionService {
    async fn check_location(&self, request: LocationCheckRequest) -> Result<LocationCheck, Error> {
        let path = match path_from_input(&request.path_points) {
            Ok(path) => path,
            Err(err) => return Ok(stopped(err.to_string(), false)),
        };
        if let Err(violation) = self.geo.validate_within_boundary(path.points()) {
            return Ok(stopped(violation.to_string(), false));
        }

        let code = match RegionCode::new(request.region_code) {
            Ok(code) => code,
            Err(err) => return Ok(stopped(err.to_string(), true)),
        };
        let centroid = self
            .boundaries
            .get_centroid(&code)
            .await
            .map_err(|err| Error::service_unavailable(format!("boundary lookup failed: {err}")))?;
        let Some(centroid) = centroid else {
            return Ok(stopped(
                format!("region {code} is not in the boundary dataset"),
                true,
            ));
        };

        let distance = self
            .geo
            .min_distance_to_point(path.points(), centroid.point());
        let near_centroid = distance.is_some_and(|meters| self.proximity.allows(meters));
        let message = match distance {
            Some(meters) if !near_centroid => format!(
                "closest point is {meters:.0} m from the region centroid, limit is {:.0} m",
                self.proximity.threshold_meters
            ),
            _ => "location is valid".to_owned(),
        };
        Ok(LocationCheck {
            valid: near_centroid,
            message,
            region_exists: true,
            within_boundaries: true,
            near_centroid,
            min_distance_to_centroid_meters: distance,
            centroid: Some(centroid),
        })
    }

    async fn check_photos(&self, urls: Vec<String>) -> Result<PhotoCheck, Error> {
        let urls = PhotoUrls::new(urls).map_err(|err| Error::invalid_request(err.to_string()))?;
        let results = self.photos.validate_all(urls.as_slice()).await;
        if let Some(outage) = results
            .iter()
            .filter_map(|result| result.rejection())
            .find(|rejection| rejection.is_infrastructure())
        {
            return Err(Error::service_unavailable(outage.to_string()));
        }
        Ok(PhotoCheck {
            all_valid: results.iter().all(|result| result.is_valid()),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::geo::Coordinate;
    use crate::domain::photo_evidence::PhotoPolicy;
    use crate::domain::ports::{
        HostResolverError, MockBoundaryRepository, MockCentroidCache, MockHostResolver,
        MockPhotoProbe, PathPointInput, ProbeResponse,
    };
    use crate::domain::{ErrorCode, RegionCentroid};

    fn boundaries() -> BoundaryLookup {
        let mut repo = MockBoundaryRepository::new();
        repo.expect_find_centroid().returning(|code| {
            Ok((code.as_ref() == "35.10.02.2005").then(|| {
                RegionCentroid::new(Coordinate::new(-7.2575, 112.7521).expect("finite"))
            }))
        });
        let mut cache = MockCentroidCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_put().returning(|_, _| Ok(()));
        BoundaryLookup::new(Arc::new(repo), Arc::new(cache))
    }

    fn photos(resolver: MockHostResolver) -> PhotoEvidenceValidator {
        let mut probe = MockPhotoProbe::new();
        probe.expect_head().returning(|_| {
            Ok(ProbeResponse {
                status: 200,
                location: None,
                content_type: Some("image/png".to_owned()),
                content_length: None,
            })
        });
        PhotoEvidenceValidator::new(Arc::new(resolver), Arc::new(probe), PhotoPolicy::default())
    }

    fn public_resolver() -> MockHostResolver {
        let mut resolver = MockHostResolver::new();
        resolver
            .expect_resolve()
            .returning(|_, _| Ok(vec!["93.184.216.34".parse().expect("ip")]));
        resolver
    }

    fn service(proximity: ProximityPolicy) -> PreSubmissionService {
        PreSubmissionService::new(
            GeoValidator::default(),
            boundaries(),
            photos(public_resolver()),
            proximity,
        )
    }

    fn request(region_code: &str, points: &[(f64, f64)]) -> LocationCheckRequest {
        LocationCheckRequest {
            region_code: region_code.to_owned(),
            path_points: points
                .iter()
                .map(|(lat, lng)| PathPointInput {
                    lat: *lat,
                    lng: *lng,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn valid_location_reports_centroid_and_distance() {
        let check = service(ProximityPolicy::default())
            .check_location(request("35.10.02.2005", &[(-7.2575, 112.7521)]))
            .await
            .expect("check runs");

        assert!(check.valid);
        assert!(check.region_exists && check.within_boundaries && check.near_centroid);
        assert_eq!(check.min_distance_to_centroid_meters, Some(0.0));
        assert_eq!(check.message, "location is valid");
    }

    #[tokio::test]
    async fn out_of_bounds_path_stops_before_the_region_lookup() {
        let check = service(ProximityPolicy::default())
            .check_location(request("35.10.02.2005", &[(10.0, 112.7521)]))
            .await
            .expect("check runs");

        assert!(!check.valid);
        assert!(!check.within_boundaries);
        assert!(!check.region_exists);
        assert!(!check.near_centroid);
        assert!(check.centroid.is_none());
        assert_eq!(check.min_distance_to_centroid_meters, None);
        assert!(check.message.contains("lat"), "{}", check.message);
    }

    #[tokio::test]
    async fn unknown_region_stops_before_proximity() {
        let check = service(ProximityPolicy::enforced(200.0))
            .check_location(request("99.99.99.9999", &[(-7.2575, 112.7521)]))
            .await
            .expect("check runs");

        assert!(!check.valid);
        assert!(check.within_boundaries);
        assert!(!check.region_exists);
        assert!(!check.near_centroid);
        assert_eq!(check.min_distance_to_centroid_meters, None);
        assert!(check.message.contains("99.99.99.9999"), "{}", check.message);
    }

    #[tokio::test]
    async fn distant_path_fails_only_when_proximity_is_enforced() {
        let points = [(-7.2475, 112.7521)];

        let relaxed = service(ProximityPolicy::default())
            .check_location(request("35.10.02.2005", &points))
            .await
            .expect("check runs");
        let strict = service(ProximityPolicy::enforced(200.0))
            .check_location(request("35.10.02.2005", &points))
            .await
            .expect("check runs");

        assert!(relaxed.valid && relaxed.near_centroid);
        assert!(!strict.valid && !strict.near_centroid);
        assert!(strict.min_distance_to_centroid_meters > Some(1_000.0));
    }

    #[tokio::test]
    async fn photo_check_returns_every_verdict() {
        let check = service(ProximityPolicy::default())
            .check_photos(vec![
                "https://example.com/a.png".to_owned(),
                "gopher://example.com/b.png".to_owned(),
            ])
            .await
            .expect("check runs");

        assert!(!check.all_valid);
        let valid: Vec<bool> = check.results.iter().map(|r| r.is_valid()).collect();
        assert_eq!(valid, vec![true, false]);
    }

    #[tokio::test]
    async fn photo_check_rejects_empty_batches() {
        let err = service(ProximityPolicy::default())
            .check_photos(Vec::new())
            .await
            .expect_err("no urls");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn resolver_outage_surfaces_as_service_unavailable() {
        let mut resolver = MockHostResolver::new();
        resolver
            .expect_resolve()
            .returning(|_, _| Err(HostResolverError::unavailable("timeout")));
        let service = PreSubmissionService::new(
            GeoValidator::default(),
            boundaries(),
            photos(resolver),
            ProximityPolicy::default(),
        );

        let err = service
            .check_photos(vec!["https://example.com/a.png".to_owned()])
            .await
            .expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
