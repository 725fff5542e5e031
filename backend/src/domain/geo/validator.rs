//! Boundary checks and great-circle distances.

use super::{Axis, BoundingBox, Coordinate};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A path point lying outside the service bounding box.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("point {index} has {axis}={value}, outside the allowed range [{min}, {max}]")]
pub struct BoundaryViolation {
    /// Zero-based index of the offending point.
    pub index: usize,
    /// Axis that is out of range.
    pub axis: Axis,
    /// Offending value.
    pub value: f64,
    /// Inclusive lower bound for the axis.
    pub min: f64,
    /// Inclusive upper bound for the axis.
    pub max: f64,
}

/// Stateless geodesic validator.
///
/// Constructed once and handed to the services that need it; the bounding
/// box is a constructor argument rather than ambient state.
///
/// # Examples
/// ```
/// use roadwatch::domain::geo::{Coordinate, GeoValidator};
///
/// let geo = GeoValidator::default();
/// let surabaya = Coordinate::new(-7.2575, 112.7521).expect("finite");
/// assert!(geo.validate_within_boundary(&[surabaya]).is_ok());
/// assert_eq!(geo.distance_meters(surabaya, surabaya), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoValidator {
    bounds: BoundingBox,
}

impl GeoValidator {
    /// Validator over an explicit bounding box.
    pub fn new(bounds: BoundingBox) -> Self {
        Self { bounds }
    }

    /// Bounding box enforced by this validator.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Fail on the first point outside the bounding box.
    ///
    /// Latitude is checked before longitude for each point. An empty slice
    /// passes; path length rules belong to the report.
    pub fn validate_within_boundary(&self, points: &[Coordinate]) -> Result<(), BoundaryViolation> {
        for (index, point) in points.iter().enumerate() {
            if let Some(axis) = self.bounds.violated_axis(point) {
                let (min, max) = self.bounds.range(axis);
                return Err(BoundaryViolation {
                    index,
                    axis,
                    value: point.along(axis),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Deltas are taken as absolute values so the result is bit-for-bit
    /// symmetric in its arguments.
    pub fn distance_meters(&self, a: Coordinate, b: Coordinate) -> f64 {
        let lat1 = a.lat().to_radians();
        let lat2 = b.lat().to_radians();
        let d_lat = (a.lat() - b.lat()).abs().to_radians();
        let d_lng = (a.lng() - b.lng()).abs().to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS_METERS * c
    }

    /// Smallest distance from any point to `reference`; `None` for an empty
    /// slice.
    pub fn min_distance_to_point(&self, points: &[Coordinate], reference: Coordinate) -> Option<f64> {
        points
            .iter()
            .map(|point| self.distance_meters(*point, reference))
            .reduce(f64::min)
    }
}
