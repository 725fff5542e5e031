//! Coordinate and bounding box value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis of a coordinate, used to pinpoint boundary failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Latitude in decimal degrees.
    Lat,
    /// Longitude in decimal degrees.
    Lng,
}

impl Axis {
    /// Wire name of the axis.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lat => "lat",
            Self::Lng => "lng",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while constructing a [`Coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("{axis} must be a finite number")]
    NonFinite { axis: Axis },
}

/// WGS84 point in decimal degrees.
///
/// Only finiteness is enforced here. Whether the point lies inside the
/// service area is a separate check so failures can name the offending
/// index within a path.
///
/// # Examples
/// ```
/// use roadwatch::domain::geo::Coordinate;
///
/// let point = Coordinate::new(-7.2575, 112.7521).expect("finite point");
/// assert_eq!(point.lat(), -7.2575);
/// assert!(Coordinate::new(f64::NAN, 112.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinateDto", into = "CoordinateDto")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Validate and construct a coordinate.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() {
            return Err(CoordinateError::NonFinite { axis: Axis::Lat });
        }
        if !lng.is_finite() {
            return Err(CoordinateError::NonFinite { axis: Axis::Lng });
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Value along the requested axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Lat => self.lat,
            Axis::Lng => self.lng,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

#[derive(Serialize, Deserialize)]
struct CoordinateDto {
    lat: f64,
    lng: f64,
}

impl From<Coordinate> for CoordinateDto {
    fn from(value: Coordinate) -> Self {
        Self {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

impl TryFrom<CoordinateDto> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: CoordinateDto) -> Result<Self, Self::Error> {
        Self::new(value.lat, value.lng)
    }
}

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
}

impl BoundingBox {
    /// Indonesian national bounding box: lat [-11, 6], lng [95, 141].
    pub const INDONESIA: Self = Self {
        min_lat: -11.0,
        max_lat: 6.0,
        min_lng: 95.0,
        max_lng: 141.0,
    };

    /// Build a box from inclusive ranges; returns `None` for inverted or
    /// non-finite bounds.
    pub fn new(lat: (f64, f64), lng: (f64, f64)) -> Option<Self> {
        let (min_lat, max_lat) = lat;
        let (min_lng, max_lng) = lng;
        let finite = [min_lat, max_lat, min_lng, max_lng]
            .into_iter()
            .all(f64::is_finite);
        if !finite || min_lat > max_lat || min_lng > max_lng {
            return None;
        }
        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Inclusive range for one axis.
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::Lat => (self.min_lat, self.max_lat),
            Axis::Lng => (self.min_lng, self.max_lng),
        }
    }

    /// First axis on which `point` falls outside the box, if any.
    pub fn violated_axis(&self, point: &Coordinate) -> Option<Axis> {
        [Axis::Lat, Axis::Lng].into_iter().find(|axis| {
            let (min, max) = self.range(*axis);
            !(min..=max).contains(&point.along(*axis))
        })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::INDONESIA
    }
}
