//! Geodesic primitives: coordinates, the national bounding box, and the
//! Haversine distance used for centroid proximity.
//!
//! Everything here is pure computation with no I/O.

mod coordinate;
mod validator;

pub use coordinate::{Axis, BoundingBox, Coordinate, CoordinateError};
pub use validator::{BoundaryViolation, EARTH_RADIUS_METERS, GeoValidator};
