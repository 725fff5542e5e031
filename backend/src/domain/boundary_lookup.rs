//! Region centroid lookup with a read-through cache.
//!
//! Unknown regions are an ordinary answer (`Ok(None)`), not an error, and are
//! never cached so a dataset refresh makes them visible immediately. Cache
//! failures degrade to a direct dataset read.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::geo::Coordinate;
use crate::domain::ports::{BoundaryRepository, BoundaryRepositoryError, CentroidCache};
use crate::domain::report::RegionCode;

/// Reference point of an administrative region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionCentroid(Coordinate);

impl RegionCentroid {
    pub fn new(point: Coordinate) -> Self {
        Self(point)
    }

    pub fn point(&self) -> Coordinate {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.0.lat()
    }

    pub fn lng(&self) -> f64 {
        self.0.lng()
    }
}

/// Resolves region codes to centroids.
#[derive(Clone)]
pub struct BoundaryLookup {
    repository: Arc<dyn BoundaryRepository>,
    cache: Arc<dyn CentroidCache>,
}

impl BoundaryLookup {
    pub fn new(repository: Arc<dyn BoundaryRepository>, cache: Arc<dyn CentroidCache>) -> Self {
        Self { repository, cache }
    }

    /// Centroid for `code`, or `None` if the region is unknown.
    ///
    /// # Errors
    ///
    /// Only dataset outages are errors.
    pub async fn get_centroid(
        &self,
        code: &RegionCode,
    ) -> Result<Option<RegionCentroid>, BoundaryRepositoryError> {
        match self.cache.get(code).await {
            Ok(Some(centroid)) => return Ok(Some(centroid)),
            Ok(None) => {}
            Err(error) => warn!(region_code = %code, %error, "centroid cache read failed"),
        }

        let Some(centroid) = self.repository.find_centroid(code).await? else {
            debug!(region_code = %code, "region not found in boundary dataset");
            return Ok(None);
        };
        if let Err(error) = self.cache.put(code, centroid).await {
            warn!(region_code = %code, %error, "centroid cache write failed");
        }
        Ok(Some(centroid))
    }

    /// Whether the dataset knows `code`.
    pub async fn exists(&self, code: &RegionCode) -> Result<bool, BoundaryRepositoryError> {
        Ok(self.get_centroid(code).await?.is_some())
    }
}
