//! Port interface for caching region centroids.
use async_trait::async_trait;

use crate::domain::RegionCentroid;
use crate::domain::report::RegionCode;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum CentroidCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "centroid cache backend failure: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CentroidCache: Send + Sync {
    /// Read a cached centroid.
    async fn get(&self, code: &RegionCode) -> Result<Option<RegionCentroid>, CentroidCacheError>;

    /// Store a centroid under `code`.
    async fn put(
        &self,
        code: &RegionCode,
        centroid: RegionCentroid,
    ) -> Result<(), CentroidCacheError>;
}
