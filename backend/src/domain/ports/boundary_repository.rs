//! Port for the administrative boundary dataset.

use async_trait::async_trait;

use crate::domain::RegionCentroid;
use crate::domain::report::RegionCode;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading boundary data.
    pub enum BoundaryRepositoryError {
        /// The dataset could not be reached or loaded.
        Unavailable { message: String } =>
            "boundary dataset unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoundaryRepository: Send + Sync {
    /// Return the centroid for `code`, or `None` when the dataset has no
    /// such region.
    async fn find_centroid(
        &self,
        code: &RegionCode,
    ) -> Result<Option<RegionCentroid>, BoundaryRepositoryError>;
}
