//! In-process centroid cache backed by `moka`.
//!
//! Entries expire after a fixed TTL and the cache holds at most `capacity`
//! regions; moka evicts the least useful entries once it is full. The adapter
//! never fails, so the domain's miss-on-error path is only exercised by
//! remote backends.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::RegionCentroid;
use crate::domain::ports::{CentroidCache, CentroidCacheError};
use crate::domain::report::RegionCode;

/// Default time a centroid stays cached.
pub const DEFAULT_CENTROID_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Default number of regions kept in memory.
pub const DEFAULT_CENTROID_CAPACITY: u64 = 10_000;

/// TTL-bounded [`CentroidCache`].
#[derive(Clone)]
pub struct MokaCentroidCache {
    inner: Cache<RegionCode, RegionCentroid>,
}

impl MokaCentroidCache {
    /// Build a cache with the given entry lifetime and size bound.
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }
}

impl Default for MokaCentroidCache {
    fn default() -> Self {
        Self::new(DEFAULT_CENTROID_TTL, DEFAULT_CENTROID_CAPACITY)
    }
}

#[async_trait]
impl CentroidCache for MokaCentroidCache {
    async fn get(&self, code: &RegionCode) -> Result<Option<RegionCentroid>, CentroidCacheError> {
        Ok(self.inner.get(code).await)
    }

    async fn put(
        &self,
        code: &RegionCode,
        centroid: RegionCentroid,
    ) -> Result<(), CentroidCacheError> {
        self.inner.insert(code.clone(), centroid).await;
        Ok(())
    }
}
