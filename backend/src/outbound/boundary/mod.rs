//! Region centroid dataset read from a JSON file.
//!
//! The file maps region codes to centroids:
//!
//! ```json
//! { "35.10.02.2005": { "name": "Kelurahan Contoh", "lat": -7.2575, "lng": 112.7521 } }
//! ```
//!
//! It is loaded once at startup. Any malformed entry aborts the load so a
//! half-read dataset never serves lookups.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::RegionCentroid;
use crate::domain::geo::{Coordinate, CoordinateError};
use crate::domain::ports::{BoundaryRepository, BoundaryRepositoryError};
use crate::domain::report::{RegionCode, ReportValidationError};

/// Errors raised while loading the boundary dataset.
#[derive(Debug, Error)]
pub enum BoundaryDatasetError {
    /// The dataset file could not be read.
    #[error("failed to read boundary dataset at {path}: {source}")]
    Read {
        /// Path to the dataset file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file is not a JSON object of centroid records.
    #[error("boundary dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A key is not a well-formed region code.
    #[error("boundary dataset key {key:?} is not a region code: {source}")]
    InvalidCode {
        key: String,
        #[source]
        source: ReportValidationError,
    },
    /// A centroid is not a finite point.
    #[error("boundary dataset entry {key} has an invalid centroid: {source}")]
    InvalidCentroid {
        key: String,
        #[source]
        source: CoordinateError,
    },
}

#[derive(Debug, Deserialize)]
struct CentroidRecord {
    lat: f64,
    lng: f64,
}

/// Immutable in-memory [`BoundaryRepository`].
#[derive(Debug, Clone, Default)]
pub struct JsonBoundaryDataset {
    centroids: HashMap<RegionCode, RegionCentroid>,
}

impl JsonBoundaryDataset {
    /// Load and validate the dataset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryDatasetError`] when the file is unreadable or any
    /// entry is malformed.
    pub fn load(path: &Path) -> Result<Self, BoundaryDatasetError> {
        let contents = read_dataset(path).map_err(|source| BoundaryDatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a dataset from its JSON text.
    ///
    /// # Examples
    /// ```
    /// use roadwatch::outbound::boundary::JsonBoundaryDataset;
    ///
    /// let dataset = JsonBoundaryDataset::from_json_str(
    ///     r#"{"35.10.02.2005": {"lat": -7.2575, "lng": 112.7521}}"#,
    /// )
    /// .expect("valid dataset");
    /// assert_eq!(dataset.len(), 1);
    /// ```
    pub fn from_json_str(contents: &str) -> Result<Self, BoundaryDatasetError> {
        let records: HashMap<String, CentroidRecord> = serde_json::from_str(contents)?;
        let mut centroids = HashMap::with_capacity(records.len());
        for (key, record) in records {
            let point = match Coordinate::new(record.lat, record.lng) {
                Ok(point) => point,
                Err(source) => return Err(BoundaryDatasetError::InvalidCentroid { key, source }),
            };
            let code = match RegionCode::new(key.as_str()) {
                Ok(code) => code,
                Err(source) => return Err(BoundaryDatasetError::InvalidCode { key, source }),
            };
            centroids.insert(code, RegionCentroid::new(point));
        }
        Ok(Self { centroids })
    }

    /// Number of regions in the dataset.
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }
}

fn read_dataset(path: &Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "boundary dataset path must name a file",
        )
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(Path::new(file_name))
}

#[async_trait]
impl BoundaryRepository for JsonBoundaryDataset {
    async fn find_centroid(
        &self,
        code: &RegionCode,
    ) -> Result<Option<RegionCentroid>, BoundaryRepositoryError> {
        Ok(self.centroids.get(code).copied())
    }
}
