//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `ROADWATCH_*` environment variables, an optional config
//! file and CLI flags. Missing values fall back to defaults through the
//! accessor methods; [`RoadwatchSettings::validate`] turns the raw values into
//! domain policies and rejects anything the service cannot run with.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::photo_evidence::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_REDIRECTS, DEFAULT_PROBE_TIMEOUT,
};
use crate::domain::report_submission::{
    DEFAULT_PROXIMITY_THRESHOLD_METERS, DEFAULT_SUBMISSION_DEADLINE,
};
use crate::domain::{PhotoPolicy, ProximityPolicy, UserId, UserIdValidationError};
use crate::outbound::cache::{DEFAULT_CENTROID_CAPACITY, DEFAULT_CENTROID_TTL};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_BOUNDARY_DATASET_PATH: &str = "fixtures/region_centroids.json";

/// A list given either as one comma-separated string or as a sequence.
///
/// The environment layer splits comma-bearing values into sequences while
/// config files and single values arrive as plain strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringList {
    Joined(String),
    Items(Vec<String>),
}

impl From<StringList> for Vec<String> {
    fn from(list: StringList) -> Self {
        match list {
            StringList::Joined(raw) => raw.split(',').map(str::to_owned).collect(),
            StringList::Items(items) => items,
        }
    }
}

fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringList>::deserialize(deserializer)?.map(Vec::from))
}

/// Raw configuration values.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROADWATCH")]
pub struct RoadwatchSettings {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// Region centroid dataset (JSON).
    pub boundary_dataset_path: Option<PathBuf>,
    pub centroid_cache_ttl_secs: Option<u64>,
    pub centroid_cache_capacity: Option<u64>,
    /// Hard timeout for each photo probe.
    pub photo_probe_timeout_secs: Option<u64>,
    pub photo_max_redirects: Option<usize>,
    /// Photo URLs probed in parallel per submission.
    pub photo_concurrency: Option<usize>,
    /// Require a path point near the region centroid.
    #[ortho_config(default = false)]
    pub proximity_check_enabled: bool,
    pub proximity_threshold_meters: Option<f64>,
    /// Upper bound on a whole submission, photo probes included.
    pub submission_deadline_secs: Option<u64>,
    /// User ids allowed to advance report statuses, comma-separated in the
    /// environment.
    #[serde(default, deserialize_with = "string_list")]
    pub verifier_ids: Option<Vec<String>>,
    /// Cookie signing key file.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key outside debug builds.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    pub session_cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
}

/// Errors raised while validating configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value parsed but is outside the accepted range.
    #[error("invalid value for {key}='{value}'; expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    /// A verifier id is not a user id.
    #[error("invalid verifier id '{value}': {source}")]
    InvalidVerifierId {
        value: String,
        #[source]
        source: UserIdValidationError,
    },
}

/// Validated settings for wiring the service.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub bind_addr: SocketAddr,
    pub boundary_dataset_path: PathBuf,
    pub centroid_cache_ttl: Duration,
    pub centroid_cache_capacity: u64,
    pub photo_policy: PhotoPolicy,
    pub proximity: ProximityPolicy,
    pub submission_deadline: Duration,
    pub verifier_ids: Vec<UserId>,
}

impl RoadwatchSettings {
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn boundary_dataset_path(&self) -> PathBuf {
        self.boundary_dataset_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BOUNDARY_DATASET_PATH))
    }

    pub fn centroid_cache_ttl(&self) -> Duration {
        self.centroid_cache_ttl_secs
            .map_or(DEFAULT_CENTROID_TTL, Duration::from_secs)
    }

    pub fn centroid_cache_capacity(&self) -> u64 {
        self.centroid_cache_capacity
            .unwrap_or(DEFAULT_CENTROID_CAPACITY)
    }

    pub fn photo_probe_timeout(&self) -> Duration {
        self.photo_probe_timeout_secs
            .map_or(DEFAULT_PROBE_TIMEOUT, Duration::from_secs)
    }

    pub fn photo_max_redirects(&self) -> usize {
        self.photo_max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS)
    }

    pub fn photo_concurrency(&self) -> usize {
        self.photo_concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    pub fn proximity_threshold_meters(&self) -> f64 {
        self.proximity_threshold_meters
            .unwrap_or(DEFAULT_PROXIMITY_THRESHOLD_METERS)
    }

    pub fn submission_deadline(&self) -> Duration {
        self.submission_deadline_secs
            .map_or(DEFAULT_SUBMISSION_DEADLINE, Duration::from_secs)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Parse the verifier list, skipping blank entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVerifierId`] for the first entry that is
    /// not a UUID.
    pub fn verifier_ids(&self) -> Result<Vec<UserId>, ConfigError> {
        let Some(entries) = self.verifier_ids.as_deref() else {
            return Ok(Vec::new());
        };
        entries
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                UserId::new(entry).map_err(|source| ConfigError::InvalidVerifierId {
                    value: entry.to_owned(),
                    source,
                })
            })
            .collect()
    }

    /// Check every value and build the policies the service runs with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending key.
    pub fn validate(&self) -> Result<ServiceSettings, ConfigError> {
        let bind_addr = self
            .bind_addr()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind_addr",
                value: self.bind_addr().to_owned(),
                expected: "host:port socket address",
            })?;

        positive("photo_concurrency", self.photo_concurrency())?;
        positive("photo_probe_timeout_secs", self.photo_probe_timeout().as_secs())?;
        positive("submission_deadline_secs", self.submission_deadline().as_secs())?;
        positive("centroid_cache_capacity", self.centroid_cache_capacity())?;

        let threshold = self.proximity_threshold_meters();
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "proximity_threshold_meters",
                value: threshold.to_string(),
                expected: "a positive number of meters",
            });
        }
        let proximity = if self.proximity_check_enabled {
            ProximityPolicy::enforced(threshold)
        } else {
            ProximityPolicy {
                enabled: false,
                threshold_meters: threshold,
            }
        };

        Ok(ServiceSettings {
            bind_addr,
            boundary_dataset_path: self.boundary_dataset_path(),
            centroid_cache_ttl: self.centroid_cache_ttl(),
            centroid_cache_capacity: self.centroid_cache_capacity(),
            photo_policy: PhotoPolicy {
                probe_timeout: self.photo_probe_timeout(),
                max_redirects: self.photo_max_redirects(),
                concurrency: self.photo_concurrency(),
            },
            proximity,
            submission_deadline: self.submission_deadline(),
            verifier_ids: self.verifier_ids()?,
        })
    }
}

fn positive<T>(key: &'static str, value: T) -> Result<(), ConfigError>
where
    T: Copy + Default + PartialOrd + ToString,
{
    if value > T::default() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected: "a value greater than zero",
        })
    }
}
