//! I/O driver applying the photo policy hop by hop.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{StreamExt, stream};
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use super::policy::{
    PhotoRejection, VettedHost, accepted_image_type, check_host, check_scheme, is_blocked_ip,
};
use crate::domain::ports::{
    HostResolver, HostResolverError, PhotoProbe, PhotoProbeError, ProbeRequest, ProbeResponse,
};

/// Hard limit on a single probe, and on each DNS lookup.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Redirects followed before a URL is rejected.
pub const DEFAULT_MAX_REDIRECTS: usize = 3;
/// URLs vetted at the same time by [`PhotoEvidenceValidator::validate_all`].
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Tunables for photo vetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoPolicy {
    pub probe_timeout: Duration,
    pub max_redirects: usize,
    pub concurrency: usize,
}

impl Default for PhotoPolicy {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Metadata recorded for an accepted photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEvidence {
    /// Normalised media type, e.g. `image/jpeg`.
    pub content_type: String,
    /// Declared `Content-Length`, when the host sent one.
    pub size_bytes: Option<u64>,
}

/// Verdict for one submitted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoValidationResult {
    /// URL exactly as submitted.
    pub url: String,
    pub outcome: Result<PhotoEvidence, PhotoRejection>,
}

impl PhotoValidationResult {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn rejection(&self) -> Option<&PhotoRejection> {
        self.outcome.as_ref().err()
    }

    pub fn evidence(&self) -> Option<&PhotoEvidence> {
        self.outcome.as_ref().ok()
    }
}

/// Vets photo URLs against the SSRF and content policy.
///
/// # Examples
/// ```rust,ignore
/// let validator = PhotoEvidenceValidator::new(resolver, probe, PhotoPolicy::default());
/// let results = validator
///     .validate_all(&["https://cdn.example.com/a.jpg".to_owned()])
///     .await;
/// assert!(results[0].is_valid());
/// ```
#[derive(Clone)]
pub struct PhotoEvidenceValidator {
    resolver: Arc<dyn HostResolver>,
    probe: Arc<dyn PhotoProbe>,
    policy: PhotoPolicy,
}

impl PhotoEvidenceValidator {
    pub fn new(
        resolver: Arc<dyn HostResolver>,
        probe: Arc<dyn PhotoProbe>,
        policy: PhotoPolicy,
    ) -> Self {
        Self {
            resolver,
            probe,
            policy,
        }
    }

    pub fn policy(&self) -> PhotoPolicy {
        self.policy
    }

    /// Vet a single URL.
    pub async fn validate(&self, url: &str) -> PhotoValidationResult {
        let outcome = self.vet(url).await;
        match &outcome {
            Ok(evidence) => {
                debug!(url, content_type = %evidence.content_type, "photo accepted");
            }
            Err(rejection) => {
                debug!(url, reason = rejection.code(), %rejection, "photo rejected");
            }
        }
        PhotoValidationResult {
            url: url.to_owned(),
            outcome,
        }
    }

    /// Vet every URL independently, with bounded concurrency.
    ///
    /// Results are in input order and one URL's failure never stops the
    /// others from being checked.
    pub async fn validate_all(&self, urls: &[String]) -> Vec<PhotoValidationResult> {
        stream::iter(urls.iter().cloned())
            .map(|url| async move { self.validate(&url).await })
            .buffered(self.policy.concurrency.max(1))
            .collect()
            .await
    }

    async fn vet(&self, raw: &str) -> Result<PhotoEvidence, PhotoRejection> {
        let mut current = Url::parse(raw).map_err(|err| PhotoRejection::InvalidUrl {
            reason: err.to_string(),
        })?;
        let mut redirects = 0;
        loop {
            let response = self.probe_hop(&current).await?;
            if !is_redirect(response.status) {
                return accept(response);
            }
            if redirects == self.policy.max_redirects {
                return Err(PhotoRejection::TooManyRedirects {
                    max: self.policy.max_redirects,
                });
            }
            let location =
                response
                    .location
                    .ok_or(PhotoRejection::RedirectWithoutLocation {
                        status: response.status,
                    })?;
            current = current
                .join(&location)
                .map_err(|err| PhotoRejection::InvalidUrl {
                    reason: err.to_string(),
                })?;
            redirects += 1;
        }
    }

    async fn probe_hop(&self, url: &Url) -> Result<ProbeResponse, PhotoRejection> {
        check_scheme(url)?;
        let host = check_host(url)?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| PhotoRejection::UnsupportedScheme {
                scheme: url.scheme().to_owned(),
            })?;
        let addrs = self.vetted_addresses(host, port).await?;
        let request = ProbeRequest {
            url: url.clone(),
            addrs: addrs
                .into_iter()
                .map(|ip| SocketAddr::new(ip, port))
                .collect(),
        };
        match timeout(self.policy.probe_timeout, self.probe.head(&request)).await {
            Err(_) | Ok(Err(PhotoProbeError::Timeout { .. })) => Err(PhotoRejection::Timeout),
            Ok(Err(err)) => Err(PhotoRejection::Unreachable {
                reason: err.to_string(),
            }),
            Ok(Ok(response)) => Ok(response),
        }
    }

    async fn vetted_addresses(
        &self,
        host: VettedHost,
        port: u16,
    ) -> Result<Vec<IpAddr>, PhotoRejection> {
        let (name, addrs) = match host {
            VettedHost::Ip(ip) => (ip.to_string(), vec![ip]),
            VettedHost::Name(name) => {
                let addrs = self.resolve(&name, port).await?;
                (name, addrs)
            }
        };
        if addrs.is_empty() {
            return Err(PhotoRejection::UnresolvableHost { host: name });
        }
        if let Some(addr) = addrs.iter().copied().find(|ip| is_blocked_ip(*ip)) {
            return Err(PhotoRejection::BlockedAddress { host: name, addr });
        }
        Ok(addrs)
    }

    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<IpAddr>, PhotoRejection> {
        match timeout(self.policy.probe_timeout, self.resolver.resolve(host, port)).await {
            Err(_) => Err(PhotoRejection::ResolverUnavailable {
                message: format!("lookup of {host} timed out"),
            }),
            Ok(Err(HostResolverError::NotFound { host })) => {
                Err(PhotoRejection::UnresolvableHost { host })
            }
            Ok(Err(HostResolverError::Unavailable { message })) => {
                Err(PhotoRejection::ResolverUnavailable { message })
            }
            Ok(Ok(addrs)) => Ok(addrs),
        }
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

fn accept(response: ProbeResponse) -> Result<PhotoEvidence, PhotoRejection> {
    if !(200..300).contains(&response.status) {
        return Err(PhotoRejection::HttpStatus {
            status: response.status,
        });
    }
    let content_type = response
        .content_type
        .as_deref()
        .and_then(accepted_image_type)
        .ok_or_else(|| PhotoRejection::UnsupportedContentType {
            content_type: response.content_type.clone(),
        })?;
    Ok(PhotoEvidence {
        content_type,
        size_bytes: response.content_length,
    })
}
