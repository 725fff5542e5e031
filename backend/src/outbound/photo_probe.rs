//! Reqwest-backed photo probe adapter.
//!
//! Each probe builds a client pinned to the addresses the domain already
//! vetted, with redirects and proxies disabled, so the connection cannot be
//! steered to a host that was never checked.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use tracing::debug;
use url::Host;

use crate::domain::ports::{PhotoProbe, PhotoProbeError, ProbeRequest, ProbeResponse};

/// User agent presented to photo hosts.
pub const PHOTO_PROBE_USER_AGENT: &str = "Roadwatch-PhotoValidator/1.0";

/// [`PhotoProbe`] issuing metadata-only `HEAD` requests.
#[derive(Debug, Clone)]
pub struct ReqwestPhotoProbe {
    timeout: Duration,
    user_agent: String,
}

impl ReqwestPhotoProbe {
    /// Build a probe with a hard per-request timeout.
    /// ```rust,ignore
    /// let probe = ReqwestPhotoProbe::new(Duration::from_secs(5));
    /// let response = probe.head(&request).await?;
    /// ```
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: PHOTO_PROBE_USER_AGENT.to_owned(),
        }
    }

    fn client_for(&self, request: &ProbeRequest) -> Result<Client, reqwest::Error> {
        let mut builder: ClientBuilder = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .redirect(Policy::none())
            .no_proxy();
        if let Some(Host::Domain(domain)) = request.url.host() {
            if !request.addrs.is_empty() {
                builder = builder.resolve_to_addrs(domain, &request.addrs);
            }
        }
        builder.build()
    }
}

#[async_trait]
impl PhotoProbe for ReqwestPhotoProbe {
    async fn head(&self, request: &ProbeRequest) -> Result<ProbeResponse, PhotoProbeError> {
        let client = self
            .client_for(request)
            .map_err(|error| PhotoProbeError::transport(error.to_string()))?;
        let response = client
            .head(request.url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let probed = read_metadata(status, response.headers());
        debug!(
            url = %request.url,
            status,
            content_type = probed.content_type.as_deref(),
            "photo probe answered"
        );
        Ok(probed)
    }
}

fn read_metadata(status: u16, headers: &HeaderMap) -> ProbeResponse {
    let text = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    ProbeResponse {
        status,
        location: text(LOCATION),
        content_type: text(CONTENT_TYPE),
        content_length: text(CONTENT_LENGTH).and_then(|raw| raw.trim().parse().ok()),
    }
}

fn map_transport_error(error: reqwest::Error) -> PhotoProbeError {
    if error.is_timeout() {
        PhotoProbeError::timeout(error.to_string())
    } else if error.is_connect() {
        PhotoProbeError::connect(error.to_string())
    } else {
        PhotoProbeError::transport(error.to_string())
    }
}

#[cfg(test)]
#[path = "photo_probe_tests.rs"]
mod tests;
