//! Port for the metadata-only HTTP probe used to vet photo URLs.
//!
//! The probe issues a single `HEAD` request and never follows redirects; the
//! caller inspects [`ProbeResponse::location`] and re-vets the next hop.

use std::net::SocketAddr;

use async_trait::async_trait;
use url::Url;

use super::define_port_error;

define_port_error! {
    /// Errors raised by probe adapters.
    pub enum PhotoProbeError {
        /// The request did not complete within its deadline.
        Timeout { message: String } => "probe timed out: {message}",
        /// The connection could not be established.
        Connect { message: String } => "probe connection failed: {message}",
        /// The exchange failed after connecting.
        Transport { message: String } => "probe transport failure: {message}",
    }
}

/// A single probe against a vetted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Target URL.
    pub url: Url,
    /// Addresses already checked against the blocked ranges. Adapters must
    /// connect to one of these instead of resolving the host again.
    pub addrs: Vec<SocketAddr>,
}

/// Response metadata from a probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoProbe: Send + Sync {
    /// Issue a `HEAD` request without following redirects.
    async fn head(&self, request: &ProbeRequest) -> Result<ProbeResponse, PhotoProbeError>;
}
