//! Host resolution through the runtime's system resolver.

use std::io;
use std::net::IpAddr;

use async_trait::async_trait;
use tokio::net::lookup_host;

use crate::domain::ports::{HostResolver, HostResolverError};

/// [`HostResolver`] backed by [`tokio::net::lookup_host`].
///
/// `getaddrinfo` reports every failure as a generic I/O error, so resolver
/// outages (`EAI_AGAIN`, `EAI_FAIL`) are told apart from NXDOMAIN by the
/// resolver's message. Anything else is treated as a name that does not
/// resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioHostResolver;

impl TokioHostResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostResolver for TokioHostResolver {
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<IpAddr>, HostResolverError> {
        let addrs = lookup_host((host, port))
            .await
            .map_err(|error| map_lookup_error(host, &error))?;

        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        if ips.is_empty() {
            return Err(HostResolverError::not_found(host));
        }
        Ok(ips)
    }
}

/// `gai_strerror` texts for resolver-side failures.
const OUTAGE_MARKERS: [&str; 3] = [
    "temporary failure in name resolution",
    "non-recoverable failure in name resolution",
    "try again",
];

fn map_lookup_error(host: &str, error: &io::Error) -> HostResolverError {
    match error.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => {
            HostResolverError::unavailable(error.to_string())
        }
        _ if is_resolver_outage(error) => HostResolverError::unavailable(error.to_string()),
        _ => HostResolverError::not_found(host),
    }
}

fn is_resolver_outage(error: &io::Error) -> bool {
    let message = error.to_string().to_ascii_lowercase();
    OUTAGE_MARKERS.iter().any(|marker| message.contains(marker))
}
