//! Port for resolving photo hosts to IP addresses.

use std::net::IpAddr;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by DNS adapters.
    pub enum HostResolverError {
        /// The name has no address records.
        NotFound { host: String } => "host {host} did not resolve",
        /// The resolver itself failed or timed out.
        Unavailable { message: String } => "resolver unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve `host` to every address it currently maps to.
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<IpAddr>, HostResolverError>;
}
