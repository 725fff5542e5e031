//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use roadwatch::config::ServiceSettings;
use roadwatch::inbound::http::session_config::SessionSettings;

/// Everything needed to build and bind the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) service: ServiceSettings,
}

impl ServerConfig {
    /// Combine validated service settings with session cookie settings.
    #[must_use]
    pub fn new(service: ServiceSettings, session: SessionSettings) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            service,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.service.bind_addr
    }
}
