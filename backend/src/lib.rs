//! Roadwatch backend: citizen road-damage reporting.
//!
//! Layout follows ports and adapters. [`domain`] holds the rules and the
//! port traits, [`inbound`] the HTTP adapter, [`outbound`] the adapters for
//! boundary data, DNS, photo probing, storage and events.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
