//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **boundary**: region centroid dataset loaded from a JSON file
//! - **cache**: in-process centroid cache with TTL eviction
//! - **dns**: system resolver behind the host resolver port
//! - **photo_probe**: pinned reqwest `HEAD` probe for photo URLs
//! - **persistence**: in-memory report store with conditional writes
//! - **identity**: configured verifier allow-list
//! - **events**: report events written to the tracing log
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod boundary;
pub mod cache;
pub mod dns;
pub mod events;
pub mod identity;
pub mod persistence;
pub mod photo_probe;
