//! Vetting of externally hosted photo URLs before a report may cite them.
//!
//! Every hop of a URL, including each redirect target, passes the same gate:
//! scheme, localhost aliases, DNS resolution against blocked ranges, and a
//! bounded `HEAD` probe whose `Content-Type` must name an accepted image
//! format. Pure checks live in [`policy`]; the I/O driver is
//! [`PhotoEvidenceValidator`].

pub mod policy;
mod validator;

pub use policy::{PhotoRejection, accepted_image_type, is_blocked_ip};
pub use validator::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_REDIRECTS, DEFAULT_PROBE_TIMEOUT, PhotoEvidence,
    PhotoEvidenceValidator, PhotoPolicy, PhotoValidationResult,
};

#[cfg(test)]
mod tests;
