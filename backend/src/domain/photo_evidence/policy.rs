//! Pure SSRF and content policy checks.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

/// Image media types accepted as photo evidence.
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Why a photo URL was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoRejection {
    #[error("URL could not be parsed: {reason}")]
    InvalidUrl { reason: String },
    #[error("scheme '{scheme}' is not allowed; use http or https")]
    UnsupportedScheme { scheme: String },
    #[error("URL has no host")]
    MissingHost,
    #[error("host '{host}' refers to the local machine")]
    LocalhostAlias { host: String },
    #[error("host '{host}' could not be resolved")]
    UnresolvableHost { host: String },
    #[error("host '{host}' resolves to blocked address {addr}")]
    BlockedAddress { host: String, addr: IpAddr },
    #[error("DNS resolution is unavailable: {message}")]
    ResolverUnavailable { message: String },
    #[error("photo host did not answer within the probe timeout")]
    Timeout,
    #[error("photo host is unreachable: {reason}")]
    Unreachable { reason: String },
    #[error("photo host answered with HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("redirect ({status}) without a Location header")]
    RedirectWithoutLocation { status: u16 },
    #[error("more than {max} redirects")]
    TooManyRedirects { max: usize },
    #[error("content type {} is not an accepted image format", .content_type.as_deref().unwrap_or("(missing)"))]
    UnsupportedContentType { content_type: Option<String> },
}

impl PhotoRejection {
    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::UnsupportedScheme { .. } => "unsupported_scheme",
            Self::MissingHost => "missing_host",
            Self::LocalhostAlias { .. } => "localhost",
            Self::UnresolvableHost { .. } => "unresolvable_host",
            Self::BlockedAddress { .. } => "blocked_address",
            Self::ResolverUnavailable { .. } => "resolver_unavailable",
            Self::Timeout => "timeout",
            Self::Unreachable { .. } => "unreachable",
            Self::HttpStatus { .. } => "http_status",
            Self::RedirectWithoutLocation { .. } => "redirect_without_location",
            Self::TooManyRedirects { .. } => "too_many_redirects",
            Self::UnsupportedContentType { .. } => "unsupported_content_type",
        }
    }

    /// Whether the failure lies with our own infrastructure rather than the
    /// URL. Such outcomes are not validation verdicts.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::ResolverUnavailable { .. })
    }
}

/// Host component of a URL after the localhost gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VettedHost {
    Name(String),
    Ip(IpAddr),
}

/// Only `http` and `https` may be probed.
pub fn check_scheme(url: &Url) -> Result<(), PhotoRejection> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PhotoRejection::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}

/// Reject missing hosts and anything that names the local machine.
pub fn check_host(url: &Url) -> Result<VettedHost, PhotoRejection> {
    match url.host() {
        None => Err(PhotoRejection::MissingHost),
        Some(Host::Domain(domain)) => {
            let name = domain.trim_end_matches('.').to_ascii_lowercase();
            if name == "localhost" || name.ends_with(".localhost") {
                return Err(PhotoRejection::LocalhostAlias {
                    host: domain.to_owned(),
                });
            }
            Ok(VettedHost::Name(name))
        }
        Some(Host::Ipv4(ip)) if ip.is_loopback() => Err(PhotoRejection::LocalhostAlias {
            host: ip.to_string(),
        }),
        Some(Host::Ipv6(ip)) if ip.is_loopback() => Err(PhotoRejection::LocalhostAlias {
            host: ip.to_string(),
        }),
        Some(Host::Ipv4(ip)) => Ok(VettedHost::Ip(IpAddr::V4(ip))),
        Some(Host::Ipv6(ip)) => Ok(VettedHost::Ip(IpAddr::V6(ip))),
    }
}

/// Whether `ip` falls in a private, loopback, link-local, shared, multicast
/// or otherwise reserved range that photo probes must never reach.
///
/// # Examples
/// ```
/// use std::net::IpAddr;
/// use roadwatch::domain::photo_evidence::is_blocked_ip;
///
/// let metadata: IpAddr = "169.254.169.254".parse().expect("ip");
/// let public: IpAddr = "93.184.216.34".parse().expect("ip");
/// assert!(is_blocked_ip(metadata));
/// assert!(!is_blocked_ip(public));
/// ```
pub fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_blocked_v4(v4),
        IpAddr::V6(v6) => is_blocked_v6(v6),
    }
}

fn is_blocked_v4(ip: Ipv4Addr) -> bool {
    let [a, b, _, _] = ip.octets();
    a == 10
        || (a == 172 && (16..=31).contains(&b))
        || (a == 192 && b == 168)
        || (a == 169 && b == 254)
        || a == 127
        || a == 0
        || (a == 100 && (64..=127).contains(&b))
}

fn is_blocked_v6(ip: Ipv6Addr) -> bool {
    let segments = ip.segments();
    ip.is_loopback()
        || ip.is_unspecified()
        || (segments[0] & 0xffc0) == 0xfe80
        || (segments[0] & 0xfe00) == 0xfc00
        || (segments[0] & 0xff00) == 0xff00
        || (segments[..5].iter().all(|s| *s == 0) && segments[5] == 0xffff)
}

/// Normalise a `Content-Type` header and return it if it names an accepted
/// image type. Parameters after `;` are ignored and matching is
/// case-insensitive.
pub fn accepted_image_type(header: &str) -> Option<String> {
    let media_type = header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED_IMAGE_TYPES
        .contains(&media_type.as_str())
        .then_some(media_type)
}
