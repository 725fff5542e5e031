//! Tests for photo URL vetting.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    HostResolver, HostResolverError, MockHostResolver, MockPhotoProbe, PhotoProbe, PhotoProbeError,
    ProbeRequest, ProbeResponse,
};

const PUBLIC_IP: &str = "93.184.216.34";

fn ip(raw: &str) -> IpAddr {
    raw.parse().expect("valid IP literal")
}

fn resolver_to(addrs: &'static [&'static str]) -> MockHostResolver {
    let mut resolver = MockHostResolver::new();
    resolver
        .expect_resolve()
        .returning(move |_, _| Ok(addrs.iter().map(|raw| ip(raw)).collect()));
    resolver
}

fn silent_resolver() -> MockHostResolver {
    let mut resolver = MockHostResolver::new();
    resolver.expect_resolve().never();
    resolver
}

fn silent_probe() -> MockPhotoProbe {
    let mut probe = MockPhotoProbe::new();
    probe.expect_head().never();
    probe
}

fn image_response(content_type: &str) -> ProbeResponse {
    ProbeResponse {
        status: 200,
        location: None,
        content_type: Some(content_type.to_owned()),
        content_length: Some(48_213),
    }
}

fn redirect_to(location: &str) -> ProbeResponse {
    ProbeResponse {
        status: 302,
        location: Some(location.to_owned()),
        ..ProbeResponse::default()
    }
}

fn validator(
    resolver: impl HostResolver + 'static,
    probe: impl PhotoProbe + 'static,
) -> PhotoEvidenceValidator {
    PhotoEvidenceValidator::new(Arc::new(resolver), Arc::new(probe), PhotoPolicy::default())
}

#[rstest]
#[case("127.0.0.1")]
#[case("10.1.2.3")]
#[case("172.16.0.1")]
#[case("172.31.255.255")]
#[case("192.168.1.1")]
#[case("169.254.169.254")]
#[case("0.0.0.0")]
#[case("100.64.0.1")]
#[case("100.127.255.254")]
#[case("::1")]
#[case("fe80::1")]
#[case("fd12:3456::1")]
#[case("fc00::1")]
#[case("ff02::1")]
#[case("::ffff:8.8.8.8")]
fn blocked_ranges_are_recognised(#[case] raw: &str) {
    assert!(is_blocked_ip(ip(raw)), "{raw} should be blocked");
}

#[rstest]
#[case("93.184.216.34")]
#[case("8.8.8.8")]
#[case("172.32.0.1")]
#[case("100.128.0.1")]
#[case("192.169.0.1")]
#[case("2606:4700:4700::1111")]
fn public_addresses_are_allowed(#[case] raw: &str) {
    assert!(!is_blocked_ip(ip(raw)), "{raw} should be allowed");
}

#[rstest]
#[case("image/jpeg", Some("image/jpeg"))]
#[case("image/jpg", Some("image/jpg"))]
#[case("IMAGE/PNG", Some("image/png"))]
#[case("image/webp; charset=binary", Some("image/webp"))]
#[case(" image/jpeg ;q=1", Some("image/jpeg"))]
#[case("image/gif", None)]
#[case("text/html; charset=utf-8", None)]
#[case("", None)]
fn content_type_gate(#[case] header: &str, #[case] expected: Option<&str>) {
    assert_eq!(accepted_image_type(header).as_deref(), expected);
}

#[rstest]
#[case("ftp://example.com/a.jpg", "unsupported_scheme")]
#[case("file:///etc/passwd", "unsupported_scheme")]
#[case("javascript:alert(1)", "unsupported_scheme")]
#[case("not a url", "invalid_url")]
#[case("http://localhost/a.jpg", "localhost")]
#[case("http://LOCALHOST./a.jpg", "localhost")]
#[case("http://api.localhost/a.jpg", "localhost")]
#[case("http://127.0.0.1/a.jpg", "localhost")]
#[case("http://127.8.9.10:8080/a.jpg", "localhost")]
#[case("http://[::1]/a.jpg", "localhost")]
#[case("http://10.0.0.5/a.jpg", "blocked_address")]
#[case("http://[fe80::1]/a.jpg", "blocked_address")]
#[tokio::test]
async fn rejected_before_any_lookup(#[case] url: &str, #[case] code: &str) {
    let result = validator(silent_resolver(), silent_probe())
        .validate(url)
        .await;

    assert_eq!(result.url, url);
    assert_eq!(result.rejection().map(PhotoRejection::code), Some(code));
}

#[rstest]
#[case(&["127.0.0.1"])]
#[case(&["10.1.2.3"])]
#[case(&["192.168.1.1"])]
#[case(&["169.254.169.254"])]
#[case(&["93.184.216.34", "10.0.0.7"])]
#[tokio::test]
async fn hosts_resolving_to_blocked_ranges_are_rejected(#[case] addrs: &'static [&'static str]) {
    let result = validator(resolver_to(addrs), silent_probe())
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert!(matches!(
        result.rejection(),
        Some(PhotoRejection::BlockedAddress { host, .. }) if host == "photos.example.com"
    ));
}

#[tokio::test]
async fn unresolvable_host_is_a_rejection() {
    let mut resolver = MockHostResolver::new();
    resolver
        .expect_resolve()
        .returning(|host, _| Err(HostResolverError::not_found(host)));

    let result = validator(resolver, silent_probe())
        .validate("https://nxdomain.example/a.jpg")
        .await;

    let rejection = result.rejection().expect("rejected");
    assert_eq!(rejection.code(), "unresolvable_host");
    assert!(!rejection.is_infrastructure());
}

#[tokio::test]
async fn resolver_outage_is_flagged_as_infrastructure() {
    let mut resolver = MockHostResolver::new();
    resolver
        .expect_resolve()
        .returning(|_, _| Err(HostResolverError::unavailable("SERVFAIL")));

    let result = validator(resolver, silent_probe())
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert!(result.rejection().is_some_and(PhotoRejection::is_infrastructure));
}

#[tokio::test]
async fn accepted_photo_records_metadata_and_pins_addresses() {
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .withf(|request: &ProbeRequest| {
            request.addrs == vec![SocketAddr::new(ip(PUBLIC_IP), 443)]
                && request.url.as_str() == "https://photos.example.com/a.jpg"
        })
        .times(1)
        .returning(|_| Ok(image_response("image/JPEG; charset=binary")));

    let result = validator(resolver_to(&[PUBLIC_IP]), probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(
        result.evidence(),
        Some(&PhotoEvidence {
            content_type: "image/jpeg".to_owned(),
            size_bytes: Some(48_213),
        })
    );
}

#[rstest]
#[case(ProbeResponse { status: 404, ..ProbeResponse::default() }, "http_status")]
#[case(ProbeResponse { status: 500, ..ProbeResponse::default() }, "http_status")]
#[case(image_response("text/html"), "unsupported_content_type")]
#[case(ProbeResponse { status: 200, ..ProbeResponse::default() }, "unsupported_content_type")]
#[case(ProbeResponse { status: 302, ..ProbeResponse::default() }, "redirect_without_location")]
#[tokio::test]
async fn probe_responses_are_judged(#[case] response: ProbeResponse, #[case] code: &str) {
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .times(1)
        .return_once(move |_| Ok(response));

    let result = validator(resolver_to(&[PUBLIC_IP]), probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(result.rejection().map(PhotoRejection::code), Some(code));
}

#[rstest]
#[case(PhotoProbeError::timeout("deadline"), "timeout")]
#[case(PhotoProbeError::connect("refused"), "unreachable")]
#[case(PhotoProbeError::transport("reset"), "unreachable")]
#[tokio::test]
async fn probe_failures_are_rejections(#[case] error: PhotoProbeError, #[case] code: &str) {
    let mut probe = MockPhotoProbe::new();
    probe.expect_head().return_once(move |_| Err(error));

    let result = validator(resolver_to(&[PUBLIC_IP]), probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(result.rejection().map(PhotoRejection::code), Some(code));
}

#[tokio::test]
async fn redirect_targets_are_vetted_again() {
    let mut resolver = MockHostResolver::new();
    resolver
        .expect_resolve()
        .returning(|host, _| match host {
            "photos.example.com" => Ok(vec![ip(PUBLIC_IP)]),
            _ => Ok(vec![ip("169.254.169.254")]),
        });
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .times(1)
        .returning(|_| Ok(redirect_to("http://metadata.internal/latest/meta-data")));

    let result = validator(resolver, probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(
        result.rejection().map(PhotoRejection::code),
        Some("blocked_address")
    );
}

#[tokio::test]
async fn redirect_to_localhost_is_rejected_without_probing() {
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .times(1)
        .returning(|_| Ok(redirect_to("http://localhost:9000/a.jpg")));

    let result = validator(resolver_to(&[PUBLIC_IP]), probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(result.rejection().map(PhotoRejection::code), Some("localhost"));
}

#[tokio::test]
async fn relative_redirects_resolve_against_the_current_url() {
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .times(2)
        .returning(|request: &ProbeRequest| match request.url.path() {
            "/a.jpg" => Ok(redirect_to("/cdn/a.webp")),
            "/cdn/a.webp" => Ok(image_response("image/webp")),
            other => panic!("unexpected probe of {other}"),
        });

    let result = validator(resolver_to(&[PUBLIC_IP]), probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(
        result.evidence().map(|e| e.content_type.as_str()),
        Some("image/webp")
    );
}

#[tokio::test]
async fn redirect_chains_are_capped() {
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .times(DEFAULT_MAX_REDIRECTS + 1)
        .returning(|_| Ok(redirect_to("/again.jpg")));

    let result = validator(resolver_to(&[PUBLIC_IP]), probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(
        result.rejection(),
        Some(&PhotoRejection::TooManyRedirects {
            max: DEFAULT_MAX_REDIRECTS
        })
    );
}

/// Probe that answers after a fixed delay and tracks peak concurrency.
#[derive(Default)]
struct DelayedProbe {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl PhotoProbe for DelayedProbe {
    async fn head(&self, _request: &ProbeRequest) -> Result<ProbeResponse, PhotoProbeError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(image_response("image/png"))
    }
}

#[tokio::test(start_paused = true)]
async fn slow_hosts_hit_the_probe_timeout() {
    let probe = DelayedProbe {
        delay: DEFAULT_PROBE_TIMEOUT + Duration::from_secs(1),
        ..DelayedProbe::default()
    };

    let result = validator(resolver_to(&[PUBLIC_IP]), probe)
        .validate("https://photos.example.com/a.jpg")
        .await;

    assert_eq!(result.rejection(), Some(&PhotoRejection::Timeout));
}

#[tokio::test(start_paused = true)]
async fn batch_concurrency_is_bounded() {
    let probe = Arc::new(DelayedProbe {
        delay: Duration::from_millis(200),
        ..DelayedProbe::default()
    });
    let validator = PhotoEvidenceValidator::new(
        Arc::new(resolver_to(&[PUBLIC_IP])),
        probe.clone(),
        PhotoPolicy::default(),
    );
    let urls: Vec<String> = (0..10)
        .map(|i| format!("https://photos.example.com/{i}.png"))
        .collect();

    let results = validator.validate_all(&urls).await;

    assert!(results.iter().all(PhotoValidationResult::is_valid));
    assert_eq!(probe.peak.load(Ordering::SeqCst), DEFAULT_CONCURRENCY);
}

#[tokio::test]
async fn batch_keeps_order_and_checks_every_url() {
    let mut resolver = MockHostResolver::new();
    resolver
        .expect_resolve()
        .returning(|host, _| match host {
            "internal.example.com" => Ok(vec![ip("10.0.0.9")]),
            _ => Ok(vec![ip(PUBLIC_IP)]),
        });
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .returning(|request: &ProbeRequest| match request.url.path() {
            "/missing.jpg" => Ok(ProbeResponse {
                status: 404,
                ..ProbeResponse::default()
            }),
            _ => Ok(image_response("image/jpeg")),
        });
    let urls = vec![
        "ftp://photos.example.com/a.jpg".to_owned(),
        "https://photos.example.com/ok.jpg".to_owned(),
        "https://internal.example.com/a.jpg".to_owned(),
        "https://photos.example.com/missing.jpg".to_owned(),
        "https://photos.example.com/ok2.jpg".to_owned(),
    ];

    let results = validator(resolver, probe).validate_all(&urls).await;

    let seen: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(seen, urls.iter().map(String::as_str).collect::<Vec<_>>());
    let codes: Vec<Option<&str>> = results
        .iter()
        .map(|r| r.rejection().map(PhotoRejection::code))
        .collect();
    assert_eq!(
        codes,
        vec![
            Some("unsupported_scheme"),
            None,
            Some("blocked_address"),
            Some("http_status"),
            None,
        ]
    );
}

#[tokio::test]
async fn batch_validation_runs_on_a_spawned_task() {
    let mut probe = MockPhotoProbe::new();
    probe
        .expect_head()
        .returning(|_| Ok(image_response("image/jpeg")));
    let validator = validator(resolver_to(&[PUBLIC_IP]), probe);
    let urls = vec![
        "https://example.com/a.jpg".to_owned(),
        "https://example.com/b.jpg".to_owned(),
    ];

    let results = tokio::spawn(async move { validator.validate_all(&urls).await })
        .await
        .expect("task joins");

    assert!(results.iter().all(PhotoValidationResult::is_valid));
}
