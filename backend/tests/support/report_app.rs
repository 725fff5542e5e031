//! In-process report API wired to real domain services.
//!
//! Network-facing adapters are replaced by deterministic stubs: DNS answers
//! from a fixed table and photo probes answer from a per-URL table, so the
//! SSRF and content checks run for real without touching the network.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, get, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use roadwatch::Trace;
use roadwatch::domain::geo::GeoValidator;
use roadwatch::domain::ports::{
    HostResolver, HostResolverError, PhotoProbe, PhotoProbeError, ProbeRequest, ProbeResponse,
    ReportRepository,
};
use roadwatch::domain::{
    BestEffortEvents, BoundaryLookup, PhotoEvidenceValidator, PhotoPolicy, PreSubmissionService,
    ProximityPolicy, ReportLifecycleService, ReportSubmissionDeps, ReportSubmissionService,
    UserId,
};
use roadwatch::inbound::http::checks::{validate_location, validate_photos};
use roadwatch::inbound::http::reports::{
    change_report_status, delete_report, get_report, list_reports, revise_report, submit_report,
};
use roadwatch::inbound::http::state::{HttpState, HttpStatePorts};
use roadwatch::inbound::http::validation::{json_config, query_config};
use roadwatch::outbound::boundary::JsonBoundaryDataset;
use roadwatch::outbound::cache::MokaCentroidCache;
use roadwatch::outbound::events::TracingReportEventPublisher;
use roadwatch::outbound::identity::ConfiguredStatusAuthorizer;
use roadwatch::outbound::persistence::InMemoryReportRepository;

pub const AUTHOR: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
pub const VERIFIER: &str = "0b6e3b7e-6b7a-4d3c-9f0e-2a1d5c4b3a29";

/// DNS answers keyed by host name.
pub struct TableResolver(HashMap<&'static str, IpAddr>);

impl Default for TableResolver {
    fn default() -> Self {
        Self(HashMap::from([
            ("example.com", IpAddr::from([93, 184, 216, 34])),
            ("cdn.example.com", IpAddr::from([93, 184, 216, 35])),
            ("intranet.example.com", IpAddr::from([10, 0, 0, 5])),
        ]))
    }
}

#[async_trait]
impl HostResolver for TableResolver {
    async fn resolve(&self, host: &str, _port: u16) -> Result<Vec<IpAddr>, HostResolverError> {
        self.0
            .get(host)
            .map(|ip| vec![*ip])
            .ok_or_else(|| HostResolverError::not_found(host))
    }
}

/// Probe answering `image/jpeg` unless the path says otherwise.
#[derive(Default)]
pub struct TableProbe;

#[async_trait]
impl PhotoProbe for TableProbe {
    async fn head(&self, request: &ProbeRequest) -> Result<ProbeResponse, PhotoProbeError> {
        let (status, content_type) = match request.url.path() {
            "/page.html" => (200, "text/html; charset=utf-8"),
            "/missing.jpg" => (404, "text/plain"),
            "/photo.png" => (200, "image/png; charset=binary"),
            _ => (200, "image/jpeg"),
        };
        Ok(ProbeResponse {
            status,
            location: None,
            content_type: Some(content_type.to_owned()),
            content_length: Some(2048),
        })
    }
}

/// Clock advancing one minute per reading.
pub struct SteppingClock(AtomicI64);

impl Default for SteppingClock {
    fn default() -> Self {
        Self(AtomicI64::new(0))
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let step = self.0.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(step)
    }
}

fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/region_centroids.json")
}

/// HTTP state over real services with stubbed network adapters.
pub fn report_state(proximity: ProximityPolicy) -> HttpState {
    let dataset = JsonBoundaryDataset::load(&dataset_path()).expect("fixture dataset loads");
    let boundaries = BoundaryLookup::new(Arc::new(dataset), Arc::new(MokaCentroidCache::default()));
    let photos = PhotoEvidenceValidator::new(
        Arc::new(TableResolver::default()),
        Arc::new(TableProbe),
        PhotoPolicy::default(),
    );
    let repository: Arc<dyn ReportRepository> = Arc::new(InMemoryReportRepository::new());
    let events = BestEffortEvents::new(Arc::new(TracingReportEventPublisher::new()));
    let clock: Arc<dyn Clock> = Arc::new(SteppingClock::default());
    let verifier = UserId::new(VERIFIER).expect("verifier id");

    let submission = ReportSubmissionService::new(ReportSubmissionDeps {
        geo: GeoValidator::default(),
        boundaries: boundaries.clone(),
        photos: photos.clone(),
        repository: repository.clone(),
        events: events.clone(),
        clock: clock.clone(),
    })
    .with_proximity(proximity);
    let lifecycle = Arc::new(ReportLifecycleService::new(
        repository,
        Arc::new(ConfiguredStatusAuthorizer::new([verifier])),
        events,
        clock,
    ));
    let checks = PreSubmissionService::new(GeoValidator::default(), boundaries, photos, proximity);

    HttpState::new(HttpStatePorts {
        submission: Arc::new(submission),
        lifecycle: lifecycle.clone(),
        reports: lifecycle,
        checks: Arc::new(checks),
    })
}

#[get("/test/sign-in/{user_id}")]
async fn sign_in(session: Session, user_id: web::Path<String>) -> HttpResponse {
    match session.insert("user_id", user_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(_) => HttpResponse::InternalServerError().finish(),
    }
}

/// The report API mounted the way the server mounts it.
pub fn report_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .wrap(
            SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                .cookie_name("session".to_owned())
                .cookie_secure(false)
                .build(),
        )
        .service(sign_in)
        .service(
            web::scope("/api/v1")
                .app_data(json_config())
                .app_data(query_config())
                .service(submit_report)
                .service(list_reports)
                .service(get_report)
                .service(revise_report)
                .service(change_report_status)
                .service(delete_report)
                .service(validate_location)
                .service(validate_photos),
        )
}

/// Sign in as `user_id` and return the session cookie.
pub async fn sign_in_as<S>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/test/sign-in/{user_id}"))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
