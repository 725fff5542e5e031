//! Builders wiring outbound adapters into the domain services behind
//! [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use roadwatch::config::ServiceSettings;
use roadwatch::domain::geo::GeoValidator;
use roadwatch::domain::ports::ReportRepository;
use roadwatch::domain::{
    BestEffortEvents, BoundaryLookup, PhotoEvidenceValidator, PreSubmissionService,
    ReportLifecycleService, ReportSubmissionDeps, ReportSubmissionService,
};
use roadwatch::inbound::http::state::{HttpState, HttpStatePorts};
use roadwatch::outbound::boundary::JsonBoundaryDataset;
use roadwatch::outbound::cache::MokaCentroidCache;
use roadwatch::outbound::dns::TokioHostResolver;
use roadwatch::outbound::events::TracingReportEventPublisher;
use roadwatch::outbound::identity::ConfiguredStatusAuthorizer;
use roadwatch::outbound::persistence::InMemoryReportRepository;
use roadwatch::outbound::photo_probe::ReqwestPhotoProbe;

fn build_boundary_lookup(settings: &ServiceSettings) -> std::io::Result<BoundaryLookup> {
    let dataset = JsonBoundaryDataset::load(&settings.boundary_dataset_path).map_err(|error| {
        std::io::Error::other(format!("boundary dataset unusable: {error}"))
    })?;
    info!(
        path = %settings.boundary_dataset_path.display(),
        regions = dataset.len(),
        "boundary dataset loaded"
    );
    let cache = MokaCentroidCache::new(
        settings.centroid_cache_ttl,
        settings.centroid_cache_capacity,
    );
    Ok(BoundaryLookup::new(Arc::new(dataset), Arc::new(cache)))
}

fn build_photo_validator(settings: &ServiceSettings) -> PhotoEvidenceValidator {
    PhotoEvidenceValidator::new(
        Arc::new(TokioHostResolver::new()),
        Arc::new(ReqwestPhotoProbe::new(settings.photo_policy.probe_timeout)),
        settings.photo_policy,
    )
}

fn log_policies(settings: &ServiceSettings) {
    if settings.proximity.enabled {
        info!(
            threshold_meters = settings.proximity.threshold_meters,
            "centroid proximity check enforced"
        );
    } else {
        info!("centroid proximity check disabled");
    }
    if settings.verifier_ids.is_empty() {
        warn!("no verifiers configured; status changes will be refused");
    }
}

/// Construct the HTTP state from validated settings.
///
/// # Errors
/// Returns [`std::io::Error`] when the boundary dataset cannot be loaded.
pub fn build_http_state(settings: &ServiceSettings) -> std::io::Result<HttpState> {
    log_policies(settings);
    let boundaries = build_boundary_lookup(settings)?;
    let photos = build_photo_validator(settings);
    let geo = GeoValidator::default();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repository: Arc<dyn ReportRepository> = Arc::new(InMemoryReportRepository::new());
    let events = BestEffortEvents::new(Arc::new(TracingReportEventPublisher::new()));

    let submission = ReportSubmissionService::new(ReportSubmissionDeps {
        geo,
        boundaries: boundaries.clone(),
        photos: photos.clone(),
        repository: repository.clone(),
        events: events.clone(),
        clock: clock.clone(),
    })
    .with_proximity(settings.proximity)
    .with_deadline(settings.submission_deadline);

    let lifecycle = Arc::new(ReportLifecycleService::new(
        repository,
        Arc::new(ConfiguredStatusAuthorizer::new(
            settings.verifier_ids.iter().copied(),
        )),
        events,
        clock,
    ));

    let checks = PreSubmissionService::new(geo, boundaries, photos, settings.proximity);

    Ok(HttpState::new(HttpStatePorts {
        submission: Arc::new(submission),
        lifecycle: lifecycle.clone(),
        reports: lifecycle,
        checks: Arc::new(checks),
    }))
}
