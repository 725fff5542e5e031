//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes,
//! the DTO schemas and the error wrappers from
//! [`crate::inbound::http::schemas`], plus the session cookie security
//! scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::reports_dto::{
    CentroidBody, ChangeStatusBody, LineStringBody, LocationCheckBody, LocationCheckResponseBody,
    PaginationBody, PathPointBody, PhotoCheckBody, PhotoCheckResponseBody, PhotoResultBody,
    ReportBody, ReportDraftBody, ReportListBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie issued by the identity service.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Roadwatch API",
        description = "Citizen road-damage reports: submission, lifecycle and pre-submission checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::reports::submit_report,
        crate::inbound::http::reports::list_reports,
        crate::inbound::http::reports::get_report,
        crate::inbound::http::reports::revise_report,
        crate::inbound::http::reports::change_report_status,
        crate::inbound::http::reports::delete_report,
        crate::inbound::http::checks::validate_location,
        crate::inbound::http::checks::validate_photos,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PathPointBody,
        ReportDraftBody,
        LineStringBody,
        ReportBody,
        PaginationBody,
        ReportListBody,
        ChangeStatusBody,
        LocationCheckBody,
        CentroidBody,
        LocationCheckResponseBody,
        PhotoCheckBody,
        PhotoResultBody,
        PhotoCheckResponseBody,
    )),
    tags(
        (name = "reports", description = "Road-damage reports and their lifecycle"),
        (name = "checks", description = "Advisory checks before submitting"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
