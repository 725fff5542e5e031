//! Advisory pre-submission checks.
//!
//! ```text
//! POST /api/v1/validate-location
//! POST /api/v1/validate-photos
//! ```
//!
//! Both endpoints answer 200 with a verdict even when the input would be
//! rejected at submission time.

use actix_web::{post, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::reports_dto::{
    LocationCheckBody, LocationCheckResponseBody, PhotoCheckBody, PhotoCheckResponseBody,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Check a region code and path without submitting anything.
#[utoipa::path(
    post,
    path = "/api/v1/validate-location",
    request_body = LocationCheckBody,
    responses(
        (status = 200, description = "Location verdict", body = LocationCheckResponseBody),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Boundary data unavailable", body = ErrorSchema)
    ),
    tags = ["checks"],
    operation_id = "validateLocation",
    security(("SessionCookie" = []))
)]
#[post("/validate-location")]
pub async fn validate_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LocationCheckBody>,
) -> ApiResult<web::Json<LocationCheckResponseBody>> {
    session.require_user_id()?;
    let check = state
        .checks
        .check_location(payload.into_inner().into())
        .await?;
    Ok(web::Json(check.into()))
}

/// Probe photo URLs without submitting anything.
#[utoipa::path(
    post,
    path = "/api/v1/validate-photos",
    request_body = PhotoCheckBody,
    responses(
        (status = 200, description = "Per-URL verdicts", body = PhotoCheckResponseBody),
        (status = 400, description = "Too many or too few URLs", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "Resolver unavailable", body = ErrorSchema)
    ),
    tags = ["checks"],
    operation_id = "validatePhotos",
    security(("SessionCookie" = []))
)]
#[post("/validate-photos")]
pub async fn validate_photos(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PhotoCheckBody>,
) -> ApiResult<web::Json<PhotoCheckResponseBody>> {
    session.require_user_id()?;
    let check = state
        .checks
        .check_photos(payload.into_inner().photo_urls)
        .await?;
    Ok(web::Json(check.into()))
}
