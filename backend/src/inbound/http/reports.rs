//! Report HTTP handlers.
//!
//! ```text
//! POST   /api/v1/reports
//! GET    /api/v1/reports
//! GET    /api/v1/reports/{id}
//! PUT    /api/v1/reports/{id}
//! PATCH  /api/v1/reports/{id}/status
//! DELETE /api/v1/reports/{id}
//! ```
//!
//! Reads are public. Writes require a signed-in session; the author id is
//! always taken from the session, never from the body.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};

use crate::domain::ports::{ChangeStatusRequest, ReviseReportRequest, SubmitReportRequest};
use crate::domain::report::ReportListFilter;
use crate::inbound::http::ApiResult;
use crate::inbound::http::reports_dto::{
    ChangeStatusBody, ReportBody, ReportDraftBody, ReportListBody, ReportListQuery, ReportPath,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, page_request, parse_region_code, parse_report_id, parse_status, parse_user_id,
};

/// Submit a new report as the signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = ReportDraftBody,
    responses(
        (status = 201, description = "Report created", body = ReportBody),
        (status = 400, description = "Invalid field or location", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 422, description = "Unknown region, distant path, or bad photos", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "submitReport",
    security(("SessionCookie" = []))
)]
#[post("/reports")]
pub async fn submit_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReportDraftBody>,
) -> ApiResult<HttpResponse> {
    let author_id = session.require_user_id()?;
    let report = state
        .submission
        .submit(SubmitReportRequest {
            author_id,
            draft: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created().json(ReportBody::from(&report)))
}

/// List reports, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "A page of reports", body = ReportListBody),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "listReports"
)]
#[get("/reports")]
pub async fn list_reports(
    state: web::Data<HttpState>,
    query: web::Query<ReportListQuery>,
) -> ApiResult<web::Json<ReportListBody>> {
    let query = query.into_inner();
    let filter = ReportListFilter {
        status: query
            .status
            .as_deref()
            .map(|value| parse_status(value, FieldName::new("status")))
            .transpose()?,
        region_code: query
            .region_code
            .as_deref()
            .map(|value| parse_region_code(value, FieldName::new("region_code")))
            .transpose()?,
        author_id: query
            .author_id
            .as_deref()
            .map(|value| parse_user_id(value, FieldName::new("author_id")))
            .transpose()?,
        page: page_request(query.limit, query.offset),
    };
    let page_request = filter.page;
    let page = state.reports.list(filter).await?;
    Ok(web::Json(ReportListBody::new(&page, page_request)))
}

/// Fetch one report.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report identifier")),
    responses(
        (status = 200, description = "The report", body = ReportBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No such report", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "getReport"
)]
#[get("/reports/{id}")]
pub async fn get_report(
    state: web::Data<HttpState>,
    path: web::Path<ReportPath>,
) -> ApiResult<web::Json<ReportBody>> {
    let report_id = parse_report_id(&path.id, FieldName::new("id"))?;
    let report = state.reports.get(report_id).await?;
    Ok(web::Json(ReportBody::from(&report)))
}

/// Replace the content of a report that is still `submitted`.
#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report identifier")),
    request_body = ReportDraftBody,
    responses(
        (status = 200, description = "Report revised", body = ReportBody),
        (status = 400, description = "Invalid field or location", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Caller is not the author", body = ErrorSchema),
        (status = 404, description = "No such report", body = ErrorSchema),
        (status = 409, description = "Report is no longer editable", body = ErrorSchema),
        (status = 422, description = "Unknown region, distant path, or bad photos", body = ErrorSchema),
        (status = 503, description = "Dependency unavailable", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "reviseReport",
    security(("SessionCookie" = []))
)]
#[put("/reports/{id}")]
pub async fn revise_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ReportPath>,
    payload: web::Json<ReportDraftBody>,
) -> ApiResult<web::Json<ReportBody>> {
    let actor = session.require_user_id()?;
    let report_id = parse_report_id(&path.id, FieldName::new("id"))?;
    let report = state
        .submission
        .revise(ReviseReportRequest {
            report_id,
            actor,
            draft: payload.into_inner().into(),
        })
        .await?;
    Ok(web::Json(ReportBody::from(&report)))
}

/// Advance a report to its next lifecycle state.
#[utoipa::path(
    patch,
    path = "/api/v1/reports/{id}/status",
    params(("id" = String, Path, description = "Report identifier")),
    request_body = ChangeStatusBody,
    responses(
        (status = 200, description = "Status changed", body = ReportBody),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Caller may not change status", body = ErrorSchema),
        (status = 404, description = "No such report", body = ErrorSchema),
        (status = 409, description = "Not the next state", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "changeReportStatus",
    security(("SessionCookie" = []))
)]
#[patch("/reports/{id}/status")]
pub async fn change_report_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ReportPath>,
    payload: web::Json<ChangeStatusBody>,
) -> ApiResult<web::Json<ReportBody>> {
    let actor = session.require_user_id()?;
    let report_id = parse_report_id(&path.id, FieldName::new("id"))?;
    let target = parse_status(&payload.status, FieldName::new("status"))?;
    let report = state
        .lifecycle
        .change_status(ChangeStatusRequest {
            report_id,
            actor,
            target,
        })
        .await?;
    Ok(web::Json(ReportBody::from(&report)))
}

/// Delete a report on behalf of its author.
#[utoipa::path(
    delete,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report identifier")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 403, description = "Caller is not the author", body = ErrorSchema),
        (status = 404, description = "No such report", body = ErrorSchema),
        (status = 409, description = "Report changed concurrently", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "deleteReport",
    security(("SessionCookie" = []))
)]
#[delete("/reports/{id}")]
pub async fn delete_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<ReportPath>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let report_id = parse_report_id(&path.id, FieldName::new("id"))?;
    state.lifecycle.delete(report_id, actor).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
