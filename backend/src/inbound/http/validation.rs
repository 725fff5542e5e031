//! Parsing helpers for path and query parameters.
//!
//! Body fields are validated by the domain; these helpers only cover values
//! the HTTP layer must understand before it can call a port at all.

use std::str::FromStr;

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use serde_json::json;

use crate::domain::report::{
    MAX_PAGE_LIMIT, PageRequest, RegionCode, ReportId, ReportStatus,
};
use crate::domain::{Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidStatus,
    InvalidRegionCode,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidRegionCode => "invalid_region_code",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_report_id(value: &str, field: FieldName) -> Result<ReportId, Error> {
    ReportId::from_str(value).map_err(|_| {
        invalid_value(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| {
        invalid_value(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<ReportStatus, Error> {
    ReportStatus::from_str(value).map_err(|_| {
        let expected: Vec<&str> = ReportStatus::ALL.iter().map(|s| s.as_str()).collect();
        invalid_value(
            field,
            ErrorCode::InvalidStatus,
            format!("{} must be one of {}", field.as_str(), expected.join(", ")),
            value,
        )
    })
}

pub(crate) fn parse_region_code(value: &str, field: FieldName) -> Result<RegionCode, Error> {
    RegionCode::new(value).map_err(|error| {
        invalid_value(field, ErrorCode::InvalidRegionCode, error.to_string(), value)
    })
}

/// Normalise raw pagination parameters.
///
/// Missing, zero or negative limits use the default page size, larger ones
/// are clamped to the maximum. Negative offsets start from the beginning.
pub(crate) fn page_request(limit: Option<i64>, offset: Option<i64>) -> PageRequest {
    let limit = limit
        .filter(|value| *value > 0)
        .map(|value| u32::try_from(value.min(i64::from(MAX_PAGE_LIMIT))).unwrap_or(MAX_PAGE_LIMIT));
    let offset = offset.map(|value| u64::try_from(value).unwrap_or(0));
    PageRequest::new(limit, offset)
}

fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("request body is invalid: {error}"))
        .with_details(json!({"code": ErrorCode::MalformedBody.as_str()}))
        .into()
}

fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("query string is invalid: {error}"))
        .with_details(json!({"code": ErrorCode::MalformedQuery.as_str()}))
        .into()
}

/// JSON extractor settings that report malformed bodies as domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor settings that report malformed query strings as domain
/// errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
