//! HTTP inbound adapter exposing REST endpoints under `/api/v1`.

pub mod checks;
pub mod error;
pub mod health;
pub mod reports;
pub mod reports_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
