//! Error envelope and rejection recovery.

use crate::error::FfdbError;
use serde::Serialize;
use std::convert::Infallible;
use tracing::error;
use warp::http::StatusCode;

/// Rejection carrying a service error up to [`handle_rejection`]
#[derive(Debug)]
pub struct ApiError(pub FfdbError);

impl warp::reject::Reject for ApiError {}

impl From<FfdbError> for ApiError {
    fn from(err: FfdbError) -> Self {
        ApiError(err)
    }
}

pub fn reject(err: FfdbError) -> warp::Rejection {
    warp::reject::custom(ApiError(err))
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn error_code(err: &FfdbError) -> &'static str {
    match err {
        FfdbError::InvalidParameter { .. } => "INVALID_PARAMETER",
        FfdbError::InvalidPosition { .. } => "INVALID_POSITION",
        FfdbError::Config { .. } => "NOT_CONFIGURED",
        FfdbError::Database(_) | FfdbError::LockPoisoned => "DATABASE_ERROR",
        FfdbError::Http(_) | FfdbError::Provider { .. } => "UPSTREAM_ERROR",
        _ => "INTERNAL_ERROR",
    }
}

/// Turn any rejection into the JSON error envelope.
pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, body) = if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("NOT_FOUND", "No such endpoint"),
        )
    } else if let Some(ApiError(e)) = err.find::<ApiError>() {
        if e.is_client_error() {
            (StatusCode::BAD_REQUEST, ErrorResponse::new(error_code(e), e.to_string()))
        } else {
            error!("Request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(error_code(e), e.to_string()),
            )
        }
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_PARAMETER", e.to_string()),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed"),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", format!("{err:?}")),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
