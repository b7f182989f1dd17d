use crate::views;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use snip_links::LinkError;
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, AppError>;

/// Request failures that end in an error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("link not found")]
    NotFound,
    #[error("Dashboard access code not configured")]
    DashboardUnconfigured,
    #[error("dashboard access denied")]
    AccessDenied,
    #[error("{0}")]
    BadRequest(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to fetch original content")]
    BadGateway(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LinkError> for AppError {
    fn from(value: LinkError) -> Self {
        match value {
            LinkError::Storage(err) => AppError::Unavailable(err.to_string()),
            LinkError::Fetch(err) => AppError::BadGateway(err.to_string()),
            err @ LinkError::IdSpaceExhausted { .. } => AppError::Internal(err.to_string()),
            err => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, page) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, views::error::not_found()),
            AppError::DashboardUnconfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                views::error::page("Error", "Dashboard access code not configured"),
            ),
            AppError::AccessDenied => (StatusCode::UNAUTHORIZED, views::error::access_required()),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, views::error::page("Error", message))
            }
            AppError::Unavailable(reason) => {
                warn!(reason = %reason, "storage unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    views::error::page(
                        "Service unavailable",
                        "The link store cannot be reached right now. Please try again later.",
                    ),
                )
            }
            AppError::BadGateway(reason) => {
                warn!(reason = %reason, "proxy fetch failed");
                (
                    StatusCode::BAD_GATEWAY,
                    views::error::page("Error", "Failed to fetch original content"),
                )
            }
            AppError::Internal(reason) => {
                error!(reason = %reason, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error::page("Error", "Something went wrong. Please try again."),
                )
            }
        };

        (status, Html(page)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_core::StorageError;

    #[test]
    fn link_errors_map_to_statuses() {
        let cases = [
            (
                AppError::from(LinkError::Storage(StorageError::Timeout("slow".into()))),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::from(LinkError::InvalidUrl("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(LinkError::IdSpaceExhausted { attempts: 3 }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (AppError::AccessDenied, StatusCode::UNAUTHORIZED),
            (AppError::DashboardUnconfigured, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
