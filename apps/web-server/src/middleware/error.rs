//! Error handling at the request boundary.
//!
//! Every failure taxon maps to a fixed rendered page: 404 and 403 and 500
//! are static templates with fixed status codes; CSRF failures get their
//! own 403 page. Ownership violations never surface here - handlers turn
//! them into silent redirects to the resource's detail view.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use gazette_core::error::RepoError;

const PAGE_403: &str = include_str!("../../templates/pages/403.html");
const PAGE_403_CSRF: &str = include_str!("../../templates/pages/403csrf.html");
const PAGE_404: &str = include_str!("../../templates/pages/404.html");
const PAGE_500: &str = include_str!("../../templates/pages/500.html");

/// Application-level error type rendered as a static error page.
#[derive(Debug)]
pub enum AppError {
    NotFound,
    Forbidden,
    CsrfFailure,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not found"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::CsrfFailure => write!(f, "CSRF verification failed"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden | AppError::CsrfFailure => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound => PAGE_404,
            AppError::Forbidden => PAGE_403,
            AppError::CsrfFailure => PAGE_403_CSRF,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                PAGE_500
            }
        };

        HttpResponse::build(self.status_code())
            .content_type("text/html; charset=utf-8")
            .body(body)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Constraint(msg) => {
                tracing::error!("Constraint violation: {}", msg);
                AppError::Internal(msg)
            }
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                tracing::error!("Database error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::Internal(format!("Template error: {}", err))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
