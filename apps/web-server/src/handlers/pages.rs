//! Static error pages for unmatched routes.

use actix_web::{HttpResponse, ResponseError};

use crate::middleware::error::AppError;

/// Fallback handler: anything outside the route table is a rendered 404.
pub async fn not_found() -> HttpResponse {
    AppError::NotFound.error_response()
}
