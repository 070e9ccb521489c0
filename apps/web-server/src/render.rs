//! Template rendering and redirect shortcuts.

use actix_web::{HttpRequest, HttpResponse, http::header};
use tera::Context;

use gazette_core::pagination::PageNumber;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Render `template` with `context` into a 200 HTML response.
pub fn render(state: &AppState, template: &str, context: &Context) -> AppResult<HttpResponse> {
    let body = state.templates.render(template, context)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// A See Other redirect, used after form submissions and for ownership
/// violations (which silently bounce to the resource's detail view).
pub fn see_other(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.as_ref().to_owned()))
        .finish()
}

/// The requested 1-based page number, from the `page` query parameter.
pub fn page_number(req: &HttpRequest) -> PageNumber {
    let raw = req
        .query_string()
        .split('&')
        .find_map(|pair| pair.strip_prefix("page="));
    PageNumber::from_query(raw)
}
