//! Double-submit CSRF protection.
//!
//! A random token is set as a cookie when a form page renders and echoed in
//! a hidden field; mutating handlers require the pair to match. A mismatch
//! renders the dedicated CSRF failure page.

use actix_web::{
    HttpRequest, HttpResponse,
    cookie::{Cookie, SameSite},
};
use tera::Context;

use crate::middleware::error::{AppError, AppResult};
use crate::render::render;
use crate::state::AppState;

/// Name of the CSRF cookie.
pub const CSRF_COOKIE: &str = "csrftoken";

fn issue_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn csrf_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE, token.to_owned())
        .path("/")
        .same_site(SameSite::Lax)
        .finish()
}

/// The request's CSRF token, minting a new cookie when it has none yet.
fn ensure_token(req: &HttpRequest) -> (String, Option<Cookie<'static>>) {
    match req.cookie(CSRF_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => (cookie.value().to_owned(), None),
        _ => {
            let token = issue_token();
            let cookie = csrf_cookie(&token);
            (token, Some(cookie))
        }
    }
}

/// Render a form template with `csrf_token` in its context, setting the
/// token cookie if the client lacks one.
pub fn render_form(
    state: &AppState,
    req: &HttpRequest,
    template: &str,
    context: &mut Context,
) -> AppResult<HttpResponse> {
    let (token, new_cookie) = ensure_token(req);
    context.insert("csrf_token", &token);

    let mut response = render(state, template, context)?;
    if let Some(cookie) = new_cookie {
        response
            .add_cookie(&cookie)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    Ok(response)
}

/// Check a submitted token against the cookie.
pub fn verify(req: &HttpRequest, submitted: &str) -> AppResult<()> {
    let cookie = req.cookie(CSRF_COOKIE);
    match cookie {
        Some(cookie) if !cookie.value().is_empty() && cookie.value() == submitted => Ok(()),
        _ => Err(AppError::CsrfFailure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn matching_pair_verifies() {
        let req = TestRequest::post()
            .cookie(Cookie::new(CSRF_COOKIE, "tok"))
            .to_http_request();
        assert!(verify(&req, "tok").is_ok());
    }

    #[test]
    fn missing_or_mismatched_token_fails() {
        let req = TestRequest::post().to_http_request();
        assert!(matches!(verify(&req, "tok"), Err(AppError::CsrfFailure)));

        let req = TestRequest::post()
            .cookie(Cookie::new(CSRF_COOKIE, "tok"))
            .to_http_request();
        assert!(matches!(verify(&req, "other"), Err(AppError::CsrfFailure)));

        let req = TestRequest::post()
            .cookie(Cookie::new(CSRF_COOKIE, ""))
            .to_http_request();
        assert!(matches!(verify(&req, ""), Err(AppError::CsrfFailure)));
    }
}
