//! Authenticated identity extractors.
//!
//! The session cookie carries a signed token; [`Identity`] validates it and
//! fails by redirecting to the login page, which is what gates every
//! login-required route. [`OptionalIdentity`] never fails and is used where
//! anonymous viewers are fine but authors get extra visibility.

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError,
    cookie::{Cookie, SameSite, time::Duration},
    dev::Payload,
    http::{StatusCode, header},
};
use std::future::{Ready, ready};
use std::sync::Arc;

use gazette_core::ports::{SessionClaims, SessionService};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gazette_session";

/// Where unauthenticated requests are sent.
pub const LOGIN_URL: &str = "/auth/login";

/// The authenticated user behind the current request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Extraction failure: the request is not authenticated. Renders as a
/// redirect to the login page rather than an error body.
#[derive(Debug)]
pub struct LoginRequired;

impl std::fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "login required")
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, LOGIN_URL))
            .finish()
    }
}

fn claims_from_request(req: &HttpRequest) -> Option<SessionClaims> {
    let sessions = match req.app_data::<actix_web::web::Data<Arc<dyn SessionService>>>() {
        Some(service) => service,
        None => {
            tracing::error!("SessionService not found in app data");
            return None;
        }
    };

    let cookie = req.cookie(SESSION_COOKIE)?;
    match sessions.decode(cookie.value()) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Rejected session cookie: {}", e);
            None
        }
    }
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).map(Identity::from).ok_or(LoginRequired))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(
            claims_from_request(req).map(Identity::from),
        )))
    }
}

/// Session cookie carrying a freshly issued token.
pub fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Expired session cookie, for logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish()
}
