//! Login, logout and registration.

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use tera::Context;

use gazette_core::domain::User;
use gazette_core::ports::{PasswordService, SessionService};
use gazette_shared::forms::{FormErrors, LoginFormData, RegisterFormData};

use crate::csrf;
use crate::middleware::auth::{clear_session_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::render::see_other;
use crate::state::AppState;

fn internal(e: impl std::fmt::Display) -> AppError {
    AppError::Internal(e.to_string())
}

/// Redirect target plus the freshly issued session cookie.
fn logged_in_response(
    sessions: &Arc<dyn SessionService>,
    user: &User,
) -> AppResult<HttpResponse> {
    let token = sessions.issue(user.id, &user.username).map_err(internal)?;
    let mut response = see_other(format!("/profile/{}", user.username));
    response
        .add_cookie(&session_cookie(token, sessions.ttl_seconds()))
        .map_err(internal)?;
    Ok(response)
}

/// GET /auth/login
pub async fn login_form(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let mut context = Context::new();
    context.insert("form", &LoginFormData::default());
    context.insert("errors", &FormErrors::new());
    csrf::render_form(&state, &req, "auth/login.html", &mut context)
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    sessions: web::Data<Arc<dyn SessionService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<LoginFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            let mut context = Context::new();
            context.insert("form", &*form);
            context.insert("errors", &errors);
            return csrf::render_form(&state, &req, "auth/login.html", &mut context);
        }
    };

    let user = state.users.find_by_username(&valid.username).await?;
    let verified = match &user {
        Some(user) => passwords
            .verify(&valid.password, &user.password_hash)
            .map_err(internal)?,
        None => false,
    };

    match user {
        Some(user) if verified => logged_in_response(&sessions, &user),
        _ => {
            let mut context = Context::new();
            context.insert("form", &*form);
            context.insert("errors", &FormErrors::new());
            context.insert("form_error", "Invalid username or password.");
            csrf::render_form(&state, &req, "auth/login.html", &mut context)
        }
    }
}

/// GET /auth/logout
pub async fn logout() -> AppResult<HttpResponse> {
    let mut response = see_other("/");
    response
        .add_cookie(&clear_session_cookie())
        .map_err(internal)?;
    Ok(response)
}

/// GET /auth/register
pub async fn register_form(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let mut context = Context::new();
    context.insert("form", &RegisterFormData::default());
    context.insert("errors", &FormErrors::new());
    csrf::render_form(&state, &req, "auth/register.html", &mut context)
}

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    req: HttpRequest,
    sessions: web::Data<Arc<dyn SessionService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<RegisterFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let errors = match form.validate() {
        Ok(valid) => {
            let mut errors = FormErrors::new();
            if state.users.find_by_username(&valid.username).await?.is_some() {
                errors.add("username", "A user with that username already exists.");
            }
            if state.users.find_by_email(&valid.email).await?.is_some() {
                errors.add("email", "A user with that email already exists.");
            }

            if errors.is_empty() {
                let password_hash = passwords.hash(&valid.password).map_err(internal)?;
                let user = User::new(valid.username, valid.email, password_hash);
                let user = state.users.insert(user).await?;
                return logged_in_response(&sessions, &user);
            }
            errors
        }
        Err(errors) => errors,
    };

    let mut context = Context::new();
    context.insert("form", &*form);
    context.insert("errors", &errors);
    csrf::render_form(&state, &req, "auth/register.html", &mut context)
}
