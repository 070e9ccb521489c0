//! Profile pages: a user's post listing and the self-service edit form.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use tera::Context;

use gazette_core::pagination::DEFAULT_PAGE_SIZE;
use gazette_core::ports::{PostQueryOptions, PostSelection};
use gazette_shared::forms::{FormErrors, ProfileFormData};

use crate::csrf;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::render::{page_number, render, see_other};
use crate::state::AppState;

/// GET /profile/{username}
///
/// Owners see all of their posts, including unpublished and scheduled
/// ones; everyone else gets the visibility-filtered listing. Both are
/// ordered by descending publication time.
pub async fn view(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    req: HttpRequest,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let Some(user) = state.users.find_by_username(&username).await? else {
        return Err(AppError::NotFound);
    };

    let is_owner = viewer.user_id() == Some(user.id);
    let options = if is_owner {
        PostQueryOptions::for_owner()
    } else {
        PostQueryOptions::public()
    };

    let page = state
        .posts
        .page_overviews(
            PostSelection::ByAuthor(user.id),
            options,
            DEFAULT_PAGE_SIZE,
            page_number(&req),
        )
        .await?;

    let mut context = Context::new();
    context.insert("profile", &user);
    context.insert("is_owner", &is_owner);
    context.insert("page", &page);
    render(&state, "blog/profile.html", &context)
}

/// GET /profile/edit - login required, own profile only.
pub async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let Some(user) = state.users.find_by_id(identity.user_id).await? else {
        return Err(AppError::NotFound);
    };

    let mut context = Context::new();
    context.insert("form", &ProfileFormData::from_user(&user));
    context.insert("errors", &FormErrors::new());
    csrf::render_form(&state, &req, "blog/user.html", &mut context)
}

/// POST /profile/edit - updates the requester's own fields only.
pub async fn edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    form: web::Form<ProfileFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let Some(mut user) = state.users.find_by_id(identity.user_id).await? else {
        return Err(AppError::NotFound);
    };

    match form.validate() {
        Ok(valid) => {
            user.first_name = valid.first_name;
            user.last_name = valid.last_name;
            user.email = valid.email;
            user.avatar = valid.avatar;
            user.updated_at = Utc::now();
            state.users.update(user).await?;
            Ok(see_other(format!("/profile/{}", identity.username)))
        }
        Err(errors) => {
            let mut context = Context::new();
            context.insert("form", &*form);
            context.insert("errors", &errors);
            csrf::render_form(&state, &req, "blog/user.html", &mut context)
        }
    }
}
