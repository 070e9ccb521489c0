//! Post listings, the detail page, and author-only post CRUD.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use tera::Context;
use uuid::Uuid;

use gazette_core::domain::{Category, Location, Post};
use gazette_core::pagination::DEFAULT_PAGE_SIZE;
use gazette_core::ports::{PostQueryOptions, PostSelection};
use gazette_shared::forms::{FormErrors, FormVariant, PostFormData};

use crate::csrf;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::render::{page_number, render, see_other};
use crate::state::AppState;

pub(crate) fn post_detail_url(post_id: Uuid) -> String {
    format!("/posts/{post_id}")
}

/// GET / - the public listing.
pub async fn index(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .page_overviews(
            PostSelection::All,
            PostQueryOptions::public(),
            DEFAULT_PAGE_SIZE,
            page_number(&req),
        )
        .await?;

    let mut context = Context::new();
    context.insert("page", &page);
    render(&state, "blog/index.html", &context)
}

/// GET /category/{slug} - one published category's visible posts.
///
/// The category itself 404s when missing or unpublished, independent of
/// post-level filtering.
pub async fn category_posts(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_published_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let page = state
        .posts
        .page_overviews(
            PostSelection::InCategory(category.id),
            PostQueryOptions::public(),
            DEFAULT_PAGE_SIZE,
            page_number(&req),
        )
        .await?;

    let mut context = Context::new();
    context.insert("category", &category);
    context.insert("page", &page);
    render(&state, "blog/category.html", &context)
}

/// GET /posts/{post_id} - the detail page with its comments and an empty
/// comment form.
///
/// Reachable by non-authors only while the post is publicly visible;
/// reachable by the author unconditionally.
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_overview(post_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !post.is_visible_to(viewer.user_id(), Utc::now()) {
        return Err(AppError::NotFound);
    }

    let comments = state.comments.visible_for_post(post_id).await?;

    let mut context = Context::new();
    context.insert("post", &post);
    context.insert("comments", &comments);
    context.insert("viewer_id", &viewer.user_id());
    csrf::render_form(&state, &req, "blog/detail.html", &mut context)
}

async fn form_choices(state: &AppState) -> AppResult<(Vec<Category>, Vec<Location>)> {
    Ok((
        state.categories.list_published().await?,
        state.locations.list_published().await?,
    ))
}

fn post_form_context(
    form: &PostFormData,
    errors: &FormErrors,
    categories: &[Category],
    locations: &[Location],
    confirm_delete: bool,
) -> Context {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("categories", categories);
    context.insert("locations", locations);
    context.insert("confirm_delete", &confirm_delete);
    context
}

/// GET /posts/create - login required.
pub async fn create_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let (categories, locations) = form_choices(&state).await?;
    let mut context = post_form_context(
        &PostFormData::default(),
        &FormErrors::new(),
        &categories,
        &locations,
        false,
    );
    csrf::render_form(&state, &req, "blog/create.html", &mut context)
}

/// POST /posts/create - the author is always the requester, whatever the
/// submitted form contained.
pub async fn create(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    match form.validate(FormVariant::PostCreate) {
        Ok(valid) => {
            let post = Post::new(
                identity.user_id,
                valid.title,
                valid.text,
                valid.pub_date,
                valid.location_id,
                valid.category_id,
                valid.image,
            );
            state.posts.insert(post).await?;
            Ok(see_other(format!("/profile/{}", identity.username)))
        }
        Err(errors) => {
            let (categories, locations) = form_choices(&state).await?;
            let mut context = post_form_context(&form, &errors, &categories, &locations, false);
            csrf::render_form(&state, &req, "blog/create.html", &mut context)
        }
    }
}

/// GET /posts/{post_id}/edit - non-authors are bounced to the detail page.
pub async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let Some(post) = state.posts.find_by_id(post_id).await? else {
        return Err(AppError::NotFound);
    };
    if post.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    let (categories, locations) = form_choices(&state).await?;
    let mut context = post_form_context(
        &PostFormData::from_post(&post),
        &FormErrors::new(),
        &categories,
        &locations,
        false,
    );
    csrf::render_form(&state, &req, "blog/create.html", &mut context)
}

/// POST /posts/{post_id}/edit
pub async fn edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let post_id = path.into_inner();
    let Some(mut post) = state.posts.find_by_id(post_id).await? else {
        return Err(AppError::NotFound);
    };
    if post.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    match form.validate(FormVariant::PostEdit) {
        Ok(valid) => {
            post.title = valid.title;
            post.text = valid.text;
            post.pub_date = valid.pub_date;
            post.location_id = valid.location_id;
            post.category_id = valid.category_id;
            post.image = valid.image;
            state.posts.update(post).await?;
            Ok(see_other(post_detail_url(post_id)))
        }
        Err(errors) => {
            let (categories, locations) = form_choices(&state).await?;
            let mut context = post_form_context(&form, &errors, &categories, &locations, false);
            csrf::render_form(&state, &req, "blog/create.html", &mut context)
        }
    }
}

/// GET /posts/{post_id}/delete - renders the filled form as confirmation.
pub async fn delete_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let Some(post) = state.posts.find_by_id(post_id).await? else {
        return Err(AppError::NotFound);
    };
    if post.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    let (categories, locations) = form_choices(&state).await?;
    let mut context = post_form_context(
        &PostFormData::from_post(&post),
        &FormErrors::new(),
        &categories,
        &locations,
        true,
    );
    csrf::render_form(&state, &req, "blog/create.html", &mut context)
}

/// POST /posts/{post_id}/delete - the confirming second request.
pub async fn delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let post_id = path.into_inner();
    let Some(post) = state.posts.find_by_id(post_id).await? else {
        return Err(AppError::NotFound);
    };
    if post.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    state.posts.delete(post_id).await?;
    Ok(see_other("/"))
}
