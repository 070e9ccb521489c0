//! Comment handlers, scoped to one post's comment collection.

use actix_web::{HttpRequest, HttpResponse, web};
use tera::Context;
use uuid::Uuid;

use gazette_core::domain::Comment;
use gazette_shared::forms::{CommentFormData, FormErrors};

use crate::csrf;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::render::see_other;
use crate::state::AppState;

use super::posts::post_detail_url;

/// Look up a comment inside the post's collection; a comment under a
/// different post is as good as missing.
async fn scoped_comment(
    state: &AppState,
    post_id: Uuid,
    comment_id: Uuid,
) -> AppResult<Comment> {
    let Some(comment) = state.comments.find_by_id(comment_id).await? else {
        return Err(AppError::NotFound);
    };
    if comment.post_id != post_id {
        return Err(AppError::NotFound);
    }
    Ok(comment)
}

fn comment_form_context(
    comment: &Comment,
    form: &CommentFormData,
    errors: &FormErrors,
    confirm_delete: bool,
) -> Context {
    let mut context = Context::new();
    context.insert("comment", comment);
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("confirm_delete", &confirm_delete);
    context
}

/// POST /posts/{post_id}/comment - login required. An invalid submission
/// falls back to the detail page with nothing saved.
pub async fn add(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<Uuid>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let post_id = path.into_inner();
    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    if let Ok(valid) = form.validate() {
        let comment = Comment::new(post_id, identity.user_id, valid.text);
        state.comments.insert(comment).await?;
    }

    Ok(see_other(post_detail_url(post_id)))
}

/// GET /posts/{post_id}/edit_comment/{comment_id}
pub async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = scoped_comment(&state, post_id, comment_id).await?;
    if comment.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    let form = CommentFormData {
        csrf_token: String::new(),
        text: comment.text.clone(),
    };
    let mut context = comment_form_context(&comment, &form, &FormErrors::new(), false);
    csrf::render_form(&state, &req, "blog/comment.html", &mut context)
}

/// POST /posts/{post_id}/edit_comment/{comment_id}
pub async fn edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let (post_id, comment_id) = path.into_inner();
    let mut comment = scoped_comment(&state, post_id, comment_id).await?;
    if comment.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    match form.validate() {
        Ok(valid) => {
            comment.text = valid.text;
            state.comments.update(comment).await?;
            Ok(see_other(post_detail_url(post_id)))
        }
        Err(errors) => {
            let mut context = comment_form_context(&comment, &form, &errors, false);
            csrf::render_form(&state, &req, "blog/comment.html", &mut context)
        }
    }
}

/// GET /posts/{post_id}/delete_comment/{comment_id} - confirmation page.
pub async fn delete_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = scoped_comment(&state, post_id, comment_id).await?;
    if comment.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    let form = CommentFormData {
        csrf_token: String::new(),
        text: comment.text.clone(),
    };
    let mut context = comment_form_context(&comment, &form, &FormErrors::new(), true);
    csrf::render_form(&state, &req, "blog/comment.html", &mut context)
}

/// POST /posts/{post_id}/delete_comment/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<CommentFormData>,
) -> AppResult<HttpResponse> {
    csrf::verify(&req, &form.csrf_token)?;

    let (post_id, comment_id) = path.into_inner();
    let comment = scoped_comment(&state, post_id, comment_id).await?;
    if comment.author_id != identity.user_id {
        return Ok(see_other(post_detail_url(post_id)));
    }

    state.comments.delete(comment_id).await?;
    Ok(see_other(post_detail_url(post_id)))
}
