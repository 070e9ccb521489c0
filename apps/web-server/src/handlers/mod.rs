//! HTTP handlers and route configuration.

pub mod auth;
pub mod comments;
pub mod pages;
pub mod posts;
pub mod profile;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/category/{slug}", web::get().to(posts::category_posts))
        .service(
            web::scope("/posts")
                // fixed segments before the {post_id} matcher
                .route("/create", web::get().to(posts::create_form))
                .route("/create", web::post().to(posts::create))
                .route("/{post_id}", web::get().to(posts::detail))
                .route("/{post_id}/edit", web::get().to(posts::edit_form))
                .route("/{post_id}/edit", web::post().to(posts::edit))
                .route("/{post_id}/delete", web::get().to(posts::delete_form))
                .route("/{post_id}/delete", web::post().to(posts::delete))
                .route("/{post_id}/comment", web::post().to(comments::add))
                .route(
                    "/{post_id}/edit_comment/{comment_id}",
                    web::get().to(comments::edit_form),
                )
                .route(
                    "/{post_id}/edit_comment/{comment_id}",
                    web::post().to(comments::edit),
                )
                .route(
                    "/{post_id}/delete_comment/{comment_id}",
                    web::get().to(comments::delete_form),
                )
                .route(
                    "/{post_id}/delete_comment/{comment_id}",
                    web::post().to(comments::delete),
                ),
        )
        .service(
            web::scope("/profile")
                .route("/edit", web::get().to(profile::edit_form))
                .route("/edit", web::post().to(profile::edit))
                .route("/{username}", web::get().to(profile::view)),
        )
        .service(
            web::scope("/auth")
                .route("/login", web::get().to(auth::login_form))
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::get().to(auth::logout))
                .route("/register", web::get().to(auth::register_form))
                .route("/register", web::post().to(auth::register)),
        );
}
