//! Application state - shared across all handlers.

use std::sync::Arc;

use gazette_infra::DbConn;

use gazette_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use gazette_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state. Handlers see the repositories through their
/// ports, so tests can swap in stub implementations.
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<tera::Tera>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Build the application state on a live database connection.
    pub fn new(db: DbConn, templates: tera::Tera) -> Self {
        let db = Arc::new(db);
        Self {
            templates: Arc::new(templates),
            users: Arc::new(PostgresUserRepository::shared(db.clone())),
            posts: Arc::new(PostgresPostRepository::shared(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::shared(db.clone())),
            locations: Arc::new(PostgresLocationRepository::shared(db.clone())),
            comments: Arc::new(PostgresCommentRepository::shared(db)),
        }
    }
}
