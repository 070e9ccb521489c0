//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;

pub use auth::{AuthError, PasswordService, SessionClaims, SessionService};
pub use repository::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostQueryOptions,
    PostRepository, PostSelection, UserRepository,
};
