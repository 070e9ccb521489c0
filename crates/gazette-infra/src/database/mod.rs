//! Database access: connection setup, entities, the post query builder and
//! the repository implementations.

mod connections;
pub mod entity;
mod paginate;
mod post_query;
mod postgres_base;
pub mod postgres_repo;

pub use connections::{DatabaseConfig, connect};
pub use paginate::clamped_page;
pub use post_query::build_post_select;
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

#[cfg(test)]
mod tests;
