//! # Gazette Infrastructure
//!
//! Concrete implementations of the ports defined in `gazette-core`:
//! SeaORM entities and repositories, the post visibility query builder,
//! and the password and session services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, SessionConfig, SignedSessionService};
pub use database::{DatabaseConfig, connect};
pub use sea_orm::DbConn;
