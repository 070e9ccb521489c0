//! Request-boundary plumbing: identity extractors and error rendering.

pub mod auth;
pub mod error;
