//! # Gazette Shared
//!
//! Form data types shared between the request handlers and the templates:
//! what the browser posts, the declarative rules it is checked against, and
//! the field-level errors a failed submission renders back.

pub mod forms;

pub use forms::FormErrors;
