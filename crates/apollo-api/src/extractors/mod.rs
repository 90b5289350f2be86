//! Axum extractors for request handling
//!
//! Custom extractors for sessions, path parameters, and form validation.

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser, SESSION_COOKIE};
pub use path::{IdPath, KindPath, RelationPath};
pub use validated::{FormBody, QueryParams, ValidatedForm};
