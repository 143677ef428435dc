//! Request extractors shared by the handlers

pub mod auth;
pub mod json;

pub use auth::{AuthenticatedUser, LenderUser};
pub use json::ValidatedJson;
