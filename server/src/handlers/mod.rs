//! API handlers for the lending backend

pub mod auth;
pub mod loan;

pub use auth::{login, register};
pub use loan::{create_loan, list_loans};

/// Service banner
pub async fn root() -> &'static str {
    "Lending API Server"
}

pub async fn health_check() -> &'static str {
    "OK"
}
