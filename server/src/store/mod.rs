//! Persistence ports for users and loans.

use async_trait::async_trait;

use crate::models::{Loan, LoanListing, LoanStatus, NewLoan, NewUser, User};

#[cfg(any(test, feature = "test-support"))]
mod memory;
mod postgres;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Email already registered")]
    DuplicateEmail,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::DuplicateEmail`] when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn insert_loan(&self, loan: NewLoan) -> Result<Loan, StoreError>;

    /// Loans in `status`, newest first, with the lender projection resolved.
    async fn list_by_status(&self, status: LoanStatus) -> Result<Vec<LoanListing>, StoreError>;
}
