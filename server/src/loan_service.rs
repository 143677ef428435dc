//! Loan offer service
//!
//! Lenders publish offers; any authenticated caller lists the ones still available.

use std::sync::Arc;

use crate::auth::{authorize_role, AuthError};
use crate::models::{CreateLoanRequest, Identity, Loan, LoanListing, LoanStatus, NewLoan, Role};
use crate::store::{LoanStore, StoreError};

/// Loan service error
#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Loan service
pub struct LoanService {
    loans: Arc<dyn LoanStore>,
}

impl LoanService {
    /// Create a new loan service
    pub fn new(loans: Arc<dyn LoanStore>) -> Self {
        Self { loans }
    }

    /// Publish an offer on behalf of `identity`
    ///
    /// # Errors
    /// Returns [`AuthError::Forbidden`] unless the caller is a lender
    pub async fn create_offer(
        &self,
        identity: &Identity,
        req: CreateLoanRequest,
    ) -> Result<Loan, LoanError> {
        authorize_role(identity, Role::Lender)?;

        let loan = self
            .loans
            .insert_loan(NewLoan {
                amount: req.amount,
                interest_rate: req.interest_rate,
                duration_months: req.duration_months,
                lender_id: identity.user_id,
            })
            .await?;

        tracing::info!(
            loan_id = %loan.id,
            lender_id = %loan.lender_id,
            "Loan offer created"
        );
        Ok(loan)
    }

    /// List offers with status `available`
    pub async fn list_available(
        &self,
        _identity: &Identity,
    ) -> Result<Vec<LoanListing>, LoanError> {
        Ok(self.loans.list_by_status(LoanStatus::Available).await?)
    }
}
