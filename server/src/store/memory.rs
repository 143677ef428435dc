//! In-process store used by tests

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LoanStore, StoreError, UserStore};
use crate::models::{LenderSummary, Loan, LoanListing, LoanStatus, NewLoan, NewUser, User};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    loans: RwLock<Vec<Loan>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored loans regardless of status
    pub async fn loan_count(&self) -> usize {
        self.loans.read().await.len()
    }

    /// Insert a loan with an explicit status, bypassing the offer flow
    pub async fn insert_loan_with_status(&self, loan: NewLoan, status: LoanStatus) -> Loan {
        let loan = Loan {
            id: Uuid::new_v4(),
            amount: loan.amount,
            interest_rate: loan.interest_rate,
            duration_months: loan.duration_months,
            lender_id: loan.lender_id,
            loan_taker_id: None,
            status,
            created_at: Utc::now(),
        };
        self.loans.write().await.push(loan.clone());
        loan
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            occupation: user.occupation,
            contact_number: user.contact_number,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl LoanStore for MemoryStore {
    async fn insert_loan(&self, loan: NewLoan) -> Result<Loan, StoreError> {
        Ok(self.insert_loan_with_status(loan, LoanStatus::Available).await)
    }

    async fn list_by_status(&self, status: LoanStatus) -> Result<Vec<LoanListing>, StoreError> {
        let users = self.users.read().await;
        let loans = self.loans.read().await;

        let mut listings: Vec<LoanListing> = loans
            .iter()
            .filter(|loan| loan.status == status)
            .filter_map(|loan| {
                let lender = users.iter().find(|u| u.id == loan.lender_id)?;
                Some(LoanListing {
                    id: loan.id,
                    amount: loan.amount,
                    interest_rate: loan.interest_rate,
                    duration_months: loan.duration_months,
                    lender: LenderSummary {
                        id: lender.id,
                        name: lender.name.clone(),
                        email: lender.email.clone(),
                        occupation: lender.occupation.clone(),
                        contact_number: lender.contact_number.clone(),
                    },
                    loan_taker_id: loan.loan_taker_id,
                    status: loan.status,
                    created_at: loan.created_at,
                })
            })
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(listings)
    }
}
