//! Postgres store backed by sqlx

use async_trait::async_trait;
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{LoanStore, StoreError, UserStore};
use crate::models::{LenderSummary, Loan, LoanListing, LoanStatus, NewLoan, NewUser, User};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LoanListingRow {
    id: Uuid,
    amount: f64,
    interest_rate: f64,
    duration_months: i32,
    loan_taker_id: Option<Uuid>,
    status: LoanStatus,
    created_at: DateTime<Utc>,
    lender_id: Uuid,
    lender_name: String,
    lender_email: String,
    lender_occupation: String,
    lender_contact_number: String,
}

impl From<LoanListingRow> for LoanListing {
    fn from(row: LoanListingRow) -> Self {
        Self {
            id: row.id,
            amount: row.amount,
            interest_rate: row.interest_rate,
            duration_months: row.duration_months,
            lender: LenderSummary {
                id: row.lender_id,
                name: row.lender_name,
                email: row.lender_email,
                occupation: row.lender_occupation,
                contact_number: row.lender_contact_number,
            },
            loan_taker_id: row.loan_taker_id,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        // The unique index on email decides races between concurrent registrations
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, occupation, contact_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, role, occupation, contact_number, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.occupation)
        .bind(&user.contact_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            other => StoreError::Database(other),
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, occupation, contact_number, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl LoanStore for PgStore {
    async fn insert_loan(&self, loan: NewLoan) -> Result<Loan, StoreError> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (id, amount, interest_rate, duration_months, lender_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, amount, interest_rate, duration_months, lender_id,
                      loan_taker_id, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(loan.amount)
        .bind(loan.interest_rate)
        .bind(loan.duration_months)
        .bind(loan.lender_id)
        .bind(LoanStatus::Available)
        .fetch_one(&self.pool)
        .await?;

        Ok(loan)
    }

    async fn list_by_status(&self, status: LoanStatus) -> Result<Vec<LoanListing>, StoreError> {
        let rows = sqlx::query_as::<_, LoanListingRow>(
            r#"
            SELECT l.id, l.amount, l.interest_rate, l.duration_months, l.loan_taker_id,
                   l.status, l.created_at,
                   u.id AS lender_id, u.name AS lender_name, u.email AS lender_email,
                   u.occupation AS lender_occupation,
                   u.contact_number AS lender_contact_number
            FROM loans l
            JOIN users u ON u.id = l.lender_id
            WHERE l.status = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LoanListing::from).collect())
    }
}
