//! Data models for the lending backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub mod auth;
pub use auth::*;

/// Account roles
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Lender,
    Borrower,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lender => "lender",
            Role::Borrower => "borrower",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored user account. Never serialized directly; see [`UserProfile`].
#[derive(Debug, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub occupation: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
}

/// User record ready for insertion, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub occupation: String,
    pub contact_number: String,
}

/// Public profile returned on login
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub occupation: String,
    pub contact_number: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            occupation: user.occupation,
            contact_number: user.contact_number,
        }
    }
}

/// Loan status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq, Default)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Available,
    Requested,
    Approved,
    Rejected,
}

/// Loan offer as stored
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,
    pub amount: f64,
    pub interest_rate: f64,
    pub duration_months: i32,
    pub lender_id: Uuid,
    pub loan_taker_id: Option<Uuid>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

/// Loan record ready for insertion
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub amount: f64,
    pub interest_rate: f64,
    pub duration_months: i32,
    pub lender_id: Uuid,
}

/// Lender fields exposed in loan listings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LenderSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub occupation: String,
    pub contact_number: String,
}

/// Loan offer with its lender resolved
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoanListing {
    pub id: Uuid,
    pub amount: f64,
    pub interest_rate: f64,
    pub duration_months: i32,
    #[serde(rename = "lenderId")]
    pub lender: LenderSummary,
    pub loan_taker_id: Option<Uuid>,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

/// Create loan offer request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    #[validate(custom = "validate_positive")]
    pub amount: f64,
    #[validate(range(min = 0.0))]
    pub interest_rate: f64,
    #[validate(range(min = 1))]
    pub duration_months: i32,
}

/// Response for a created loan offer
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLoanResponse {
    pub message: String,
    pub loan: Loan,
}

/// Plain `{message}` body
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn validate_positive(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("must be greater than zero"))
    }
}
