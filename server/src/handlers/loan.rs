//! Loan offer handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiResult;
use crate::loan_service::LoanService;
use crate::middleware::{AuthenticatedUser, LenderUser, ValidatedJson};
use crate::models::{CreateLoanRequest, CreateLoanResponse, LoanListing};

/// Publish a loan offer (lenders only)
pub async fn create_loan(
    LenderUser(identity): LenderUser,
    State(loan_service): State<Arc<LoanService>>,
    ValidatedJson(request): ValidatedJson<CreateLoanRequest>,
) -> ApiResult<(StatusCode, Json<CreateLoanResponse>)> {
    let loan = loan_service.create_offer(&identity, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLoanResponse {
            message: "Loan offer created".to_string(),
            loan,
        }),
    ))
}

/// List available loan offers
pub async fn list_loans(
    AuthenticatedUser(identity): AuthenticatedUser,
    State(loan_service): State<Arc<LoanService>>,
) -> ApiResult<Json<Vec<LoanListing>>> {
    let loans = loan_service.list_available(&identity).await?;
    Ok(Json(loans))
}
