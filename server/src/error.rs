//! HTTP error mapping
//!
//! Every failure leaves a handler as `{"message": ...}` with a sanitized text.
//! Internal detail is logged and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::AuthError;
use crate::loan_service::LoanError;
use crate::models::MessageResponse;

pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("Only lenders allowed")]
    Forbidden,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UserExists | ApiError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized(reason) => (*reason).to_string(),
            ApiError::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(MessageResponse::new(self.user_message()))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UserExists => ApiError::UserExists,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::MissingToken => ApiError::Unauthorized("No token, authorization denied"),
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Token is not valid"),
            AuthError::Forbidden { .. } => ApiError::Forbidden,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<LoanError> for ApiError {
    fn from(err: LoanError) -> Self {
        match err {
            LoanError::Auth(auth) => auth.into(),
            LoanError::Store(store) => ApiError::Internal(store.to_string()),
        }
    }
}
