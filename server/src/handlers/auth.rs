//! Registration and login handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::AuthService;
use crate::error::ApiResult;
use crate::middleware::ValidatedJson;
use crate::models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

/// Register a new account
pub async fn register(
    State(auth_service): State<Arc<AuthService>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    auth_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(auth_service): State<Arc<AuthService>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}
