//! Bearer token extractors

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use crate::auth::{authorize_role, AuthError, AuthService};
use crate::error::ApiError;
use crate::models::{Identity, Role};

/// Caller authenticated by an `Authorization: Bearer` token
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthError::MissingToken)?;

        let auth_service = <Arc<AuthService> as FromRef<S>>::from_ref(state);
        let identity = auth_service.authenticate(bearer.token())?;

        Ok(Self(identity))
    }
}

/// Authenticated caller holding the lender role
#[derive(Debug, Clone, Copy)]
pub struct LenderUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for LenderUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(identity) =
            AuthenticatedUser::from_request_parts(parts, state).await?;
        authorize_role(&identity, Role::Lender)?;
        Ok(Self(identity))
    }
}
