//! Authentication service
//!
//! Registers accounts, verifies credentials and issues HS256 bearer tokens
//! carrying the caller's id and role.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::{
    Claims, Identity, LoginRequest, LoginResponse, NewUser, RegisterRequest, Role, User,
};
use crate::store::{StoreError, UserStore};

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("Role {actual} is not permitted, {required} required")]
    Forbidden { required: Role, actual: Role },
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("Token encoding error: {0}")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Token and hashing settings
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub token_ttl: Duration,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Authentication service
pub struct AuthService {
    users: Arc<dyn UserStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    bcrypt_cost: u32,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            users,
            encoding_key: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            validation,
            bcrypt_cost: settings.bcrypt_cost,
            token_ttl: settings.token_ttl,
        }
    }

    /// Register a new account
    ///
    /// # Errors
    /// Returns [`AuthError::UserExists`] if the email is already registered
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AuthError> {
        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let cost = self.bcrypt_cost;
        let password = req.password;
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        let user = self
            .users
            .insert_user(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
                role: req.role,
                occupation: req.occupation,
                contact_number: req.contact_number,
            })
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEmail => AuthError::UserExists,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue a bearer token
    ///
    /// Unknown email and wrong password both yield [`AuthError::InvalidCredentials`].
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = req.password;
        let hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        tracing::debug!(user_id = %user.id, "Login succeeded");

        Ok(LoginResponse {
            token,
            user: user.into(),
        })
    }

    /// Sign a token for `user` expiring after the configured TTL
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::TokenEncoding)
    }

    /// Validate signature and expiry, returning the embedded identity
    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(AuthError::InvalidToken)?;
        Ok(data.claims.into())
    }
}

/// Require `identity` to hold `required`
pub fn authorize_role(identity: &Identity, required: Role) -> Result<(), AuthError> {
    if identity.role == required {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            required,
            actual: identity.role,
        })
    }
}
