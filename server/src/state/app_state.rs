//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::AuthService;
use crate::loan_service::LoanService;
use crate::websocket::ChatRelay;

use axum::extract::FromRef;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub loan_service: Arc<LoanService>,
    pub chat: ChatRelay,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        loan_service: Arc<LoanService>,
        chat: ChatRelay,
    ) -> Self {
        Self {
            auth_service,
            loan_service,
            chat,
        }
    }
}

impl FromRef<AppState> for ChatRelay {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat.clone()
    }
}

impl FromRef<AppState> for Arc<LoanService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.loan_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}
