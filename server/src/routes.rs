//! Route definitions for the lending API

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::*;
use crate::state::AppState;
use crate::websocket;

// Auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

// Loan routes
pub fn loan_routes() -> Router<AppState> {
    Router::new().route("/api/loans", post(create_loan).get(list_loans))
}

// Chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/ws", get(websocket::ws_handler))
}

/// Full application router
pub fn app(state: AppState, cors_origin: HeaderValue) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(loan_routes())
        .merge(chat_routes())
        .with_state(state)
        .layer(configure_cors(cors_origin))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the single configured frontend origin
///
/// Requests from any other origin get no `Access-Control-Allow-Origin` header.
pub fn configure_cors(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
