#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::{json, Value};
use tower::ServiceExt;

use lending_server::auth::{AuthService, AuthSettings};
use lending_server::loan_service::LoanService;
use lending_server::routes;
use lending_server::state::AppState;
use lending_server::store::MemoryStore;
use lending_server::websocket::ChatRelay;

pub const TEST_SECRET: &str = "integration-secret";
pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let settings = AuthSettings {
        jwt_secret: TEST_SECRET.to_string(),
        bcrypt_cost: 4,
        token_ttl: Duration::days(1),
    };
    let auth_service = Arc::new(AuthService::new(store.clone(), &settings));
    let loan_service = Arc::new(LoanService::new(store.clone()));
    let state = AppState::new(auth_service, loan_service, ChatRelay::new());
    let router = routes::app(state.clone(), HeaderValue::from_static(FRONTEND_ORIGIN));

    TestApp {
        router,
        state,
        store,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, value)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> StatusCode {
        let (status, _) = self
            .request(
                Method::POST,
                "/api/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": password,
                    "role": role,
                    "occupation": "Engineer",
                    "contactNumber": "555-0199"
                })),
            )
            .await;
        status
    }

    /// Register then log in, returning the bearer token
    pub async fn login_as(&self, name: &str, email: &str, role: &str) -> String {
        assert_eq!(
            self.register(name, email, "pa55word", role).await,
            StatusCode::CREATED
        );
        let (status, body) = self
            .request(
                Method::POST,
                "/api/login",
                None,
                Some(json!({ "email": email, "password": "pa55word" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}
