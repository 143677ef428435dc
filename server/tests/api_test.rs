mod common;

use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{test_app, FRONTEND_ORIGIN, TEST_SECRET};
use lending_server::models::{Claims, LoanStatus, NewLoan, Role};

#[tokio::test]
async fn health_routes_respond() {
    let app = test_app();

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn register_succeeds_once_per_email() {
    let app = test_app();

    assert_eq!(
        app.register("Lena", "l@x.com", "secret", "lender").await,
        StatusCode::CREATED
    );

    let (status, body) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "name": "Other",
                "email": "l@x.com",
                "password": "different",
                "role": "borrower",
                "occupation": "Chef",
                "contactNumber": "555-0000"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));
}

#[tokio::test]
async fn register_response_echoes_nothing_sensitive() {
    let app = test_app();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({
                "name": "Bo",
                "email": "b@x.com",
                "password": "topsecret",
                "role": "borrower",
                "occupation": "Student",
                "contactNumber": "555-0001"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "User registered successfully" }));
}

#[tokio::test]
async fn register_rejects_invalid_bodies() {
    let app = test_app();

    let bad_role = json!({
        "name": "X", "email": "x@x.com", "password": "p", "role": "admin",
        "occupation": "", "contactNumber": ""
    });
    let bad_email = json!({
        "name": "X", "email": "not-an-email", "password": "p", "role": "lender",
        "occupation": "", "contactNumber": ""
    });
    let missing_field = json!({ "email": "x@x.com", "password": "p" });

    for body in [bad_role, bad_email, missing_field] {
        let (status, response) = app
            .request(Method::POST, "/api/register", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["message"].is_string());
    }
}

#[tokio::test]
async fn login_returns_token_and_public_profile() {
    let app = test_app();
    app.register("Lena", "l@x.com", "secret", "lender").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "l@x.com", "password": "secret" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    let user = &body["user"];
    assert!(user["id"].is_string());
    assert_eq!(user["name"], "Lena");
    assert_eq!(user["email"], "l@x.com");
    assert_eq!(user["role"], "lender");
    assert_eq!(user["occupation"], "Engineer");
    assert_eq!(user["contactNumber"], "555-0199");
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let identity = app.state.auth_service.authenticate(token).unwrap();
    assert_eq!(identity.user_id.to_string(), user["id"].as_str().unwrap());
    assert_eq!(identity.role, Role::Lender);
}

#[tokio::test]
async fn bad_credentials_share_one_response() {
    let app = test_app();
    app.register("Lena", "l@x.com", "secret", "lender").await;

    let wrong_password = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "l@x.com", "password": "guess" })),
        )
        .await;
    let unknown_email = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "nobody@x.com", "password": "secret" })),
        )
        .await;

    assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1, json!({ "message": "Invalid credentials" }));
}

#[tokio::test]
async fn loans_require_a_valid_token() {
    let app = test_app();

    let (status, body) = app.request(Method::GET, "/api/loans", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = app
        .request(Method::GET, "/api/loans", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let now = Utc::now();
    let expired = encode(
        &Header::default(),
        &Claims {
            user_id: Uuid::new_v4(),
            role: Role::Lender,
            iat: (now - Duration::days(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();
    let (status, _) = app
        .request(Method::GET, "/api/loans", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = encode(
        &Header::default(),
        &Claims {
            user_id: Uuid::new_v4(),
            role: Role::Lender,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        },
        &EncodingKey::from_secret(b"someone-elses-secret"),
    )
    .unwrap();
    let (status, _) = app
        .request(
            Method::POST,
            "/api/loans",
            Some(&forged),
            Some(json!({ "amount": 10, "interestRate": 1, "durationMonths": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.loan_count().await, 0);
}

#[tokio::test]
async fn borrower_cannot_create_loan() {
    let app = test_app();
    let token = app.login_as("Bo", "b@x.com", "borrower").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/loans",
            Some(&token),
            Some(json!({ "amount": 1000, "interestRate": 5, "durationMonths": 12 })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Only lenders allowed" }));
    assert_eq!(app.store.loan_count().await, 0);
}

#[tokio::test]
async fn lender_creates_available_loan() {
    let app = test_app();
    let token = app.login_as("Lena", "l@x.com", "lender").await;
    let lender_id = app.state.auth_service.authenticate(&token).unwrap().user_id;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/loans",
            Some(&token),
            Some(json!({ "amount": 2500.5, "interestRate": 7.25, "durationMonths": 6 })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Loan offer created");
    let loan = &body["loan"];
    assert_eq!(loan["amount"], 2500.5);
    assert_eq!(loan["interestRate"], 7.25);
    assert_eq!(loan["durationMonths"], 6);
    assert_eq!(loan["status"], "available");
    assert_eq!(loan["lenderId"], lender_id.to_string());
    assert!(loan["loanTakerId"].is_null());
    assert!(loan["createdAt"].is_string());
    assert_eq!(app.store.loan_count().await, 1);
}

#[tokio::test]
async fn invalid_loan_body_is_rejected() {
    let app = test_app();
    let token = app.login_as("Lena", "l@x.com", "lender").await;

    for body in [
        json!({ "amount": -5, "interestRate": 5, "durationMonths": 12 }),
        json!({ "amount": 100, "interestRate": 5, "durationMonths": 0 }),
        json!({ "amount": "lots", "interestRate": 5, "durationMonths": 12 }),
        json!({ "interestRate": 5 }),
    ] {
        let (status, response) = app
            .request(Method::POST, "/api/loans", Some(&token), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["message"].is_string());
    }
    assert_eq!(app.store.loan_count().await, 0);
}

#[tokio::test]
async fn listing_shows_only_available_loans_with_lender_projection() {
    let app = test_app();
    let lender_token = app.login_as("Lena", "l@x.com", "lender").await;
    let borrower_token = app.login_as("Bo", "b@x.com", "borrower").await;
    let lender_id = app
        .state
        .auth_service
        .authenticate(&lender_token)
        .unwrap()
        .user_id;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/loans",
            Some(&lender_token),
            Some(json!({ "amount": 1000, "interestRate": 5, "durationMonths": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    app.store
        .insert_loan_with_status(
            NewLoan {
                amount: 99.0,
                interest_rate: 3.0,
                duration_months: 2,
                lender_id,
            },
            LoanStatus::Approved,
        )
        .await;

    let (status, body) = app
        .request(Method::GET, "/api/loans", Some(&borrower_token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let loans = body.as_array().unwrap();
    assert_eq!(loans.len(), 1);
    let loan = &loans[0];
    assert_eq!(loan["amount"], 1000.0);
    assert_eq!(loan["status"], "available");

    let lender = &loan["lenderId"];
    assert_eq!(lender["name"], "Lena");
    assert_eq!(lender["email"], "l@x.com");
    assert_eq!(lender["occupation"], "Engineer");
    assert_eq!(lender["contactNumber"], "555-0199");
    assert!(lender.get("password").is_none());
    assert!(lender.get("passwordHash").is_none());
    assert!(lender.get("role").is_none());
}

#[tokio::test]
async fn end_to_end_lender_offer_is_listed() {
    let app = test_app();
    let token = app.login_as("L", "l@x.com", "lender").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/loans",
            Some(&token),
            Some(json!({ "amount": 1000, "interestRate": 5, "durationMonths": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(Method::GET, "/api/loans", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let loans = body.as_array().unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0]["amount"], 1000.0);
    assert_eq!(loans[0]["lenderId"]["name"], "L");
}

#[tokio::test]
async fn cors_allows_configured_origin_only() {
    let app = test_app();

    let preflight = |origin: &'static str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/loans")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(axum::body::Body::empty())
            .unwrap()
    };

    let response = app
        .router
        .clone()
        .oneshot(preflight(FRONTEND_ORIGIN))
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        FRONTEND_ORIGIN
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );

    let response = app
        .router
        .clone()
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
