use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use libris::auth::{PasswordHasher, TokenKeys};
use libris::models::UserResponse;
use libris::{db, routes};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const SECRET: &str = "integration-secret";

async fn test_state() -> (
    web::Data<sqlx::SqlitePool>,
    web::Data<TokenKeys>,
    web::Data<PasswordHasher>,
) {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    (
        web::Data::new(pool),
        web::Data::new(TokenKeys::new(SECRET, Duration::minutes(20))),
        web::Data::new(PasswordHasher::new(PasswordHasher::MIN_COST)),
    )
}

fn registration(username: &str, password: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "first_name": "Integration",
        "last_name": "User",
        "password": password,
        "role": "admin"
    })
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let (pool, keys, hasher) = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(pool)
            .app_data(keys)
            .app_data(hasher)
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::todo_config(false)),
    )
    .await;

    // Register a new user
    let req = test::TestRequest::post()
        .uri("/auth/")
        .set_json(registration("integration_user", "Password123!"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes)
    );

    let user: UserResponse = serde_json::from_slice(&body_bytes).expect("Failed to parse user");
    assert_eq!(user.username, "integration_user");
    assert_eq!(user.email, "integration_user@example.com");
    assert_eq!(user.role, "admin");
    assert!(user.is_active);

    let raw: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert!(raw.get("hashed_password").is_none(), "hash leaked: {}", raw);
    assert!(raw.get("password").is_none(), "password leaked: {}", raw);

    // Registering the same username again is refused
    let req_conflict = test::TestRequest::post()
        .uri("/auth/")
        .set_json(registration("integration_user", "OtherPassword1"))
        .to_request();
    let resp_conflict = test::call_service(&app, req_conflict).await;
    assert_eq!(resp_conflict.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp_conflict).await;
    assert_eq!(body["error"], "Username already registered");

    // Login with the right password
    let req_login = test::TestRequest::post()
        .uri("/auth/token")
        .set_form([("username", "integration_user"), ("password", "Password123!")])
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    assert_eq!(resp_login.status(), StatusCode::OK);
    let token: Value = test::read_body_json(resp_login).await;
    assert_eq!(token["token_type"], "bearer");

    let access_token = token["access_token"].as_str().expect("access_token missing");
    let claims = TokenKeys::new(SECRET, Duration::minutes(20))
        .verify(access_token)
        .expect("issued token must verify");
    assert_eq!(claims.sub, "integration_user");
    assert_eq!(claims.id, user.id);
}

#[actix_rt::test]
async fn test_login_rejects_bad_credentials() {
    let (pool, keys, hasher) = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(pool)
            .app_data(keys)
            .app_data(hasher)
            .configure(routes::todo_config(false)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/")
        .set_json(registration("wrong_password_user", "Password123!"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    for (username, password) in [
        ("wrong_password_user", "not-the-password"),
        ("nobody_here", "Password123!"),
    ] {
        let req = test::TestRequest::post()
            .uri("/auth/token")
            .set_form([("username", username), ("password", password)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "login as {}", username);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Could not validate user.");
    }
}

#[actix_rt::test]
async fn test_login_requires_both_fields() {
    let (pool, keys, hasher) = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(pool)
            .app_data(keys)
            .app_data(hasher)
            .configure(routes::todo_config(false)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_form([("username", "someone")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_register_validation() {
    let (pool, keys, hasher) = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(pool)
            .app_data(keys)
            .app_data(hasher)
            .configure(routes::todo_config(false)),
    )
    .await;

    let invalid_payloads = [
        registration("ab", "Password123!"),
        registration("has spaces", "Password123!"),
        registration("short_password", "12345"),
        json!({
            "username": "bad_email",
            "email": "not-an-email",
            "first_name": "A",
            "last_name": "B",
            "password": "Password123!",
            "role": "user"
        }),
    ];

    for payload in invalid_payloads {
        let req = test::TestRequest::post()
            .uri("/auth/")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "payload should be rejected: {}",
            payload
        );
    }

    // Missing fields are refused the same way
    let req = test::TestRequest::post()
        .uri("/auth/")
        .set_json(json!({ "username": "incomplete" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_health_routes() {
    let (pool, keys, hasher) = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(pool)
            .app_data(keys)
            .app_data(hasher)
            .configure(routes::todo_config(true)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["service"], "todos");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health/db").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}
