use std::sync::Arc;

use axum::{
    Router,
    http::{Request, StatusCode, header},
    routing::{get, post},
};
use http_body_util::BodyExt;
use papertrade::services::quotes::StaticQuotes;
use papertrade::services::{auth_service, db_init};
use papertrade::{AppState, config::Settings, controllers::auth_controller, routes, templates};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_cookie_name: "session".to_string(),
        jwt_ttl_days: 1,
        cookie_secure: false,
        finnhub_api_key: String::new(),
        starting_cash: 10_000.0,
    }
}

async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("sqlite pool");

    db_init::ensure_schema(&pool).await.expect("schema");

    AppState {
        hbs: templates::build_handlebars(),
        pool,
        settings: test_settings(),
        quotes: Arc::new(StaticQuotes::default()),
    }
}

async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

fn form_request(uri: &str, body: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn get_login_renders_form() {
    let state = test_state().await;
    let app = Router::new()
        .route("/login", get(auth_controller::get_login))
        .with_state(state);

    let req = Request::builder()
        .uri("/login")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_body_string(res).await;
    assert!(body.contains("name=\"username\""));
    assert!(body.contains("name=\"password\""));
}

#[tokio::test]
async fn post_login_wrong_password_returns_403() {
    let state = test_state().await;
    auth_service::register_user(&state.pool, 10_000.0, "alice", "secret", "secret")
        .await
        .unwrap();

    let app = Router::new()
        .route("/login", post(auth_controller::post_login))
        .with_state(state);

    let res = app
        .oneshot(form_request("/login", "username=alice&password=wrong"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    // No session cookie on a failed login.
    assert!(res.headers().get(header::SET_COOKIE).is_none());

    let body = response_body_string(res).await;
    assert!(body.contains("Invalid username and/or password"));
}

#[tokio::test]
async fn post_login_missing_password_returns_403() {
    let state = test_state().await;

    let app = Router::new()
        .route("/login", post(auth_controller::post_login))
        .with_state(state);

    let res = app
        .oneshot(form_request("/login", "username=alice&password="))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = response_body_string(res).await;
    assert!(body.contains("You must provide a password"));
}

#[tokio::test]
async fn post_login_success_sets_cookie_and_redirects() {
    let state = test_state().await;
    auth_service::register_user(&state.pool, 10_000.0, "alice", "secret", "secret")
        .await
        .unwrap();

    let app = Router::new()
        .route("/login", post(auth_controller::post_login))
        .with_state(state);

    let res = app
        .oneshot(form_request("/login", "username=alice&password=secret"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/");

    let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn post_register_password_mismatch_renders_error() {
    let state = test_state().await;

    let app = Router::new()
        .route("/register", post(auth_controller::post_register))
        .with_state(state);

    let res = app
        .oneshot(form_request(
            "/register",
            "username=alice&password=secret&confirmation=other",
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("Passwords do not match"));
}

#[tokio::test]
async fn post_register_duplicate_username_renders_error() {
    let state = test_state().await;
    auth_service::register_user(&state.pool, 10_000.0, "alice", "secret", "secret")
        .await
        .unwrap();

    let app = Router::new()
        .route("/register", post(auth_controller::post_register))
        .with_state(state);

    let res = app
        .oneshot(form_request(
            "/register",
            "username=alice&password=secret&confirmation=secret",
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("already been taken"));
}

#[tokio::test]
async fn post_register_success_logs_in_and_redirects() {
    let state = test_state().await;

    let app = Router::new()
        .route("/register", post(auth_controller::post_register))
        .with_state(state);

    let res = app
        .oneshot(form_request(
            "/register",
            "username=bob&password=secret&confirmation=secret",
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/");
    assert!(res.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn protected_portfolio_redirects_anonymous_visitors_to_login() {
    let state = test_state().await;
    let app = routes::app(state);

    let req = Request::builder()
        .uri("/")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn logout_clears_cookie_and_redirects_to_login() {
    let state = test_state().await;
    let app = Router::new()
        .route("/logout", get(auth_controller::logout))
        .with_state(state);

    let req = Request::builder()
        .uri("/logout")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[header::LOCATION], "/login");

    let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session="));
}
