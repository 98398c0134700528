use papertrade::services::auth_service::{self, AuthError};
use papertrade::services::db_init;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("sqlite pool");

    db_init::ensure_schema(&pool).await.expect("schema");
    pool
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let pool = test_pool().await;

    let id = auth_service::register_user(&pool, 10_000.0, "alice", "secret", "secret")
        .await
        .expect("register");

    let user = auth_service::login_user(&pool, "alice", "secret")
        .await
        .expect("login");

    assert_eq!(user.id, id);
    assert_eq!(user.username, "alice");
    assert_eq!(user.cash, 10_000.0);
}

#[tokio::test]
async fn duplicate_username_only_registers_once() {
    let pool = test_pool().await;

    auth_service::register_user(&pool, 10_000.0, "alice", "secret", "secret")
        .await
        .expect("first registration");

    let err = auth_service::register_user(&pool, 10_000.0, "alice", "other", "other")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = 'alice'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let pool = test_pool().await;

    let err = auth_service::register_user(&pool, 10_000.0, "", "secret", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingField(_)));

    let err = auth_service::register_user(&pool, 10_000.0, "alice", "", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingField(_)));

    let err = auth_service::register_user(&pool, 10_000.0, "alice", "secret", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingField(_)));
}

#[tokio::test]
async fn register_rejects_password_mismatch() {
    let pool = test_pool().await;

    let err = auth_service::register_user(&pool, 10_000.0, "alice", "secret", "different")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::PasswordMismatch));
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let pool = test_pool().await;

    auth_service::register_user(&pool, 10_000.0, "alice", "secret", "secret")
        .await
        .unwrap();

    let err = auth_service::login_user(&pool, "alice", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn unknown_username_is_invalid_credentials() {
    let pool = test_pool().await;

    let err = auth_service::login_user(&pool, "nobody", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}
