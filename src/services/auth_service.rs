use axum_extra::extract::cookie::{Cookie, SameSite};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::Settings;
use crate::models::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("You must provide a {0}.")]
    MissingField(&'static str),

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Username has already been taken.")]
    UsernameTaken,

    #[error("Invalid username and/or password.")]
    InvalidCredentials,

    #[error("There is a problem registering this user.")]
    Hash,

    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(serde::Serialize)]
struct Claims {
    sub: String,
    exp: usize,
}

pub fn make_jwt(settings: &Settings, user_id: i64, days: i64) -> Result<String, String> {
    let exp = (Utc::now() + Duration::days(days)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn auth_cookie(settings: &Settings, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.jwt_cookie_name.clone(), token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if settings.cookie_secure {
        cookie.set_secure(true);
    }
    cookie
}

pub fn clear_auth_cookie(settings: &Settings) -> Cookie<'static> {
    // Expire cookie
    let mut cookie = Cookie::new(settings.jwt_cookie_name.clone(), "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.make_removal();
    cookie
}

pub async fn login_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    if username.is_empty() {
        return Err(AuthError::MissingField("username"));
    }
    if password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, cash FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or(AuthError::InvalidCredentials)?;

    if !verify(password, &user.password_hash).unwrap_or(false) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}

pub async fn register_user(
    pool: &SqlitePool,
    starting_cash: f64,
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<i64, AuthError> {
    if username.is_empty() {
        return Err(AuthError::MissingField("username"));
    }
    if password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    if confirmation.is_empty() {
        return Err(AuthError::MissingField("password confirmation"));
    }
    if password != confirmation {
        return Err(AuthError::PasswordMismatch);
    }

    let password_hash = hash(password, DEFAULT_COST).map_err(|_| AuthError::Hash)?;

    // The UNIQUE constraint makes the check-and-insert atomic; two racing
    // registrations of the same name cannot both succeed.
    let inserted = sqlx::query("INSERT INTO users (username, password_hash, cash) VALUES (?, ?, ?)")
        .bind(username)
        .bind(&password_hash)
        .bind(starting_cash)
        .execute(pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map(|d| d.is_unique_violation())
                .unwrap_or(false)
            {
                AuthError::UsernameTaken
            } else {
                AuthError::Db(e)
            }
        })?;

    Ok(inserted.last_insert_rowid())
}
