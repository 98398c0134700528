use axum::{
    Form,
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    models::CurrentUser,
    render,
    services::auth_service::{self, AuthError},
};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,

    #[serde(default)]
    pub confirmation: String,
}

fn render_login(state: &AppState, status: StatusCode, ctx: serde_json::Value) -> Response {
    let body = state
        .hbs
        .render("pages/login", &ctx)
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render::render_full(state, "Log In", body, None) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

fn render_register(state: &AppState, status: StatusCode, ctx: serde_json::Value) -> Response {
    let body = state
        .hbs
        .render("pages/register", &ctx)
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render::render_full(state, "Register", body, None) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

// ---------------- LOGIN ----------------

pub async fn get_login(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    render_login(
        &state,
        StatusCode::OK,
        json!({ "values": { "username": "" }, "errors": {} }),
    )
}

pub async fn post_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let username = form.username.trim().to_string();
    let password = form.password;

    let user = match auth_service::login_user(&state.pool, &username, &password).await {
        Ok(u) => u,
        Err(err) => {
            let status = match err {
                AuthError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::FORBIDDEN,
            };
            return render_login(
                &state,
                status,
                json!({
                    "values": { "username": username },
                    "errors": { "_form": err.to_string() }
                }),
            );
        }
    };

    let token = match auth_service::make_jwt(&state.settings, user.id, state.settings.jwt_ttl_days)
    {
        Ok(t) => t,
        Err(e) => {
            return render::apology(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("session error: {e}"),
                None,
            );
        }
    };

    let jar = jar.add(auth_service::auth_cookie(&state.settings, token));
    (jar, Redirect::to("/")).into_response()
}

// ---------------- REGISTER ----------------

pub async fn get_register(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }

    render_register(
        &state,
        StatusCode::OK,
        json!({ "values": { "username": "" }, "errors": {} }),
    )
}

pub async fn post_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let username = form.username.trim().to_string();

    let new_id = match auth_service::register_user(
        &state.pool,
        state.settings.starting_cash,
        &username,
        &form.password,
        &form.confirmation,
    )
    .await
    {
        Ok(id) => id,
        Err(err) => {
            let status = match err {
                AuthError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            };
            return render_register(
                &state,
                status,
                json!({
                    "values": { "username": username },
                    "errors": { "_form": err.to_string() }
                }),
            );
        }
    };

    // Registration logs the new user straight in.
    let token = match auth_service::make_jwt(&state.settings, new_id, state.settings.jwt_ttl_days)
    {
        Ok(t) => t,
        Err(e) => {
            return render::apology(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("session error: {e}"),
                None,
            );
        }
    };

    let jar = jar.add(auth_service::auth_cookie(&state.settings, token));
    (jar, Redirect::to("/")).into_response()
}

// ---------------- LOGOUT ----------------

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(auth_service::clear_auth_cookie(&state.settings));
    (jar, Redirect::to("/login")).into_response()
}
