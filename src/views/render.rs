use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, models::CurrentUser};

pub fn render_full(
    state: &AppState,
    title: &str,
    body_html: String,
    user: Option<&CurrentUser>,
) -> Result<String, String> {
    let (is_logged_in, user_json) = match user {
        Some(u) => (
            true,
            json!({
                "id": u.id,
                "username": u.username,
            }),
        ),
        None => (false, serde_json::Value::Null),
    };

    let ctx = json!({
        "title": title,
        "body": body_html,
        "is_logged_in": is_logged_in,
        "user": user_json,
    });

    state
        .hbs
        .render("layouts/base", &ctx)
        .map_err(|e| e.to_string())
}

/// Full error page. Every per-request failure funnels through here so the
/// user always gets a message instead of a bare status code.
pub fn apology(
    state: &AppState,
    status: StatusCode,
    message: &str,
    user: Option<&CurrentUser>,
) -> Response {
    let body = state
        .hbs
        .render(
            "pages/apology",
            &json!({ "message": message, "code": status.as_u16() }),
        )
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render_full(state, "Apology", body, user) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}
