use axum::{
    Form,
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, models::CurrentUser, render};

#[derive(Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub symbol: String,
}

pub async fn get_quote(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let body = state
        .hbs
        .render("pages/quote", &json!({}))
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render::render_full(&state, "Quote", body, Some(&u)) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

pub async fn post_quote(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Form(form): Form<QuoteForm>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let symbol = form.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return render::apology(&state, StatusCode::BAD_REQUEST, "You must provide a symbol.", Some(&u));
    }

    let Some(quote) = state.quotes.lookup(&symbol).await else {
        return render::apology(&state, StatusCode::BAD_REQUEST, "Invalid symbol.", Some(&u));
    };

    let body = state
        .hbs
        .render(
            "pages/quoted",
            &json!({
                "symbol": quote.symbol,
                "name": quote.name,
                "price": quote.price,
            }),
        )
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render::render_full(&state, "Quoted", body, Some(&u)) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}
