use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::{AppState, models::CurrentUser, render, services::ledger_service};

fn fmt2(v: f64) -> String {
    format!("{:.2}", v)
}

// GET /
pub async fn index(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let holdings = match ledger_service::holdings(&state.pool, u.id).await {
        Ok(h) => h,
        Err(e) => {
            return render::apology(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                Some(&u),
            );
        }
    };

    let cash = match ledger_service::cash(&state.pool, u.id).await {
        Ok(c) => c,
        Err(e) => {
            return render::apology(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                Some(&u),
            );
        }
    };

    let mut rows: Vec<serde_json::Value> = vec![];
    let mut stocks_total = 0.0;

    for h in holdings.iter().filter(|h| h.shares != 0) {
        let price = state
            .quotes
            .lookup(&h.symbol)
            .await
            .map(|q| q.price)
            .unwrap_or(0.0);
        let value = price * (h.shares as f64);
        stocks_total += value;

        rows.push(json!({
            "symbol": h.symbol,
            "shares": h.shares,
            "price": price,
            "value": value,
        }));
    }

    let ctx = json!({
        "rows": if rows.is_empty() { serde_json::Value::Null } else { serde_json::Value::Array(rows) },
        "cash": cash,
        "total": cash + stocks_total,
    });

    let body = state
        .hbs
        .render("pages/portfolio", &ctx)
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render::render_full(&state, "Portfolio", body, Some(&u)) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

pub async fn not_found(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let body = state
        .hbs
        .render("pages/not_found", &json!({}))
        .unwrap_or_else(|e| format!("template error: {e}"));

    let user_ref = user.as_ref().map(|Extension(u)| u);

    match render::render_full(&state, "404", body, user_ref) {
        Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

// GET /history
pub async fn history(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let entries = match ledger_service::history(&state.pool, u.id).await {
        Ok(v) => v,
        Err(e) => {
            return render::apology(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                Some(&u),
            );
        }
    };

    let rows: Vec<serde_json::Value> = entries
        .iter()
        .map(|t| {
            let when = chrono::DateTime::from_timestamp(t.created_at, 0)
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| t.created_at.to_string());

            json!({
                "symbol": t.symbol,
                "shares": t.shares,
                "price": fmt2(t.price),
                "when": when,
                "side": if t.shares > 0 { "buy" } else { "sell" },
            })
        })
        .collect();

    let ctx = json!({
        "rows": if rows.is_empty() { serde_json::Value::Null } else { serde_json::Value::Array(rows) },
    });

    let body = state
        .hbs
        .render("pages/history", &ctx)
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render::render_full(&state, "History", body, Some(&u)) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}
