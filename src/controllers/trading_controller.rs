use axum::{
    Form,
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    models::CurrentUser,
    render,
    services::ledger_service::{self, LedgerError},
};

#[derive(Deserialize)]
pub struct TradeForm {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub shares: String,
}

#[derive(Deserialize)]
pub struct DepositForm {
    #[serde(default)]
    pub deposit_amount: String,
}

fn ledger_apology(state: &AppState, err: LedgerError, user: &CurrentUser) -> Response {
    let status = match err {
        LedgerError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    render::apology(state, status, &err.to_string(), Some(user))
}

fn render_page(state: &AppState, title: &str, tpl: &str, ctx: serde_json::Value, user: &CurrentUser) -> Response {
    let body = state
        .hbs
        .render(tpl, &ctx)
        .unwrap_or_else(|e| format!("template error: {e}"));

    match render::render_full(state, title, body, Some(user)) {
        Ok(page) => (StatusCode::OK, Html(page)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Html(e)).into_response(),
    }
}

/// Form input for shares must be a whole positive integer. "1.5" or "abc"
/// never reaches the ledger.
fn parse_shares(raw: &str) -> Option<i64> {
    let n: i64 = raw.trim().parse().ok()?;
    if n <= 0 { None } else { Some(n) }
}

// ---------------- BUY ----------------

pub async fn get_buy(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    render_page(&state, "Buy", "pages/buy", json!({}), &u)
}

pub async fn post_buy(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Form(form): Form<TradeForm>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let symbol = form.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return render::apology(&state, StatusCode::BAD_REQUEST, "You must provide a symbol.", Some(&u));
    }

    let Some(shares) = parse_shares(&form.shares) else {
        return render::apology(
            &state,
            StatusCode::BAD_REQUEST,
            "Shares must be a positive whole number.",
            Some(&u),
        );
    };

    // Resolve the price before touching the ledger; the quote call can block
    // on the network and must not sit inside a DB transaction.
    let Some(quote) = state.quotes.lookup(&symbol).await else {
        return render::apology(&state, StatusCode::BAD_REQUEST, "Invalid symbol.", Some(&u));
    };

    match ledger_service::buy(&state.pool, u.id, &quote.symbol, shares, quote.price).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => ledger_apology(&state, err, &u),
    }
}

// ---------------- SELL ----------------

pub async fn get_sell(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let symbols = match ledger_service::sellable_symbols(&state.pool, u.id).await {
        Ok(s) => s,
        Err(e) => {
            return render::apology(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
                Some(&u),
            );
        }
    };

    render_page(&state, "Sell", "pages/sell", json!({ "symbols": symbols }), &u)
}

pub async fn post_sell(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Form(form): Form<TradeForm>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let symbol = form.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return render::apology(&state, StatusCode::BAD_REQUEST, "You must provide a symbol.", Some(&u));
    }

    let Some(shares) = parse_shares(&form.shares) else {
        return render::apology(
            &state,
            StatusCode::BAD_REQUEST,
            "Shares must be a positive whole number.",
            Some(&u),
        );
    };

    let Some(quote) = state.quotes.lookup(&symbol).await else {
        return render::apology(&state, StatusCode::BAD_REQUEST, "Invalid symbol.", Some(&u));
    };

    match ledger_service::sell(&state.pool, u.id, &quote.symbol, shares, quote.price).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(err) => ledger_apology(&state, err, &u),
    }
}

// ---------------- DEPOSIT ----------------

pub async fn get_deposit(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    render_page(&state, "Deposit", "pages/deposit", json!({}), &u)
}

pub async fn post_deposit(
    State(state): State<AppState>,
    user: Option<Extension<CurrentUser>>,
    Form(form): Form<DepositForm>,
) -> Response {
    let Some(Extension(u)) = user else {
        return Redirect::to("/login").into_response();
    };

    let amount: f64 = match form.deposit_amount.trim().parse() {
        Ok(a) => a,
        Err(_) => {
            return render::apology(&state, StatusCode::BAD_REQUEST, "Enter a valid amount.", Some(&u));
        }
    };

    match ledger_service::deposit(&state.pool, u.id, amount).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => ledger_apology(&state, err, &u),
    }
}
