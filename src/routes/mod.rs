use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::services::ServeDir;

use crate::{AppState, controllers::portfolio_controller};

pub mod auth_routes;
pub mod portfolio_routes;
pub mod quote_routes;
pub mod trading_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = auth_routes::add_routes(router);
    let router = portfolio_routes::add_routes(router);
    let router = trading_routes::add_routes(router);
    let router = quote_routes::add_routes(router);

    router
        .nest_service("/static", ServeDir::new("static"))
        .fallback(portfolio_controller::not_found)
        .layer(from_fn_with_state(state.clone(), crate::auth::require_auth))
        .layer(from_fn_with_state(state.clone(), crate::auth::inject_current_user))
        .with_state(state)
}
