use axum::{Router, routing::get};

use crate::{AppState, controllers::portfolio_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/", get(portfolio_controller::index))
        .route("/history", get(portfolio_controller::history))
}
