use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, controllers::trading_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/buy", get(trading_controller::get_buy))
        .route("/buy", post(trading_controller::post_buy))
        .route("/sell", get(trading_controller::get_sell))
        .route("/sell", post(trading_controller::post_sell))
        .route("/deposit", get(trading_controller::get_deposit))
        .route("/deposit", post(trading_controller::post_deposit))
}
