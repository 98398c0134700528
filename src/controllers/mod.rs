pub mod auth_controller;
pub mod portfolio_controller;
pub mod quote_controller;
pub mod trading_controller;
