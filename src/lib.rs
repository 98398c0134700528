//! Library entrypoint for papertrade.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, controllers, services).

pub mod config;
pub mod models;

// Keep these modules at crate root because the codebase references them as
// `crate::auth`, `crate::render`, and `crate::templates`.
#[path = "middleware/auth.rs"]
pub mod auth;

pub mod services;

#[path = "views/render.rs"]
pub mod render;
#[path = "views/templates.rs"]
pub mod templates;

pub mod controllers;
pub mod routes;

use std::sync::Arc;

use services::quotes::QuoteSource;

#[derive(Clone)]
pub struct AppState {
    pub hbs: templates::Hbs,
    pub pool: sqlx::SqlitePool,
    pub settings: config::Settings,
    pub quotes: Arc<dyn QuoteSource>,
}
