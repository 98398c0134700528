use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;

use papertrade::services::{db_init, quotes::FinnhubClient};
use papertrade::{AppState, config, routes, templates};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load().expect("configuration");

    let pool = SqlitePoolOptions::new()
        .connect(&settings.database_url)
        .await
        .expect("Failed to open the database");

    db_init::ensure_schema(&pool)
        .await
        .expect("Failed to create schema");

    let quotes = Arc::new(FinnhubClient::new(settings.finnhub_api_key.clone()));

    let state = AppState {
        hbs: templates::build_handlebars(),
        pool,
        settings: settings.clone(),
        quotes,
    };

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().expect("HOST"),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("bind");
    axum::serve(listener, app).await.expect("serve");
}
