use gigbook_db::AppState;
use gigbook_migration::MigratorTrait;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod api;
mod app;
mod config;
mod error;
mod flash;
mod forms;
mod views;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Database connection
    let db_config = gigbook_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = gigbook_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    gigbook_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let server_config = config::ServerConfig::from_env();
    let state = Arc::new(AppState { db });
    let app = app::router(state);

    let addr = server_config.bind;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!(%addr, "server started");

    axum::serve(listener, app).await.expect("server error");
}
