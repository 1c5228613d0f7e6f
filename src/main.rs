use northstar::app;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (silently ignore if missing)
    dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug,tower_http=debug", env!("CARGO_PKG_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config from environment
    let config = app::config::Config::from_env()
        .expect("Failed to load config (check DATABASE_URL and other env vars)");

    // Connect to SQLite
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Enable WAL mode and set busy timeout
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .expect("Failed to set WAL mode");

    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await
        .expect("Failed to set busy timeout");

    // Run embedded migrations on startup
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    match app::db::sessions::delete_expired(&pool).await {
        Ok(0) => {}
        Ok(n) => tracing::info!(removed = n, "pruned expired sessions"),
        Err(err) => tracing::warn!(%err, "failed to prune expired sessions"),
    }

    let bind_addr = config.bind_addr.clone();
    let state = app::AppState::new(pool, config);
    let router = northstar::create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {bind_addr}: {e}"));

    tracing::info!("{} listening on http://{}", app::APP_NAME, bind_addr);

    axum::serve(listener, router).await.unwrap();
}
