use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use user_management_api::api;
use user_management_api::config::Config;
use user_management_api::domain::repositories::UserRepository;
use user_management_api::infrastructure::repositories::{
    InMemoryUserRepository, PostgresUserRepository,
};
use user_management_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.mode.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Connect to the record store
    let users: Arc<dyn UserRepository> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            let repository = PostgresUserRepository::new(pool);
            repository
                .migrate()
                .await
                .expect("Failed to run database migrations");

            tracing::info!("Database connected successfully");
            Arc::new(repository)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    let port = config.port;
    let mode = config.mode;
    let app = api::router(AppState::new(users, config));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);
    tracing::info!("Environment: {}", mode);
    tracing::info!("API documentation: http://localhost:{}/api-docs", port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
