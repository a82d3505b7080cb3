//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use campus_common::{AppConfig, AppError, JwtService};
use campus_db::{
    create_pool, run_migrations, PgChatroomRepository, PgMessageRepository, PgUserRepository,
};
use campus_gateway::spawn_hub;
use campus_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the application with the full production middleware stack
///
/// Health routes are merged after the rate limiter so probes are never
/// throttled.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let router = create_router(&config.storage);
    let router = apply_middleware_with_config(
        router,
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    router.merge(health_routes()).with_state(state)
}

/// Build the application with only request-id, tracing and timeout layers
pub fn create_basic_app(state: AppState) -> Router {
    let router = create_router(&state.config().storage).merge(health_routes());
    apply_middleware(router).with_state(state)
}

/// Initialize all dependencies and create AppState
///
/// Connects to PostgreSQL, applies migrations when enabled and starts the
/// room hub on the current runtime.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = campus_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    // Create repositories
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let chatroom_repo = Arc::new(PgChatroomRepository::new(pool.clone()));
    let message_repo = Arc::new(PgMessageRepository::new(pool.clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .user_repo(user_repo)
        .chatroom_repo(chatroom_repo)
        .message_repo(message_repo)
        .jwt_service(jwt_service)
        .chat_config(config.chat.clone())
        .storage_config(config.storage.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let hub = spawn_hub(config.chat.hub_intake_capacity);
    info!(
        intake = config.chat.hub_intake_capacity,
        queue = config.chat.queue_capacity,
        "Room hub started"
    );

    Ok(AppState::new(service_context, hub, config))
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    serve(listener, app).await
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {}", e)))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
