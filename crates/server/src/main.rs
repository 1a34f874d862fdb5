//! Shule server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use sea_orm::{ConnectOptions, Database};
use shule_api::{middleware::AppState, router as api_router};
use shule_common::Config;
use shule_core::{AdmissionService, EnrollmentService};
use shule_db::repositories::{ApplicationRepository, SchoolRepository, UserRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shule=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting shule server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let mut db_opts = ConnectOptions::new(&config.database.url);
    db_opts
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections);

    let db = Database::connect(db_opts).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    shule_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories and services
    let db = Arc::new(db);
    let application_repo = ApplicationRepository::new(Arc::clone(&db));
    let school_repo = SchoolRepository::new(Arc::clone(&db));
    let user_repo = UserRepository::new(Arc::clone(&db));

    let admission_service = AdmissionService::new(application_repo, school_repo, &config);
    let enrollment_service = EnrollmentService::new(Arc::clone(&db), &config);

    // Create app state
    let state = AppState {
        admission_service,
        enrollment_service,
        user_repo,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            shule_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
