//! campusfix server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use campusfix_api::{middleware::AppState, router as api_router};
use campusfix_common::{Config, LocalStorage};
use campusfix_core::{
    CampusService, ComplaintService, ComplaintTypeService, DirectoryService, ProgressService,
    UserService,
};
use campusfix_db::repositories::{
    CampusRepository, ComplaintRepository, ComplaintTypeRepository, ProgressUpdateRepository,
    RoleAssignmentRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
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
                .unwrap_or_else(|_| "campusfix=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting campusfix server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = campusfix_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    campusfix_db::migrate(&db).await?;
    info!("Migrations completed");

    // Blob storage for complaint and resolution images
    let storage = Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.base_url.clone(),
    ));

    // Initialize repositories
    let db = Arc::new(db);
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let campus_repo = CampusRepository::new(Arc::clone(&db));
    let complaint_type_repo = ComplaintTypeRepository::new(Arc::clone(&db));
    let role_repo = RoleAssignmentRepository::new(Arc::clone(&db));
    let user_repo = UserRepository::new(Arc::clone(&db));
    let progress_repo = ProgressUpdateRepository::new(Arc::clone(&db));

    // Initialize services
    let complaint_service = ComplaintService::new(
        complaint_repo.clone(),
        campus_repo.clone(),
        complaint_type_repo.clone(),
        role_repo.clone(),
        user_repo.clone(),
        storage,
    );
    let directory_service = DirectoryService::new(
        role_repo.clone(),
        user_repo.clone(),
        campus_repo.clone(),
        complaint_type_repo.clone(),
        complaint_repo.clone(),
    );
    let progress_service = ProgressService::new(progress_repo, complaint_repo, role_repo.clone());
    let user_service = UserService::new(user_repo.clone(), role_repo.clone());
    let campus_service = CampusService::new(campus_repo, role_repo.clone());
    let complaint_type_service = ComplaintTypeService::new(complaint_type_repo, role_repo);

    // Create app state
    let state = AppState {
        complaint_service,
        directory_service,
        progress_service,
        user_service,
        campus_service,
        complaint_type_service,
    };

    // Uploads are capped per file; the body limit leaves room for the
    // multipart framing and the other form fields.
    let body_limit = config.storage.max_upload_bytes.saturating_add(64 * 1024);

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            campusfix_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
