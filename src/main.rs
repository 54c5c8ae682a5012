//! Fleet Server - truck and trailer fleet maintenance service
//!
//! REST API for fleet registry, maintenance and document status, and
//! daily / weekly inspections with PDF reports.

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("fleet_server={},tower_http=debug", config.logging.level).into());

    // Keep the guard alive so buffered file logs are flushed on exit
    let (file_layer, _log_guard) = match &config.logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "fleet-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let json = config.logging.format.eq_ignore_ascii_case("json");
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .with(file_layer)
        .init();

    tracing::info!("Starting Fleet Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), &config.reports);

    services
        .auth
        .ensure_bootstrap_admin()
        .await
        .context("Failed to create bootstrap admin")?;

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host
            .parse()
            .with_context(|| format!("Invalid host address: {}", server_host))?,
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Staff users
        .route("/users", get(api::users::list_users))
        .route("/users", post(api::users::create_user))
        // Companies
        .route("/companies", get(api::companies::list_companies))
        .route("/companies", post(api::companies::create_company))
        // Drivers
        .route("/drivers", get(api::drivers::list_drivers))
        .route("/drivers", post(api::drivers::create_driver))
        .route("/drivers/:id", get(api::drivers::get_driver))
        .route("/drivers/:id", put(api::drivers::update_driver))
        // Vehicles
        .route("/vehicles", get(api::vehicles::list_vehicles))
        .route("/vehicles", post(api::vehicles::create_vehicle))
        .route("/vehicles/:id", get(api::vehicles::get_vehicle))
        .route("/vehicles/:id", put(api::vehicles::update_vehicle))
        .route("/vehicles/:id/state", put(api::vehicles::update_vehicle_state))
        .route("/vehicles/:id/history", get(api::vehicles::get_vehicle_history))
        .route("/vehicles/:id/summary", get(api::vehicles::get_vehicle_summary))
        .route("/vehicles/:id/status", get(api::vehicles::get_vehicle_status))
        .route("/vehicles/:id/trailer", get(api::vehicles::get_vehicle_trailer))
        // Trailers
        .route("/trailers", get(api::trailers::list_trailers))
        .route("/trailers", post(api::trailers::create_trailer))
        .route("/trailers/:id", get(api::trailers::get_trailer))
        .route("/trailers/:id", put(api::trailers::update_trailer))
        .route("/trailers/:id/summary", get(api::trailers::get_trailer_summary))
        .route("/trailers/:id/status", get(api::trailers::get_trailer_status))
        // Assignments
        .route("/assignments", get(api::assignments::list_assignments))
        .route("/assignments", post(api::assignments::create_assignment))
        .route("/assignments/:id", get(api::assignments::get_assignment))
        .route("/assignments/:id/activate", post(api::assignments::activate_assignment))
        .route("/assignments/:id/deactivate", post(api::assignments::deactivate_assignment))
        // Maintenance
        .route("/maintenance", get(api::maintenance::list_maintenance))
        .route("/maintenance", post(api::maintenance::create_maintenance))
        // Documents
        .route("/documents", get(api::documents::list_documents))
        .route("/documents", post(api::documents::create_document))
        // Status dashboard
        .route("/status/vehicles", get(api::status::fleet_status))
        // Inspections
        .route("/inspections", post(api::inspections::submit_inspection))
        .route("/inspections/:id", get(api::inspections::get_inspection))
        .route("/inspections/autofill/:vehicle_id", get(api::inspections::get_autofill))
        .route(
            "/inspections/categories/:inspection_type",
            get(api::inspections::get_checklist),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
