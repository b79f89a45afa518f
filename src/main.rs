//! FinBoard Backend Server
//!
//! Multi-step onboarding API: registration, dual-token authentication, and
//! the six financial-profile form endpoints.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Json, Router};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use finboard_server::app_state::AppState;
use finboard_server::auth::{AuthService, TokenCodec};
use finboard_server::config::Config;
use finboard_server::middleware;
use finboard_server::notify::{EmailNotifier, HttpEmailNotifier, NoopNotifier};
use finboard_server::routes;
use finboard_server::store::{CredentialStore, MemoryStore, PgStore, ProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = %config.environment.as_str(), "Starting FinBoard server");

    // Wire up the stores
    let (credential_store, profile_store): (Arc<dyn CredentialStore>, Arc<dyn ProfileStore>) =
        match &config.database_url {
            Some(url) => {
                tracing::info!(
                    database = %config.database_url_masked().unwrap_or_default(),
                    "Connecting to database..."
                );
                let pool = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .connect(url)
                    .await?;
                tracing::info!("Database connected successfully");

                let store = Arc::new(PgStore::new(pool));
                (store.clone() as Arc<dyn CredentialStore>, store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using the in-memory store");
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn CredentialStore>, store)
            }
        };

    // Wire up the mail collaborator
    let notifier: Arc<dyn EmailNotifier> = match config.mail.clone() {
        Some(mail) => Arc::new(HttpEmailNotifier::new(mail)),
        None => {
            tracing::warn!("MAIL_API_URL/MAIL_API_KEY not set, welcome mail disabled");
            Arc::new(NoopNotifier)
        }
    };

    let auth_service = Arc::new(AuthService::new(
        credential_store,
        TokenCodec::new(config.token.clone()),
        notifier,
    ));

    let app_state = AppState::new(auth_service, profile_store);

    let rate_limiter = middleware::RateLimiter::new(config.rate_limit_rps);

    // Create the app router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::auth_routes())
        .merge(routes::profile_routes())
        .with_state(app_state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(axum::middleware::from_fn_with_state(
            rate_limiter,
            middleware::rate_limit,
        ))
        .layer(configure_cors(&config));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn root() -> &'static str {
    "FinBoard API Server"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    store: String,
    version: String,
}

/// Health check endpoint
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<HealthResponse> {
    let store_status = match state.auth_service.ping_store().await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if store_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        store: store_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn configure_cors(config: &Config) -> CorsLayer {
    let Some(allowed_origins) = config.cors_allowed_origins.as_deref() else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
