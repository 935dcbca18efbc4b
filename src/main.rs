mod api;
mod config;
mod core;
mod decoder_client;
mod defects;
mod errors;
mod handlers;
mod integrations;
mod models;
mod patterns;
mod policy;
mod pricing;
mod resolver;
mod valuation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::decoder_client::VinDecodeClient;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading (pricing policy included).
/// - The external VIN decode client.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autovalue_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize the decode service client.
    // The engine stays usable without it: the resolver falls back to
    // manual overrides and the internal pattern table.
    let decode_client = match VinDecodeClient::new(
        config.decode_base_url.clone(),
        Duration::from_secs(config.decode_timeout_secs),
    ) {
        Ok(client) => {
            tracing::info!("✓ Decode client initialized: {}", config.decode_base_url);
            Some(client)
        }
        Err(e) => {
            tracing::error!("Failed to initialize decode client: {}", e);
            None
        }
    };

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        decode_client,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/valuations", post(handlers::create_valuation))
        .route("/api/v1/identity/resolve", get(handlers::resolve_identity))
        .route("/api/v1/defects", get(handlers::lookup_defects))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (valuation bodies are tiny)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
