// src/bin/api_server.rs

use product_catalog::infra::telemetry::setup_tracing;
use product_catalog::transport;
use product_catalog::{build_store, AppConfig, CatalogService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    // --- Configuration ---
    let config = AppConfig::from_env()?;
    info!(storage = ?config.storage, bind_addr = %config.bind_addr, "configuration loaded");

    // --- Service Initialization ---
    let store = build_store(&config).await?;
    let app_state = transport::http::AppState {
        catalog: Arc::new(CatalogService::new(store)),
    };
    info!("catalog service initialized");

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}
