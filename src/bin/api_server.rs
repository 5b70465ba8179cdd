// src/bin/api_server.rs

use dashboard_actions::infra::telemetry::init_tracing;
use dashboard_actions::storage::{self, schema};
use dashboard_actions::{transport, Config};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_json);

    // --- Database ---
    info!(max_connections = config.max_connections, "connecting to database");
    let pool = storage::connect(&config).await?;
    schema::ensure_schema(&pool).await?;

    // --- API Server Initialization ---
    let app_state = transport::http::AppState::new(pool.clone());
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
        })
        .await?;

    pool.close().await;
    info!("graceful shutdown complete");
    Ok(())
}
