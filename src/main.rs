//src/main.rs

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod docs;
mod handlers;
mod models;
mod services;
mod upstream;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;

const DEFAULT_LOG_FILTER: &str = "bi_dashboard=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG tem prioridade sobre o filtro padrão
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config)?;

    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Swagger em http://{}/swagger-ui", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(app_state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/sales", get(handlers::dashboard::get_sales_series))
        .route("/regional", get(handlers::dashboard::get_regional_series))
        .route("/inventory", get(handlers::dashboard::get_inventory_distribution))
        .route("/overview", get(handlers::dashboard::get_overview))
        .route("/export", get(handlers::dashboard::get_export_sheet))
        .route("/status", get(handlers::dashboard::get_status))
        .route("/refresh", post(handlers::dashboard::refresh))
        .route("/cache", delete(handlers::dashboard::invalidate_cache));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/kpis", get(handlers::dashboard::get_kpis))
        .route("/api/metrics/{tab}", get(handlers::dashboard::get_tab_metrics))
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}
