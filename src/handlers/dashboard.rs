// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    services::dashboard_service::MetricsTab,
    // Importamos os models para referenciar no Swagger
    models::dashboard::{
        DashboardOverview, ExportSheet, InventoryDistribution, KpiSummary, QuerySnapshot,
        RegionalSeries, SalesSeries, TabMetrics,
    },
};

// GET /api/kpis
#[utoipa::path(
    get,
    path = "/api/kpis",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cards do topo (receita, pedidos, clientes, crescimento)", body = KpiSummary),
        (status = 502, description = "Serviço de analytics indisponível")
    )
)]
pub async fn get_kpis(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let kpis = app_state.dashboard_service.get_kpis().await?;
    Ok((StatusCode::OK, Json(kpis)))
}

// GET /api/dashboard/sales
#[utoipa::path(
    get,
    path = "/api/dashboard/sales",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Série mensal: vendas x linha de referência", body = SalesSeries),
        (status = 502, description = "Serviço de analytics indisponível")
    )
)]
pub async fn get_sales_series(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let series = app_state.dashboard_service.get_sales_series().await?;
    Ok((StatusCode::OK, Json(series)))
}

// GET /api/dashboard/regional
#[utoipa::path(
    get,
    path = "/api/dashboard/regional",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Receita por região, na ordem do ranking recebido", body = RegionalSeries),
        (status = 502, description = "Serviço de analytics indisponível")
    )
)]
pub async fn get_regional_series(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let series = app_state.dashboard_service.get_regional_series().await?;
    Ok((StatusCode::OK, Json(series)))
}

// GET /api/dashboard/inventory
#[utoipa::path(
    get,
    path = "/api/dashboard/inventory",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Distribuição do estoque em quatro categorias", body = InventoryDistribution),
        (status = 502, description = "Serviço de analytics indisponível")
    )
)]
pub async fn get_inventory_distribution(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let distribution = app_state.dashboard_service.get_inventory_distribution().await?;
    Ok((StatusCode::OK, Json(distribution)))
}

// GET /api/dashboard/overview
#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Todas as seções de uma vez, com análise e problemas do payload", body = DashboardOverview),
        (status = 502, description = "Serviço de analytics indisponível")
    )
)]
pub async fn get_overview(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.dashboard_service.get_overview().await?;
    Ok((StatusCode::OK, Json(overview)))
}

// GET /api/metrics/{tab}
#[utoipa::path(
    get,
    path = "/api/metrics/{tab}",
    tag = "Dashboard",
    params(
        ("tab" = String, Path, description = "sales | inventory | regional")
    ),
    responses(
        (status = 200, description = "Métricas da aba", body = TabMetrics),
        (status = 404, description = "Aba desconhecida"),
        (status = 502, description = "Serviço de analytics indisponível")
    )
)]
pub async fn get_tab_metrics(
    State(app_state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    // Valida a aba antes de tocar no serviço de analytics
    let tab = MetricsTab::parse(&tab)?;
    let metrics = app_state.dashboard_service.get_tab_metrics(tab).await?;
    Ok((StatusCode::OK, Json(metrics)))
}

// GET /api/dashboard/export
#[utoipa::path(
    get,
    path = "/api/dashboard/export",
    tag = "Export",
    responses(
        (status = 200, description = "Linhas prontas para planilha, valores já em ZAR", body = ExportSheet),
        (status = 502, description = "Serviço de analytics indisponível")
    )
)]
pub async fn get_export_sheet(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let sheet = app_state.dashboard_service.get_export_sheet().await?;
    Ok((StatusCode::OK, Json(sheet)))
}

// GET /api/dashboard/status
#[utoipa::path(
    get,
    path = "/api/dashboard/status",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Estado da query: idle, loading, success ou error", body = QuerySnapshot)
    )
)]
pub async fn get_status(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.get_status().await)
}

// POST /api/dashboard/refresh
#[utoipa::path(
    post,
    path = "/api/dashboard/refresh",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Fetch refeito; o snapshot indica sucesso ou erro", body = QuerySnapshot)
    )
)]
pub async fn refresh(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.refresh().await)
}

// DELETE /api/dashboard/cache
#[utoipa::path(
    delete,
    path = "/api/dashboard/cache",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cache esquecido; a próxima leitura busca de novo", body = QuerySnapshot)
    )
)]
pub async fn invalidate_cache(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.invalidate().await)
}
