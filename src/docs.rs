// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_kpis,
        handlers::dashboard::get_sales_series,
        handlers::dashboard::get_regional_series,
        handlers::dashboard::get_inventory_distribution,
        handlers::dashboard::get_overview,
        handlers::dashboard::get_tab_metrics,
        handlers::dashboard::get_status,
        handlers::dashboard::refresh,
        handlers::dashboard::invalidate_cache,

        // --- Export ---
        handlers::dashboard::get_export_sheet,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::Trend,
            models::dashboard::GrowthRateSource,
            models::dashboard::KpiSummary,
            models::dashboard::ReferenceKind,
            models::dashboard::SalesPoint,
            models::dashboard::SalesSeries,
            models::dashboard::RegionalPoint,
            models::dashboard::RegionalSeries,
            models::dashboard::InventoryCategory,
            models::dashboard::InventoryEntry,
            models::dashboard::InventoryDistribution,
            models::dashboard::SalesMetrics,
            models::dashboard::InventoryMetrics,
            models::dashboard::RegionRank,
            models::dashboard::RegionalMetrics,
            models::dashboard::TabMetrics,
            models::dashboard::DashboardOverview,
            models::dashboard::QueryStatus,
            models::dashboard::QuerySnapshot,

            // --- Export ---
            models::dashboard::ExportRow,
            models::dashboard::ExportSheet,

            // --- Payload ---
            models::payload::PayloadSection,
            models::payload::IssueKind,
            models::payload::SectionIssue,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais"),
        (name = "Export", description = "Dados formatados para exportação")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_dashboard_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/api/kpis", "/api/metrics/{tab}", "/api/dashboard/refresh", "/api/dashboard/export"] {
            assert!(doc.paths.paths.contains_key(path), "faltando {}", path);
        }
    }
}
