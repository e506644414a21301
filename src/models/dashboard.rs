// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::payload::SectionIssue;

// Seta/cor do card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

// De onde vem o "Growth Rate". Hoje só existe uma origem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum GrowthRateSource {
    RevenueGrowth,
}

// 1. Cards do Topo
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    #[schema(example = "R 1,234,500")]
    pub total_revenue_display: String,
    #[schema(example = "+12.5%")]
    pub revenue_change_display: String,
    pub revenue_trend: Trend,

    #[schema(example = "4,321")]
    pub total_orders_display: String,
    #[schema(example = "-5.3%")]
    pub orders_change_display: String,
    pub orders_trend: Trend,

    #[schema(example = "987")]
    pub active_customers_display: String,
    #[schema(example = "N/A")]
    pub customers_change_display: String, // Sem período anterior no payload

    #[schema(example = "12.5%")]
    pub growth_rate_display: String,
    pub growth_rate_trend: Trend,
    pub growth_rate_source: GrowthRateSource,
}

// 2. Gráfico de Vendas (linha)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceKind {
    Target,       // Meta real enviada pelo serviço
    GrossRevenue, // Fallback: receita bruta no lugar da meta
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    #[schema(example = "Jan")]
    pub label: String,
    #[schema(example = 425000.0)]
    pub actual: Decimal,
    #[schema(example = 450000.0)]
    pub reference_line: Decimal,
    pub reference_kind: ReferenceKind,
    #[schema(example = "R 425,000")]
    pub actual_display: String,
    #[schema(example = "R 450,000")]
    pub reference_display: String,
    #[schema(example = 2.5)]
    pub mom_growth_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSeries {
    pub points: Vec<SalesPoint>,
    pub uses_gross_as_target_fallback: bool,
}

// 3. Gráfico Regional (barras)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionalPoint {
    #[schema(example = "Gauteng")]
    pub label: String,
    #[schema(example = 1245680.0)]
    pub value: Decimal,
    #[schema(example = "R 1,245,680")]
    pub value_display: String,
    #[schema(example = "R 1246k")]
    pub axis_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionalSeries {
    pub points: Vec<RegionalPoint>,
}

// 4. Estoque (pizza)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum InventoryCategory {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Reorder Required")]
    ReorderRequired,
}

impl InventoryCategory {
    pub fn label(self) -> &'static str {
        match self {
            InventoryCategory::InStock => "In Stock",
            InventoryCategory::LowStock => "Low Stock",
            InventoryCategory::OutOfStock => "Out of Stock",
            InventoryCategory::ReorderRequired => "Reorder Required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub category: InventoryCategory,
    #[schema(example = 120)]
    pub count: u64,
}

/// Com `has_data == false` o consumidor mostra o estado vazio em vez da pizza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDistribution {
    #[schema(value_type = Vec<InventoryEntry>)]
    pub entries: [InventoryEntry; 4],
    pub has_data: bool,
    pub total_products: u64,
}

// 5. Métricas das abas
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesMetrics {
    #[schema(example = "R 1,234,500")]
    pub this_month: String,
    #[schema(example = "R 1,097,333.33")]
    pub last_month: String,
    #[schema(example = "+12.5%")]
    pub growth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    pub in_stock: String,
    pub low_stock: String,
    pub reorder_required: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionRank {
    #[schema(example = "Gauteng")]
    pub name: String,
    #[schema(example = "R 1,245,680")]
    pub sales: String,
    #[schema(example = "49.1%")]
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionalMetrics {
    pub top_regions: Vec<RegionRank>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum TabMetrics {
    Sales(SalesMetrics),
    Inventory(InventoryMetrics),
    Regional(RegionalMetrics),
}

// 6. Página inteira de uma vez
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub kpis: KpiSummary,
    pub sales: SalesSeries,
    pub regional: RegionalSeries,
    pub inventory: InventoryDistribution,
    pub ai_analysis: String,
    pub last_updated: String,
    pub issues: Vec<SectionIssue>,
}

// 7. Planilha de exportação (valores já formatados em ZAR)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    #[schema(example = "Regional Performance")]
    pub section: String,
    #[schema(example = "Gauteng")]
    pub label: String,
    #[schema(example = "R 1,245,680")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportSheet {
    #[schema(example = "ZAR")]
    pub currency: String,
    pub generated_from: String,
    pub rows: Vec<ExportRow>,
}

// 8. Estado da query (loading / error / success)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuerySnapshot {
    #[schema(example = "dashboard-data")]
    pub key: String,
    pub status: QueryStatus,
    pub has_data: bool, // Existe payload visível (inclusive o anterior durante um refresh)
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
