// src/services/extractors.rs
//
// Projeções do payload para cada seção do dashboard.
// Todas são funções puras: mesmo payload, mesmo resultado.

use rust_decimal::Decimal;

use crate::common::currency::{
    format_compact_currency, format_count, format_currency, format_percent, format_percent_change,
    CURRENCY_CODE, NOT_AVAILABLE,
};
use crate::models::dashboard::{
    DashboardOverview, ExportRow, ExportSheet, GrowthRateSource, InventoryCategory,
    InventoryDistribution, InventoryEntry, InventoryMetrics, KpiSummary, ReferenceKind,
    RegionRank, RegionalMetrics, RegionalPoint, RegionalSeries, SalesMetrics, SalesPoint,
    SalesSeries, Trend,
};
use crate::models::payload::{DashboardPayload, InventoryStatus, MonthlySales, RegionalPerformance};

/// Zero conta como alta: é política de fronteira, não de magnitude.
pub fn trend_of(percent: Decimal) -> Trend {
    if percent < Decimal::ZERO { Trend::Down } else { Trend::Up }
}

// 1. Cards do Topo
pub fn extract_kpis(payload: &DashboardPayload) -> KpiSummary {
    let overview = &payload.overview;
    let growth = &payload.growth;

    KpiSummary {
        total_revenue_display: format_currency(overview.total_revenue),
        revenue_change_display: format_percent_change(growth.revenue_growth_percent),
        revenue_trend: trend_of(growth.revenue_growth_percent),

        total_orders_display: format_count(overview.total_orders),
        orders_change_display: format_percent_change(growth.orders_growth_percent),
        orders_trend: trend_of(growth.orders_growth_percent),

        active_customers_display: format_count(overview.active_customers),
        customers_change_display: NOT_AVAILABLE.to_string(),

        // Growth Rate = crescimento da receita (simplificação assumida)
        growth_rate_display: format_percent(growth.revenue_growth_percent),
        growth_rate_trend: trend_of(growth.revenue_growth_percent),
        growth_rate_source: GrowthRateSource::RevenueGrowth,
    }
}

// 2. Gráfico de Vendas
pub fn extract_sales_series(monthly_sales: &[MonthlySales]) -> SalesSeries {
    let points: Vec<SalesPoint> = monthly_sales
        .iter()
        .map(|row| {
            let (reference_line, reference_kind) = match row.target {
                Some(target) => (target, ReferenceKind::Target),
                None => (row.gross_revenue, ReferenceKind::GrossRevenue),
            };
            SalesPoint {
                label: row.month.clone(),
                actual: row.revenue,
                reference_line,
                reference_kind,
                actual_display: format_currency(row.revenue),
                reference_display: format_currency(reference_line),
                mom_growth_percent: row.mom_growth_percent,
            }
        })
        .collect();

    let uses_gross_as_target_fallback = points
        .iter()
        .any(|p| p.reference_kind == ReferenceKind::GrossRevenue);

    SalesSeries { points, uses_gross_as_target_fallback }
}

// 3. Gráfico Regional: mantém a ordem recebida
pub fn extract_regional_series(regions: &[RegionalPerformance]) -> RegionalSeries {
    let points = regions
        .iter()
        .map(|row| RegionalPoint {
            label: row.region.clone(),
            value: row.total_revenue,
            value_display: format_currency(row.total_revenue),
            axis_label: format_compact_currency(row.total_revenue),
        })
        .collect();

    RegionalSeries { points }
}

// 4. Estoque: sempre quatro categorias, nesta ordem
pub fn extract_inventory_distribution(status: &InventoryStatus) -> InventoryDistribution {
    let entries = [
        InventoryEntry { category: InventoryCategory::InStock, count: status.in_stock },
        InventoryEntry { category: InventoryCategory::LowStock, count: status.low_stock },
        InventoryEntry { category: InventoryCategory::OutOfStock, count: status.out_of_stock },
        InventoryEntry { category: InventoryCategory::ReorderRequired, count: status.reorder_required },
    ];
    let has_data = entries.iter().any(|e| e.count > 0);

    InventoryDistribution {
        entries,
        has_data,
        total_products: status.total_products,
    }
}

// 5. Métricas das abas
pub fn extract_sales_metrics(payload: &DashboardPayload) -> SalesMetrics {
    SalesMetrics {
        this_month: format_currency(payload.overview.total_revenue),
        last_month: format_currency(payload.growth.previous_month_revenue),
        growth: format_percent_change(payload.growth.revenue_growth_percent),
    }
}

pub fn extract_inventory_metrics(status: &InventoryStatus) -> InventoryMetrics {
    InventoryMetrics {
        in_stock: format_count(status.in_stock),
        low_stock: format_count(status.low_stock),
        reorder_required: format_count(status.reorder_required),
    }
}

pub fn extract_regional_metrics(regions: &[RegionalPerformance]) -> RegionalMetrics {
    let top_regions = regions
        .iter()
        .map(|row| RegionRank {
            name: row.region.clone(),
            sales: format_currency(row.total_revenue),
            percentage: format_percent(row.percent_of_total),
        })
        .collect();

    RegionalMetrics { top_regions }
}

// 6. Página inteira
pub fn extract_overview(payload: &DashboardPayload) -> DashboardOverview {
    DashboardOverview {
        kpis: extract_kpis(payload),
        sales: extract_sales_series(&payload.monthly_sales),
        regional: extract_regional_series(&payload.regional_performance),
        inventory: extract_inventory_distribution(&payload.inventory_status),
        ai_analysis: payload.ai_analysis.clone(),
        last_updated: payload.last_updated.clone(),
        issues: payload.issues.clone(),
    }
}

// 7. Linhas da planilha de exportação
pub fn extract_export_sheet(payload: &DashboardPayload) -> ExportSheet {
    let mut rows = Vec::new();
    let mut push = |section: &str, label: &str, value: String| {
        rows.push(ExportRow { section: section.to_string(), label: label.to_string(), value });
    };

    let overview = &payload.overview;
    push("Overview", "Total Revenue", format_currency(overview.total_revenue));
    push("Overview", "Total Orders", format_count(overview.total_orders));
    push("Overview", "Active Customers", format_count(overview.active_customers));

    let growth = &payload.growth;
    push("Growth", "Previous Month Revenue", format_currency(growth.previous_month_revenue));
    push("Growth", "Revenue Growth", format_percent_change(growth.revenue_growth_percent));
    push("Growth", "Previous Month Orders", format_count(growth.previous_month_orders));
    push("Growth", "Orders Growth", format_percent_change(growth.orders_growth_percent));

    for row in &payload.monthly_sales {
        push("Monthly Sales", &row.month, format_currency(row.revenue));
        push("Monthly Sales", &format!("{} (Gross)", row.month), format_currency(row.gross_revenue));
        if let Some(target) = row.target {
            push("Monthly Sales", &format!("{} (Target)", row.month), format_currency(target));
        }
        push("Monthly Sales", &format!("{} (Orders)", row.month), format_count(row.orders));
        push("Monthly Sales", &format!("{} (Customers)", row.month), format_count(row.customers));
    }

    for row in &payload.regional_performance {
        push("Regional Performance", &row.region, format_currency(row.total_revenue));
        push("Regional Performance", &format!("{} (Orders)", row.region), format_count(row.total_orders));
        push("Regional Performance", &format!("{} (Customers)", row.region), format_count(row.active_customers));
        push("Regional Performance", &format!("{} (Share)", row.region), format_percent(row.percent_of_total));
    }

    let inventory = extract_inventory_distribution(&payload.inventory_status);
    for entry in &inventory.entries {
        push("Inventory", entry.category.label(), format_count(entry.count));
    }
    push("Inventory", "Total Products", format_count(inventory.total_products));

    ExportSheet {
        currency: CURRENCY_CODE.to_string(),
        generated_from: payload.last_updated.clone(),
        rows,
    }
}
