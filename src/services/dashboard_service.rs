// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{
            DashboardOverview, ExportSheet, InventoryDistribution, KpiSummary, QuerySnapshot,
            RegionalSeries, SalesSeries, TabMetrics,
        },
        payload::DashboardPayload,
    },
    services::{
        extractors,
        query_cache::{QueryCache, DASHBOARD_QUERY_KEY},
    },
};

// Abas com métricas próprias na página
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsTab {
    Sales,
    Inventory,
    Regional,
}

impl MetricsTab {
    pub fn parse(tab: &str) -> Result<Self, AppError> {
        match tab {
            "sales" => Ok(MetricsTab::Sales),
            "inventory" => Ok(MetricsTab::Inventory),
            "regional" => Ok(MetricsTab::Regional),
            other => Err(AppError::MetricsTabNotFound(other.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    cache: Arc<QueryCache>,
}

impl DashboardService {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    // Todas as seções saem do mesmo payload (um fetch só)
    async fn payload(&self) -> Result<Arc<DashboardPayload>, AppError> {
        Ok(self.cache.fetch(DASHBOARD_QUERY_KEY).await?)
    }

    pub async fn get_kpis(&self) -> Result<KpiSummary, AppError> {
        let payload = self.payload().await?;
        Ok(extractors::extract_kpis(&payload))
    }

    pub async fn get_sales_series(&self) -> Result<SalesSeries, AppError> {
        let payload = self.payload().await?;
        Ok(extractors::extract_sales_series(&payload.monthly_sales))
    }

    pub async fn get_regional_series(&self) -> Result<RegionalSeries, AppError> {
        let payload = self.payload().await?;
        Ok(extractors::extract_regional_series(&payload.regional_performance))
    }

    pub async fn get_inventory_distribution(&self) -> Result<InventoryDistribution, AppError> {
        let payload = self.payload().await?;
        Ok(extractors::extract_inventory_distribution(&payload.inventory_status))
    }

    pub async fn get_overview(&self) -> Result<DashboardOverview, AppError> {
        let payload = self.payload().await?;
        Ok(extractors::extract_overview(&payload))
    }

    pub async fn get_tab_metrics(&self, tab: MetricsTab) -> Result<TabMetrics, AppError> {
        let payload = self.payload().await?;
        let metrics = match tab {
            MetricsTab::Sales => TabMetrics::Sales(extractors::extract_sales_metrics(&payload)),
            MetricsTab::Inventory => {
                TabMetrics::Inventory(extractors::extract_inventory_metrics(&payload.inventory_status))
            }
            MetricsTab::Regional => {
                TabMetrics::Regional(extractors::extract_regional_metrics(&payload.regional_performance))
            }
        };
        Ok(metrics)
    }

    pub async fn get_export_sheet(&self) -> Result<ExportSheet, AppError> {
        let payload = self.payload().await?;
        Ok(extractors::extract_export_sheet(&payload))
    }

    pub async fn get_status(&self) -> QuerySnapshot {
        self.cache.snapshot(DASHBOARD_QUERY_KEY).await
    }

    /// Refaz o fetch. O resultado (sucesso ou erro) fica no snapshot devolvido.
    pub async fn refresh(&self) -> QuerySnapshot {
        if let Err(e) = self.cache.refresh(DASHBOARD_QUERY_KEY).await {
            tracing::warn!("⚠️ Refresh do dashboard falhou: {}", e);
        }
        self.cache.snapshot(DASHBOARD_QUERY_KEY).await
    }

    // Próxima leitura faz um fetch novo
    pub async fn invalidate(&self) -> QuerySnapshot {
        self.cache.invalidate(DASHBOARD_QUERY_KEY).await;
        self.cache.snapshot(DASHBOARD_QUERY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::error::FetchError,
        models::{dashboard::QueryStatus, payload::fixtures::sample_payload},
        services::query_cache::testing::MockSource,
    };
    use std::time::Duration;

    fn service(source: MockSource) -> (DashboardService, Arc<MockSource>) {
        let source = Arc::new(source);
        let cache = Arc::new(QueryCache::new(source.clone()));
        (DashboardService::new(cache), source)
    }

    #[tokio::test]
    async fn every_section_reads_the_same_fetch() {
        let (service, source) = service(MockSource::new(Duration::from_millis(30), vec![Ok(sample_payload())]));

        let (kpis, sales, regional, inventory) = tokio::join!(
            service.get_kpis(),
            service.get_sales_series(),
            service.get_regional_series(),
            service.get_inventory_distribution(),
        );

        assert_eq!(kpis.unwrap().total_revenue_display, "R 1,234,500");
        assert_eq!(sales.unwrap().points.len(), 2);
        assert_eq!(regional.unwrap().points[0].label, "Western Cape");
        assert!(inventory.unwrap().has_data);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_blocks_every_section() {
        let (service, _) = service(MockSource::new(
            Duration::ZERO,
            vec![Err(FetchError::Network("connection refused".into()))],
        ));

        assert!(matches!(service.get_kpis().await, Err(AppError::Fetch(_))));
        assert!(matches!(service.get_overview().await, Err(AppError::Fetch(_))));
        assert_eq!(service.get_status().await.status, QueryStatus::Error);
    }

    #[tokio::test]
    async fn tab_metrics_by_name() {
        let (service, _) = service(MockSource::new(Duration::ZERO, vec![Ok(sample_payload())]));

        match service.get_tab_metrics(MetricsTab::parse("inventory").unwrap()).await.unwrap() {
            TabMetrics::Inventory(m) => assert_eq!(m.low_stock, "15"),
            other => panic!("aba errada: {:?}", other),
        }
        assert!(matches!(MetricsTab::parse("finance"), Err(AppError::MetricsTabNotFound(_))));
    }

    #[tokio::test]
    async fn failed_refresh_reports_error_and_keeps_sections() {
        let (service, source) = service(MockSource::new(
            Duration::ZERO,
            vec![Ok(sample_payload()), Err(FetchError::Status { status: 502, reason: "Bad Gateway".into() })],
        ));

        service.get_kpis().await.unwrap();
        let snapshot = service.refresh().await;

        assert_eq!(snapshot.status, QueryStatus::Error);
        assert!(snapshot.has_data);
        assert!(snapshot.error.unwrap().contains("502"));
        assert_eq!(source.call_count(), 2);

        // As seções continuam com o último payload bom
        assert_eq!(service.get_kpis().await.unwrap().total_revenue_display, "R 1,234,500");
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_new_fetch() {
        let (service, source) = service(MockSource::new(Duration::ZERO, vec![Ok(sample_payload())]));

        service.get_kpis().await.unwrap();
        assert_eq!(service.invalidate().await.status, QueryStatus::Idle);
        service.get_kpis().await.unwrap();

        assert_eq!(source.call_count(), 2);
    }
}
