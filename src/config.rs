// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    services::{dashboard_service::DashboardService, query_cache::QueryCache},
    upstream::{AnalyticsRepository, DashboardSource},
};

const DEFAULT_ANALYTICS_API_URL: &str = "http://localhost:8089";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub analytics_api_url: String,
    pub analytics_timeout: Duration,
    pub server_addr: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let analytics_api_url =
            env::var("ANALYTICS_API_URL").unwrap_or_else(|_| DEFAULT_ANALYTICS_API_URL.to_string());
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string());

        let analytics_timeout = match env::var("ANALYTICS_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("ANALYTICS_TIMEOUT_SECS inválido: '{}'", raw))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            analytics_api_url,
            analytics_timeout: Duration::from_secs(analytics_timeout),
            server_addr,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repo = AnalyticsRepository::new(&config.analytics_api_url, config.analytics_timeout)?;
        tracing::info!("✅ Cliente do serviço de analytics pronto em {}", config.analytics_api_url);
        Ok(Self::with_source(Arc::new(repo)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_source(source: Arc<dyn DashboardSource>) -> Self {
        let cache = Arc::new(QueryCache::new(source));
        let dashboard_service = DashboardService::new(cache);
        Self { dashboard_service }
    }
}
