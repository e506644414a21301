// src/upstream/analytics_repo.rs

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    common::error::FetchError,
    models::payload::DashboardPayload,
    upstream::DashboardSource,
};

// Endpoint único do serviço de analytics
const DASHBOARD_PATH: &str = "/dashboardresults?format=json";

// O "repositório" aqui é HTTP: um GET que devolve o documento inteiro.
#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnalyticsRepository {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn dashboard_url(&self) -> String {
        format!("{}{}", self.base_url, DASHBOARD_PATH)
    }
}

#[async_trait]
impl DashboardSource for AnalyticsRepository {
    async fn fetch_payload(&self) -> Result<DashboardPayload, FetchError> {
        let url = self.dashboard_url();
        tracing::debug!("Buscando payload do dashboard em {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        // Qualquer coisa fora de 2xx é erro de fetch
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("desconhecido").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let payload = DashboardPayload::parse(&body)?;
        if !payload.issues.is_empty() {
            tracing::warn!(
                "⚠️ Payload recebido com {} seção(ões) degradada(s): {:?}",
                payload.issues.len(),
                payload.issues.iter().map(|i| i.section).collect::<Vec<_>>()
            );
        }

        Ok(payload)
    }
}
