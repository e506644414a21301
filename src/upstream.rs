pub mod analytics_repo;
pub use analytics_repo::AnalyticsRepository;

use async_trait::async_trait;

use crate::{common::error::FetchError, models::payload::DashboardPayload};

/// Origem do payload do dashboard. O cache só conhece este trait.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_payload(&self) -> Result<DashboardPayload, FetchError>;
}
