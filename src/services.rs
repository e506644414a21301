pub mod extractors;
pub mod query_cache;
pub mod dashboard_service;
