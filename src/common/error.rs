use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Falhas ao buscar o payload no serviço de analytics.
// Precisa ser `Clone`: o mesmo resultado é entregue a todos os consumidores
// que aguardam o mesmo fetch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("Serviço de analytics respondeu {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Falha de rede ao contatar o serviço de analytics: {0}")]
    Network(String),

    #[error("Documento do serviço de analytics é inválido: {0}")]
    InvalidDocument(String),
}

// Falhas estruturais do documento (o resto vira `SectionIssue`, não erro).
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Documento sem o objeto 'dashboard_data'")]
    MissingEnvelope,
}

impl From<PayloadError> for FetchError {
    fn from(err: PayloadError) -> Self {
        FetchError::InvalidDocument(err.to_string())
    }
}

// Nosso tipo de erro da camada HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Aba de métricas desconhecida: {0}")]
    MetricsTabNotFound(String),
}

// O erro "pronto para o cliente": status + mensagem.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn to_api_error(&self) -> ApiError {
        match self {
            AppError::Fetch(e) => {
                tracing::error!("🔥 Falha ao obter dados do dashboard: {}", e);
                ApiError {
                    status: StatusCode::BAD_GATEWAY,
                    message: format!("Não foi possível carregar os dados do dashboard: {}", e),
                }
            }
            AppError::MetricsTabNotFound(tab) => ApiError {
                status: StatusCode::NOT_FOUND,
                message: format!("Aba de métricas '{}' não existe. Use sales, inventory ou regional.", tab),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_map_to_bad_gateway() {
        let err = AppError::from(FetchError::Status { status: 503, reason: "Service Unavailable".into() });
        let api = err.to_api_error();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert!(api.message.contains("503"));
    }

    #[test]
    fn unknown_tab_is_not_found() {
        let api = AppError::MetricsTabNotFound("finance".into()).to_api_error();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert!(api.message.contains("finance"));
    }

    #[test]
    fn payload_errors_become_invalid_document() {
        let err: FetchError = PayloadError::MissingEnvelope.into();
        assert!(matches!(err, FetchError::InvalidDocument(_)));
    }
}
