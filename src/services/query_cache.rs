// src/services/query_cache.rs

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::{
    common::error::FetchError,
    models::{
        dashboard::{QuerySnapshot, QueryStatus},
        payload::DashboardPayload,
    },
    upstream::DashboardSource,
};

// Chave da única query do dashboard (todas as seções leem dela)
pub const DASHBOARD_QUERY_KEY: &str = "dashboard-data";

type FetchResult = Result<Arc<DashboardPayload>, FetchError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

enum QueryState {
    // `previous`: payload anterior, visível enquanto um refresh roda
    Loading { fetch: SharedFetch, previous: Option<Arc<DashboardPayload>> },
    Success { payload: Arc<DashboardPayload> },
    // `previous`: último payload bom, continua servido após um refresh que falhou
    Error { error: FetchError, previous: Option<Arc<DashboardPayload>> },
}

struct QueryEntry {
    generation: u64,
    state: QueryState,
    updated_at: Option<DateTime<Utc>>,
}

type Entries = Arc<Mutex<HashMap<String, QueryEntry>>>;

/// Cache de queries por chave: `idle -> loading -> (success | error)`.
///
/// Um fetch em andamento por chave; quem chega enquanto ele roda recebe o mesmo
/// resultado. Sucesso fica em cache até `invalidate`/`refresh`. Erro fica retido
/// (sem retry automático); se já havia payload, ele continua sendo servido.
pub struct QueryCache {
    source: Arc<dyn DashboardSource>,
    entries: Entries,
    next_generation: AtomicU64,
}

impl QueryCache {
    pub fn new(source: Arc<dyn DashboardSource>) -> Self {
        Self {
            source,
            entries: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Payload da chave. Durante um refresh devolve o payload anterior
    /// (nunca um payload parcial); no primeiro load espera o fetch em andamento.
    pub async fn fetch(&self, key: &str) -> FetchResult {
        let fetch = {
            let mut entries = self.entries.lock().await;
            match entries.get(key).map(|entry| &entry.state) {
                Some(QueryState::Success { payload }) => return Ok(Arc::clone(payload)),
                Some(QueryState::Error { previous: Some(payload), .. }) => return Ok(Arc::clone(payload)),
                Some(QueryState::Error { error, previous: None }) => return Err(error.clone()),
                Some(QueryState::Loading { previous: Some(payload), .. }) => return Ok(Arc::clone(payload)),
                Some(QueryState::Loading { fetch, previous: None }) => {
                    tracing::debug!("Query '{}' já em andamento, aguardando o mesmo fetch", key);
                    fetch.clone()
                }
                None => self.start_fetch(&mut entries, key, None),
            }
        };
        fetch.await
    }

    /// Busca de novo, mantendo o payload atual visível até o novo chegar.
    /// Se já houver um fetch em andamento, junta-se a ele.
    pub async fn refresh(&self, key: &str) -> FetchResult {
        let fetch = {
            let mut entries = self.entries.lock().await;
            // Ok: fetch em voo; Err: payload a manter visível (se houver)
            let in_flight = match entries.get(key).map(|entry| &entry.state) {
                Some(QueryState::Loading { fetch, .. }) => Ok(fetch.clone()),
                Some(QueryState::Success { payload }) => Err(Some(Arc::clone(payload))),
                Some(QueryState::Error { previous, .. }) => Err(previous.clone()),
                None => Err(None),
            };
            match in_flight {
                Ok(fetch) => fetch,
                Err(previous) => self.start_fetch(&mut entries, key, previous),
            }
        };
        fetch.await
    }

    /// Esquece a chave. Um fetch antigo ainda em voo é descartado ao terminar.
    pub async fn invalidate(&self, key: &str) {
        if self.entries.lock().await.remove(key).is_some() {
            tracing::debug!("Query '{}' invalidada", key);
        }
    }

    pub async fn snapshot(&self, key: &str) -> QuerySnapshot {
        let entries = self.entries.lock().await;
        let Some(entry) = entries.get(key) else {
            return QuerySnapshot {
                key: key.to_string(),
                status: QueryStatus::Idle,
                has_data: false,
                error: None,
                updated_at: None,
            };
        };

        let (status, has_data, error) = match &entry.state {
            QueryState::Loading { previous, .. } => (QueryStatus::Loading, previous.is_some(), None),
            QueryState::Success { .. } => (QueryStatus::Success, true, None),
            QueryState::Error { error, previous } => (QueryStatus::Error, previous.is_some(), Some(error.to_string())),
        };

        QuerySnapshot {
            key: key.to_string(),
            status,
            has_data,
            error,
            updated_at: entry.updated_at,
        }
    }

    // Registra a entrada em `loading` e dispara o fetch numa task própria,
    // para que ele termine mesmo se todos os consumidores desistirem.
    fn start_fetch(
        &self,
        entries: &mut HashMap<String, QueryEntry>,
        key: &str,
        previous: Option<Arc<DashboardPayload>>,
    ) -> SharedFetch {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let source = Arc::clone(&self.source);
        let entries_handle = Arc::clone(&self.entries);
        let owned_key = key.to_string();

        let fetch = async move {
            let result = source.fetch_payload().await.map(Arc::new);
            settle(&entries_handle, &owned_key, generation, &result).await;
            result
        }
        .boxed()
        .shared();

        let updated_at = entries.get(key).and_then(|entry| entry.updated_at);
        entries.insert(
            key.to_string(),
            QueryEntry {
                generation,
                state: QueryState::Loading { fetch: fetch.clone(), previous },
                updated_at,
            },
        );
        tracing::debug!("Query '{}' -> loading (geração {})", key, generation);

        tokio::spawn(fetch.clone());
        fetch
    }
}

// Grava o resultado só se a entrada ainda for da mesma geração.
async fn settle(entries: &Mutex<HashMap<String, QueryEntry>>, key: &str, generation: u64, result: &FetchResult) {
    let mut entries = entries.lock().await;
    match entries.get_mut(key) {
        Some(entry) if entry.generation == generation => {
            let previous = match &entry.state {
                QueryState::Loading { previous, .. } => previous.clone(),
                _ => None,
            };
            entry.state = match result {
                Ok(payload) => {
                    tracing::debug!("Query '{}' -> success", key);
                    QueryState::Success { payload: Arc::clone(payload) }
                }
                Err(error) => {
                    tracing::warn!("Query '{}' -> error: {}", key, error);
                    QueryState::Error { error: error.clone(), previous }
                }
            };
            entry.updated_at = Some(Utc::now());
        }
        _ => tracing::debug!("Resultado da geração {} de '{}' descartado (query substituída)", generation, key),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::{collections::VecDeque, sync::atomic::AtomicUsize, time::Duration};

    /// Fonte falsa: conta chamadas, demora um pouco e devolve respostas em fila
    /// (a última se repete).
    pub struct MockSource {
        pub calls: AtomicUsize,
        delay: Duration,
        responses: std::sync::Mutex<VecDeque<Result<DashboardPayload, FetchError>>>,
    }

    impl MockSource {
        pub fn new(delay: Duration, responses: Vec<Result<DashboardPayload, FetchError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay,
                responses: std::sync::Mutex::new(responses.into()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DashboardSource for MockSource {
        async fn fetch_payload(&self) -> Result<DashboardPayload, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                responses.front().cloned().unwrap()
            }
        }
    }
}
