use std::sync::Arc;

use shared::{domain::EntryId, protocol::AnalysisRecord};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::RequestGeneration;
use crate::EsApi;

pub const DETAIL_FAILURE_MESSAGE: &str = "Failed to load the entry.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Loading,
    Found(AnalysisRecord),
    NotFound,
    Failure(String),
}

struct DetailInner {
    entry_id: Option<EntryId>,
    state: DetailState,
    generation: RequestGeneration,
}

/// Detail view keyed by entry id. Every `open` re-fetches, even for an id
/// that was shown before.
pub struct DetailPage {
    api: Arc<dyn EsApi>,
    inner: Mutex<DetailInner>,
}

impl DetailPage {
    pub fn new(api: Arc<dyn EsApi>) -> Self {
        Self {
            api,
            inner: Mutex::new(DetailInner {
                entry_id: None,
                state: DetailState::Loading,
                generation: RequestGeneration::default(),
            }),
        }
    }

    pub async fn state(&self) -> DetailState {
        self.inner.lock().await.state.clone()
    }

    pub async fn entry_id(&self) -> Option<EntryId> {
        self.inner.lock().await.entry_id
    }

    pub async fn open(&self, entry_id: EntryId) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.entry_id = Some(entry_id);
            inner.state = DetailState::Loading;
            inner.generation.next()
        };

        let result = self.api.detail(entry_id).await;

        let mut inner = self.inner.lock().await;
        if !inner.generation.is_current(ticket) {
            debug!(entry_id = entry_id.0, "detail: discarding stale response");
            return;
        }
        inner.state = match result {
            Ok(record) => DetailState::Found(record),
            Err(err) if err.is_not_found() => {
                info!(entry_id = entry_id.0, "detail: entry not found");
                DetailState::NotFound
            }
            Err(err) => {
                error!(entry_id = entry_id.0, error = %err, "detail: fetch failed");
                DetailState::Failure(DETAIL_FAILURE_MESSAGE.to_string())
            }
        };
    }
}
