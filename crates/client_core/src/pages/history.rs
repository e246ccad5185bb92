use std::sync::Arc;

use shared::protocol::{HistoryItem, PageQuery};
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::RequestGeneration;
use crate::{render::HistoryRow, EsApi};

pub const HISTORY_FAILURE_MESSAGE: &str = "Failed to load history.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HistoryState {
    #[default]
    Loading,
    Empty,
    List(Vec<HistoryItem>),
    Failure(String),
}

struct HistoryInner {
    state: HistoryState,
    generation: RequestGeneration,
}

/// History list. Fetches a single page; there is no "load more".
pub struct HistoryPage {
    api: Arc<dyn EsApi>,
    query: PageQuery,
    inner: Mutex<HistoryInner>,
}

impl HistoryPage {
    pub fn new(api: Arc<dyn EsApi>) -> Self {
        Self::with_query(api, PageQuery::default())
    }

    pub fn with_query(api: Arc<dyn EsApi>, query: PageQuery) -> Self {
        Self {
            api,
            query,
            inner: Mutex::new(HistoryInner {
                state: HistoryState::Loading,
                generation: RequestGeneration::default(),
            }),
        }
    }

    pub async fn state(&self) -> HistoryState {
        self.inner.lock().await.state.clone()
    }

    pub async fn rows(&self) -> Vec<HistoryRow> {
        match &self.inner.lock().await.state {
            HistoryState::List(items) => items.iter().map(HistoryRow::from).collect(),
            _ => Vec::new(),
        }
    }

    pub async fn load(&self) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.state = HistoryState::Loading;
            inner.generation.next()
        };

        let result = self.api.history(self.query).await;

        let mut inner = self.inner.lock().await;
        if !inner.generation.is_current(ticket) {
            debug!("history: discarding superseded response");
            return;
        }
        inner.state = match result {
            Ok(items) if items.is_empty() => HistoryState::Empty,
            Ok(items) => HistoryState::List(items),
            Err(err) => {
                error!(error = %err, "history: fetch failed");
                HistoryState::Failure(HISTORY_FAILURE_MESSAGE.to_string())
            }
        };
    }
}
