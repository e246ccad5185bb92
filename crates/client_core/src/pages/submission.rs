use std::sync::Arc;

use shared::{
    domain::EntryId,
    protocol::{AnalysisRecord, AnalyzeRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error};

use super::RequestGeneration;
use crate::{
    form::{FormError, SubmissionForm},
    EsApi,
};

pub const ANALYZE_FALLBACK_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success(AnalysisRecord),
    Failure(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    pub fn result(&self) -> Option<&AnalysisRecord> {
        match self {
            SubmissionState::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// A result is ready; the view should bring the result region into view.
    ResultReady { entry_id: EntryId },
}

struct SubmissionInner {
    state: SubmissionState,
    generation: RequestGeneration,
}

pub struct SubmissionPage {
    api: Arc<dyn EsApi>,
    inner: Mutex<SubmissionInner>,
    events: broadcast::Sender<SubmissionEvent>,
}

impl SubmissionPage {
    pub fn new(api: Arc<dyn EsApi>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            api,
            inner: Mutex::new(SubmissionInner {
                state: SubmissionState::Idle,
                generation: RequestGeneration::default(),
            }),
            events,
        }
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.state.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    /// Validates the draft and, if valid, runs the analysis. Validation
    /// failures return synchronously and leave the page state untouched.
    pub async fn submit(&self, form: &SubmissionForm) -> Result<(), FormError> {
        let request = form.submit()?;
        self.analyze(request).await;
        Ok(())
    }

    pub async fn analyze(&self, request: AnalyzeRequest) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.state = SubmissionState::Loading;
            inner.generation.next()
        };

        let result = self.api.analyze(&request).await;

        let mut inner = self.inner.lock().await;
        if !inner.generation.is_current(ticket) {
            debug!("submission: discarding superseded analysis response");
            return;
        }

        match result {
            Ok(record) => {
                let entry_id = record.es_entry.id;
                inner.state = SubmissionState::Success(record);
                drop(inner);
                let _ = self.events.send(SubmissionEvent::ResultReady { entry_id });
            }
            Err(err) => {
                error!(error = %err, "submission: analysis failed");
                inner.state = SubmissionState::Failure(err.user_message(ANALYZE_FALLBACK_MESSAGE));
            }
        }
    }
}
