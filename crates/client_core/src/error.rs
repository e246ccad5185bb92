use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a call against the analysis backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found{}", detail_suffix(.detail))]
    NotFound { detail: Option<String> },
    #[error("backend returned {status}{}", detail_suffix(.detail))]
    Http {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            ClientError::Decode(_) => None,
        }
    }

    /// Backend-supplied explanation, when the response carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::NotFound { detail } | ClientError::Http { detail, .. } => {
                detail.as_deref()
            }
            ClientError::Transport(_) | ClientError::Decode(_) => None,
        }
    }

    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}
