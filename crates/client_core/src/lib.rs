use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::EntryId,
    error::ErrorBody,
    protocol::{AnalysisRecord, AnalyzeRequest, EsEntry, HistoryItem, PageQuery},
};
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod form;
pub mod pages;
pub mod render;

pub use config::Settings;
pub use error::ClientError;

/// The backend operations the pages depend on. Implemented over HTTP by
/// [`EsClient`]; tests substitute scripted implementations.
#[async_trait]
pub trait EsApi: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisRecord, ClientError>;
    async fn history(&self, query: PageQuery) -> Result<Vec<HistoryItem>, ClientError>;
    async fn detail(&self, id: EntryId) -> Result<AnalysisRecord, ClientError>;
    async fn list_entries(&self, query: PageQuery) -> Result<Vec<EsEntry>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct EsClient {
    http: Client,
    base_url: String,
}

impl EsClient {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self::with_http_client(http, settings.api_base_url.clone()))
    }

    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl EsApi for EsClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisRecord, ClientError> {
        let response = self
            .http
            .post(format!("{}/es/analyze", self.base_url))
            .json(request)
            .send()
            .await?;
        let record: AnalysisRecord = read_json(response).await?;
        info!(
            entry_id = record.es_entry.id.0,
            word_count = request.word_count,
            industry = ?request.industry,
            "es: analysis received"
        );
        Ok(record)
    }

    async fn history(&self, query: PageQuery) -> Result<Vec<HistoryItem>, ClientError> {
        let response = self
            .http
            .get(format!("{}/es/history", self.base_url))
            .query(&query)
            .send()
            .await?;
        let items: Vec<HistoryItem> = read_json(response).await?;
        info!(
            skip = query.skip,
            limit = query.limit,
            count = items.len(),
            "es: history fetched"
        );
        Ok(items)
    }

    async fn detail(&self, id: EntryId) -> Result<AnalysisRecord, ClientError> {
        let response = self
            .http
            .get(format!("{}/es/{}", self.base_url, id.0))
            .send()
            .await?;
        let record = read_json(response).await?;
        info!(entry_id = id.0, "es: detail fetched");
        Ok(record)
    }

    async fn list_entries(&self, query: PageQuery) -> Result<Vec<EsEntry>, ClientError> {
        let response = self
            .http
            .get(format!("{}/es/", self.base_url))
            .query(&query)
            .send()
            .await?;
        let entries: Vec<EsEntry> = read_json(response).await?;
        info!(count = entries.len(), "es: entries fetched");
        Ok(entries)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.bytes().await?;

    if status.is_success() {
        return Ok(serde_json::from_slice(&body)?);
    }

    let detail = ErrorBody::from_slice(&body).and_then(|body| body.message());
    warn!(status = status.as_u16(), path = %url, detail = ?detail, "es: backend rejected request");
    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound { detail })
    } else {
        Err(ClientError::Http { status, detail })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
